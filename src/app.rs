//! App Core for the bookmark manager.
//!
//! Central struct wiring the configuration, the REST client, the view
//! controller and the preference/theme services.

use std::io::IsTerminal;

use tracing::warn;

use crate::config::ClientConfig;
use crate::managers::view_controller::ViewController;
use crate::services::api_client::{BookmarkApiTrait, HttpBookmarkApi};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::theme_engine::{ThemeEngine, ThemeEngineTrait};
use crate::types::errors::SettingsError;
use crate::types::settings::ThemeMode;
use crate::ui::console::ConsoleRenderer;

/// Central application struct holding the controller and services.
pub struct App<A: BookmarkApiTrait> {
    pub config: ClientConfig,
    pub controller: ViewController<A>,
    pub settings_engine: SettingsEngine,
    pub theme_engine: ThemeEngine,
}

impl App<HttpBookmarkApi> {
    /// Creates an App talking to the configured REST service.
    pub fn new(config: ClientConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let api = HttpBookmarkApi::new(&config)?;
        Ok(Self::with_api(config, api))
    }
}

impl<A: BookmarkApiTrait> App<A> {
    /// Creates an App around any API implementation.
    ///
    /// An unreadable preferences file is logged and treated as "no preference".
    pub fn with_api(config: ClientConfig, api: A) -> Self {
        let mut settings_engine = SettingsEngine::new(config.config_dir.clone());
        let stored_theme = match settings_engine.load() {
            Ok(preferences) => preferences.theme,
            Err(e) => {
                warn!(error = %e, "ignoring unreadable preferences");
                None
            }
        };

        Self {
            config,
            controller: ViewController::new(api),
            settings_engine,
            theme_engine: ThemeEngine::new(stored_theme),
        }
    }

    /// Flips between dark and light and remembers the choice.
    pub fn toggle_theme(&mut self) -> Result<ThemeMode, SettingsError> {
        let mode = self.theme_engine.toggle();
        self.settings_engine.set_theme(Some(mode))?;
        Ok(mode)
    }

    /// Sets an explicit theme, or `None` to follow the system scheme.
    pub fn set_theme(&mut self, mode: Option<ThemeMode>) -> Result<(), SettingsError> {
        self.theme_engine.set_theme(mode);
        self.settings_engine.set_theme(mode)
    }

    /// Renderer for stdout in the current theme.
    pub fn renderer(&self) -> ConsoleRenderer {
        ConsoleRenderer::new(self.theme_engine.palette(), std::io::stdout().is_terminal())
    }

    /// Shutdown: cancel timers still pending in the view.
    pub fn shutdown(&mut self) {
        self.controller.teardown();
    }
}
