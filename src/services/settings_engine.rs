// Bookmark manager settings engine
// Persists client-local preferences (currently only the theme) as a JSON file
// in the platform config directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::{Preferences, ThemeMode};

const PREFERENCES_FILE: &str = "preferences.json";

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<Preferences, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_preferences(&self) -> &Preferences;
    fn set_theme(&mut self, theme: Option<ThemeMode>) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &Path;
}

/// Settings engine implementation that persists preferences as JSON on disk.
pub struct SettingsEngine {
    config_path: PathBuf,
    preferences: Preferences,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// If `dir_override` is `Some`, the preferences file is placed in that directory.
    /// Otherwise, uses the platform-specific config directory.
    pub fn new(dir_override: Option<PathBuf>) -> Self {
        let dir = dir_override.unwrap_or_else(platform::get_config_dir);
        Self {
            config_path: dir.join(PREFERENCES_FILE),
            preferences: Preferences::default(),
        }
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads preferences from the JSON file.
    ///
    /// If the file does not exist, returns default preferences.
    /// If the file exists but is malformed, returns a serialization error.
    fn load(&mut self) -> Result<Preferences, SettingsError> {
        if !self.config_path.exists() {
            debug!(path = %self.config_path.display(), "no preferences file, using defaults");
            self.preferences = Preferences::default();
            return Ok(self.preferences.clone());
        }

        let content = fs::read_to_string(&self.config_path)
            .map_err(|e| SettingsError::Io(format!("Failed to read preferences file: {}", e)))?;

        self.preferences = serde_json::from_str(&content).map_err(|e| {
            SettingsError::Serialization(format!("Failed to parse preferences file: {}", e))
        })?;
        Ok(self.preferences.clone())
    }

    /// Saves the current preferences, creating parent directories as needed.
    fn save(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::Io(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.preferences).map_err(|e| {
            SettingsError::Serialization(format!("Failed to serialize preferences: {}", e))
        })?;

        fs::write(&self.config_path, json)
            .map_err(|e| SettingsError::Io(format!("Failed to write preferences file: {}", e)))?;
        debug!(path = %self.config_path.display(), "preferences saved");
        Ok(())
    }

    fn get_preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Stores the theme choice and saves to disk.
    fn set_theme(&mut self, theme: Option<ThemeMode>) -> Result<(), SettingsError> {
        self.preferences.theme = theme;
        self.save()
    }

    fn get_config_path(&self) -> &Path {
        &self.config_path
    }
}
