//! Theme Engine: resolves dark/light mode and the console palette.
//!
//! An explicit stored preference wins; otherwise the system color scheme is used.

use owo_colors::AnsiColors;

use crate::types::settings::ThemeMode;

/// Trait defining the theme engine interface.
pub trait ThemeEngineTrait {
    fn set_theme(&mut self, mode: Option<ThemeMode>);
    fn get_theme(&self) -> Option<ThemeMode>;
    fn effective_theme(&self) -> ThemeMode;
    fn toggle(&mut self) -> ThemeMode;
    fn detect_system_theme(&self) -> ThemeMode;
    fn palette(&self) -> Palette;
}

/// Console colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub title: AnsiColors,
    pub link: AnsiColors,
    pub muted: AnsiColors,
    pub tag: AnsiColors,
    pub active_tag: AnsiColors,
    pub error: AnsiColors,
    pub notice: AnsiColors,
}

const DARK_PALETTE: Palette = Palette {
    title: AnsiColors::BrightWhite,
    link: AnsiColors::BrightBlue,
    muted: AnsiColors::BrightBlack,
    tag: AnsiColors::BrightMagenta,
    active_tag: AnsiColors::BrightCyan,
    error: AnsiColors::BrightRed,
    notice: AnsiColors::BrightYellow,
};

const LIGHT_PALETTE: Palette = Palette {
    title: AnsiColors::Black,
    link: AnsiColors::Blue,
    muted: AnsiColors::BrightBlack,
    tag: AnsiColors::Magenta,
    active_tag: AnsiColors::Cyan,
    error: AnsiColors::Red,
    notice: AnsiColors::Blue,
};

/// Resolves the system scheme from `GTK_THEME` and `COLORFGBG` values.
///
/// `COLORFGBG` is "fg;bg"; background colors 0-6 and 8 are dark.
pub fn system_theme_from(gtk_theme: Option<&str>, colorfgbg: Option<&str>) -> ThemeMode {
    if let Some(gtk_theme) = gtk_theme {
        if gtk_theme.to_lowercase().contains("dark") {
            return ThemeMode::Dark;
        }
        return ThemeMode::Light;
    }
    if let Some(bg) = colorfgbg.and_then(|v| v.rsplit(';').next()) {
        if let Ok(index) = bg.trim().parse::<u8>() {
            return if index <= 6 || index == 8 {
                ThemeMode::Dark
            } else {
                ThemeMode::Light
            };
        }
    }
    ThemeMode::Light
}

/// The theme engine implementation.
pub struct ThemeEngine {
    stored: Option<ThemeMode>,
}

impl ThemeEngine {
    /// Creates a ThemeEngine from the persisted preference (`None` = follow system).
    pub fn new(stored: Option<ThemeMode>) -> Self {
        Self { stored }
    }
}

impl ThemeEngineTrait for ThemeEngine {
    fn set_theme(&mut self, mode: Option<ThemeMode>) {
        self.stored = mode;
    }

    fn get_theme(&self) -> Option<ThemeMode> {
        self.stored
    }

    fn effective_theme(&self) -> ThemeMode {
        self.stored.unwrap_or_else(|| self.detect_system_theme())
    }

    /// Flips the effective theme and pins it as an explicit choice.
    fn toggle(&mut self) -> ThemeMode {
        let next = self.effective_theme().toggled();
        self.stored = Some(next);
        next
    }

    fn detect_system_theme(&self) -> ThemeMode {
        let gtk_theme = std::env::var("GTK_THEME").ok();
        let colorfgbg = std::env::var("COLORFGBG").ok();
        system_theme_from(gtk_theme.as_deref(), colorfgbg.as_deref())
    }

    fn palette(&self) -> Palette {
        match self.effective_theme() {
            ThemeMode::Dark => DARK_PALETTE,
            ThemeMode::Light => LIGHT_PALETTE,
        }
    }
}
