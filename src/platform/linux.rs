// Bookmark manager platform paths for Linux
// Config: ~/.config/bookmark-manager

use std::env;
use std::path::PathBuf;

use super::APP_DIR_NAME;

/// Uses `$XDG_CONFIG_HOME/bookmark-manager` if set, otherwise `~/.config/bookmark-manager`.
pub fn get_config_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join(APP_DIR_NAME)
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
        PathBuf::from(home).join(".config").join(APP_DIR_NAME)
    }
}
