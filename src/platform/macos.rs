// Bookmark manager platform paths for macOS
// Config: ~/Library/Application Support/bookmark-manager

use std::env;
use std::path::PathBuf;

use super::APP_DIR_NAME;

/// `~/Library/Application Support/bookmark-manager`
pub fn get_config_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
        .join("Library")
        .join("Application Support")
        .join(APP_DIR_NAME)
}
