// Bookmark manager platform paths for Windows
// Config: %APPDATA%/bookmark-manager

use std::env;
use std::path::PathBuf;

use super::APP_DIR_NAME;

/// `%APPDATA%/bookmark-manager`
pub fn get_config_dir() -> PathBuf {
    let appdata =
        env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join(APP_DIR_NAME)
}
