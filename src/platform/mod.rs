// Bookmark manager platform abstraction
// Provides the platform-specific config directory for Windows, macOS, and Linux.
//
// Uses `cfg(target_os)` for conditional compilation to select the correct
// platform-specific implementation at compile time.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Directory name used under the platform config root.
pub const APP_DIR_NAME: &str = "bookmark-manager";

/// Returns the platform-specific configuration directory.
///
/// - **Linux**: `~/.config/bookmark-manager` (or `$XDG_CONFIG_HOME/bookmark-manager`)
/// - **macOS**: `~/Library/Application Support/bookmark-manager`
/// - **Windows**: `%APPDATA%/bookmark-manager`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        std::env::temp_dir().join(APP_DIR_NAME)
    }
}
