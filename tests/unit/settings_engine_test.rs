//! Integration-level tests for preference persistence through the public
//! SettingsEngine trait.

use bookmark_manager::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use bookmark_manager::types::errors::SettingsError;
use bookmark_manager::types::settings::{Preferences, ThemeMode};
use tempfile::TempDir;

fn engine_in(dir: &TempDir) -> SettingsEngine {
    SettingsEngine::new(Some(dir.path().to_path_buf()))
}

/// Without a preferences file the user has no stored theme yet.
#[test]
fn test_load_defaults_when_no_file_exists() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in(&dir);

    let preferences = engine.load().unwrap();

    assert_eq!(preferences, Preferences::default());
    assert_eq!(preferences.theme, None);
    assert!(!engine.get_config_path().exists());
}

/// A theme choice is written immediately and survives a new engine instance.
#[test]
fn test_set_theme_persists() {
    let dir = TempDir::new().unwrap();
    {
        let mut engine = engine_in(&dir);
        engine.load().unwrap();
        engine.set_theme(Some(ThemeMode::Dark)).unwrap();
    }

    let mut reopened = engine_in(&dir);
    assert_eq!(reopened.load().unwrap().theme, Some(ThemeMode::Dark));
    assert_eq!(reopened.get_preferences().theme, Some(ThemeMode::Dark));
}

#[test]
fn test_clearing_theme_returns_to_system() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in(&dir);
    engine.set_theme(Some(ThemeMode::Light)).unwrap();
    engine.set_theme(None).unwrap();

    let mut reopened = engine_in(&dir);
    assert_eq!(reopened.load().unwrap().theme, None);
}

#[test]
fn test_file_stores_lowercase_theme_name() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in(&dir);
    engine.set_theme(Some(ThemeMode::Dark)).unwrap();

    let raw = std::fs::read_to_string(engine.get_config_path()).unwrap();
    assert!(raw.contains("\"dark\""), "unexpected file contents: {}", raw);
}

#[test]
fn test_missing_parent_directories_are_created() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("a").join("b");
    let mut engine = SettingsEngine::new(Some(nested.clone()));

    engine.set_theme(Some(ThemeMode::Light)).unwrap();
    assert!(nested.join("preferences.json").exists());
}

#[test]
fn test_malformed_file_is_a_serialization_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("preferences.json"), "{ not json").unwrap();
    let mut engine = engine_in(&dir);

    assert!(matches!(engine.load(), Err(SettingsError::Serialization(_))));
}
