// Bookmark manager services
// Services provide the REST client, validation, filtering, preferences and themes.

pub mod api_client;
pub mod form_validator;
pub mod memory_backend;
pub mod search_filter;
pub mod settings_engine;
pub mod theme_engine;
