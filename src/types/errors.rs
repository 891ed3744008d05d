use thiserror::Error;

use super::bookmark::BookmarkId;

// === ApiError ===

/// Errors returned by the bookmark REST service client.
///
/// `Display` yields the single human-readable message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("Could not reach the bookmark server: {0}")]
    Transport(String),
    /// The server refused the request (4xx), usually with field-level detail.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// The server failed while handling the request (5xx).
    #[error("{message}")]
    ServerFault { status: u16, message: String },
    /// A successful response whose body could not be decoded.
    #[error("Unexpected response from the bookmark server: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classifies a non-success status with its already-normalized message.
    pub fn from_status(status: u16, message: String) -> Self {
        if status >= 500 {
            ApiError::ServerFault { status, message }
        } else {
            ApiError::Rejected { status, message }
        }
    }

    /// HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } | ApiError::ServerFault { status, .. } => {
                Some(*status)
            }
            ApiError::Transport(_) | ApiError::Decode(_) => None,
        }
    }
}

// === ViewError ===

/// Errors from driving the view controller in an invalid order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// A form operation was requested while no form is open.
    #[error("No bookmark form is open")]
    NoOpenForm,
    /// The bookmark is not part of the currently loaded list.
    #[error("Bookmark not found: {0}")]
    UnknownBookmark(BookmarkId),
}

// === SettingsError ===

/// Errors related to persisted client preferences.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Reading or writing the preferences file failed.
    #[error("Settings I/O error: {0}")]
    Io(String),
    /// The preferences file could not be (de)serialized.
    #[error("Settings serialization error: {0}")]
    Serialization(String),
}

// === ConfigError ===

/// Errors in the environment-provided client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The API base URL is not an absolute http(s) URL.
    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    /// The request timeout is not a positive whole number of seconds.
    #[error("Invalid request timeout '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),
}
