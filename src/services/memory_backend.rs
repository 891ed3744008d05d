//! In-process implementation of the bookmark REST contract.
//!
//! Applies the same rules the hosted service does (newest first, lowercased
//! tags, field limits, 404 detail) and reports failures through the same body
//! normalization as the HTTP client. Used by `bookmarks demo` and the tests.
//! Latency and one-shot failures can be injected.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::services::api_client::{error_message_from_body, BookmarkApiTrait};
use crate::services::form_validator::is_valid_url;
use crate::types::bookmark::{Bookmark, BookmarkId, BookmarkInput};
use crate::types::errors::ApiError;
use crate::types::form::{DESCRIPTION_MAX_CHARS, MAX_TAGS, TITLE_MAX_CHARS};

const NOT_FOUND_DETAIL: &str = "No Bookmark matches the given query.";
const BLANK_FIELD: &str = "This field may not be blank.";

/// Number of calls received per operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub list: usize,
    pub create: usize,
    pub update: usize,
    pub delete: usize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.list + self.create + self.update + self.delete
    }
}

#[derive(Debug, Default)]
struct BackendState {
    /// Stored oldest first; listed newest first.
    bookmarks: Vec<Bookmark>,
    next_id: u64,
    latency: Duration,
    injected_failure: Option<(u16, Value)>,
    calls: CallCounts,
}

/// Shared in-memory bookmark store. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<BackendState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every response by `latency`, like a cold-starting host.
    pub fn with_latency(self, latency: Duration) -> Self {
        self.set_latency(latency);
        self
    }

    pub fn set_latency(&self, latency: Duration) {
        self.lock().latency = latency;
    }

    /// Makes the next call, whatever it is, answer `status` with `body`.
    pub fn fail_next(&self, status: u16, body: Value) {
        self.lock().injected_failure = Some((status, body));
    }

    /// Current contents in list order (newest first).
    pub fn snapshot(&self) -> Vec<Bookmark> {
        self.lock().bookmarks.iter().rev().cloned().collect()
    }

    pub fn calls(&self) -> CallCounts {
        self.lock().calls
    }

    fn lock(&self) -> MutexGuard<'_, BackendState> {
        // A panic while holding the lock leaves plain data behind; keep serving it.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Waits out the configured latency without holding the lock.
    async fn respond_delay(&self) {
        let latency = self.lock().latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

fn error_response(status: u16, body: &Value) -> ApiError {
    let message = error_message_from_body(body.to_string().as_bytes());
    ApiError::from_status(status, message)
}

fn not_found() -> ApiError {
    error_response(404, &json!({ "detail": NOT_FOUND_DETAIL }))
}

fn take_injected(state: &mut BackendState) -> Result<(), ApiError> {
    match state.injected_failure.take() {
        Some((status, body)) => Err(error_response(status, &body)),
        None => Ok(()),
    }
}

/// Server-side field rules. Returns the cleaned input or a field → messages map.
fn clean_input(input: &BookmarkInput) -> Result<BookmarkInput, Value> {
    let mut errors = Map::new();

    let url = input.url.trim();
    if url.is_empty() {
        errors.insert("url".into(), json!([BLANK_FIELD]));
    } else if !is_valid_url(url) {
        errors.insert("url".into(), json!(["Enter a valid URL."]));
    }

    let title = input.title.trim();
    if title.is_empty() {
        errors.insert("title".into(), json!([BLANK_FIELD]));
    } else if title.chars().count() > TITLE_MAX_CHARS {
        errors.insert(
            "title".into(),
            json!([format!("Title must be at most {} characters.", TITLE_MAX_CHARS)]),
        );
    }

    if input.description.chars().count() > DESCRIPTION_MAX_CHARS {
        errors.insert(
            "description".into(),
            json!([format!("Description must be at most {} characters.", DESCRIPTION_MAX_CHARS)]),
        );
    }

    if input.tags.len() > MAX_TAGS {
        errors.insert("tags".into(), json!([format!("Maximum {} tags allowed.", MAX_TAGS)]));
    }

    if !errors.is_empty() {
        return Err(Value::Object(errors));
    }
    Ok(BookmarkInput {
        url: url.to_string(),
        title: title.to_string(),
        description: input.description.clone(),
        tags: input.tags.iter().map(|t| t.trim().to_lowercase()).collect(),
    })
}

impl BookmarkApiTrait for MemoryBackend {
    async fn list(&self, tag: Option<&str>) -> Result<Vec<Bookmark>, ApiError> {
        self.respond_delay().await;
        let mut state = self.lock();
        state.calls.list += 1;
        take_injected(&mut state)?;

        let tag = tag.filter(|t| !t.is_empty()).map(str::to_lowercase);
        let result: Vec<Bookmark> = state
            .bookmarks
            .iter()
            .rev()
            .filter(|b| tag.as_deref().map_or(true, |t| b.has_tag(t)))
            .cloned()
            .collect();
        debug!(tag = ?tag, count = result.len(), "memory backend list");
        Ok(result)
    }

    async fn create(&self, input: &BookmarkInput) -> Result<Bookmark, ApiError> {
        self.respond_delay().await;
        let mut state = self.lock();
        state.calls.create += 1;
        take_injected(&mut state)?;

        let clean = clean_input(input).map_err(|body| error_response(400, &body))?;
        state.next_id += 1;
        let bookmark = Bookmark {
            id: BookmarkId(state.next_id),
            url: clean.url,
            title: clean.title,
            description: clean.description,
            tags: clean.tags,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        };
        state.bookmarks.push(bookmark.clone());
        Ok(bookmark)
    }

    async fn update(&self, id: BookmarkId, input: &BookmarkInput) -> Result<Bookmark, ApiError> {
        self.respond_delay().await;
        let mut state = self.lock();
        state.calls.update += 1;
        take_injected(&mut state)?;

        let Some(position) = state.bookmarks.iter().position(|b| b.id == id) else {
            return Err(not_found());
        };
        let clean = clean_input(input).map_err(|body| error_response(400, &body))?;
        let stored = &mut state.bookmarks[position];
        stored.url = clean.url;
        stored.title = clean.title;
        stored.description = clean.description;
        stored.tags = clean.tags;
        Ok(stored.clone())
    }

    async fn delete(&self, id: BookmarkId) -> Result<(), ApiError> {
        self.respond_delay().await;
        let mut state = self.lock();
        state.calls.delete += 1;
        take_injected(&mut state)?;

        let before = state.bookmarks.len();
        state.bookmarks.retain(|b| b.id != id);
        if state.bookmarks.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}
