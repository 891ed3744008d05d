//! API Client for the bookmark REST service.
//!
//! `BookmarkApiTrait` is the seam the view controller talks to. `HttpBookmarkApi`
//! implements it over reqwest against the configured base URL:
//!
//! | Operation | Method | Path               |
//! |-----------|--------|--------------------|
//! | list      | GET    | `/bookmarks/`      |
//! | create    | POST   | `/bookmarks/`      |
//! | update    | PUT    | `/bookmarks/{id}/` |
//! | delete    | DELETE | `/bookmarks/{id}/` |
//!
//! Every non-success status is collapsed into one message by
//! [`error_message_from_body`].

use std::future::Future;
use std::time::Instant;

use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::types::bookmark::{Bookmark, BookmarkId, BookmarkInput};
use crate::types::errors::ApiError;

/// Message used when an error body is not structured data.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

/// Field error lists consulted, in order, after `detail`.
const FIELD_ERROR_KEYS: [&str; 3] = ["url", "title", "tags"];

/// Trait defining the remote bookmark operations.
///
/// Every call is a suspension point; callers get a result-or-error value back.
pub trait BookmarkApiTrait {
    /// All bookmarks, or only those carrying `tag` when one is given.
    fn list(
        &self,
        tag: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Bookmark>, ApiError>> + Send;
    fn create(
        &self,
        input: &BookmarkInput,
    ) -> impl Future<Output = Result<Bookmark, ApiError>> + Send;
    /// Replaces every mutable field of bookmark `id`.
    fn update(
        &self,
        id: BookmarkId,
        input: &BookmarkInput,
    ) -> impl Future<Output = Result<Bookmark, ApiError>> + Send;
    fn delete(&self, id: BookmarkId) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Collapses an error response body into a single human-readable message.
///
/// Priority: `detail`, first `url` error, first `title` error, first `tags`
/// error, then the compact JSON of the whole body. Bodies that are not JSON
/// yield [`GENERIC_ERROR_MESSAGE`].
pub fn error_message_from_body(body: &[u8]) -> String {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(_) => return GENERIC_ERROR_MESSAGE.to_string(),
    };

    if let Some(message) = value.get("detail").and_then(truthy_text) {
        return message;
    }
    FIELD_ERROR_KEYS
        .iter()
        .find_map(|key| value.get(*key).and_then(first_message))
        .unwrap_or_else(|| value.to_string())
}

/// Text of a JSON value that is present and non-empty.
fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// First message of a field error, which is normally a list of strings.
fn first_message(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => items.first().and_then(truthy_text),
        Value::String(_) => truthy_text(value),
        _ => None,
    }
}

/// reqwest-backed client for the bookmark REST service.
#[derive(Debug, Clone)]
pub struct HttpBookmarkApi {
    client: Client,
    base_url: String,
}

impl HttpBookmarkApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("bookmark-manager/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/bookmarks/", self.base_url)
    }

    fn item_url(&self, id: BookmarkId) -> String {
        format!("{}/bookmarks/{}/", self.base_url, id)
    }

    /// Sends the request and turns any non-success status into an `ApiError`.
    async fn send(&self, method: &'static str, request: RequestBuilder) -> Result<Response, ApiError> {
        let started = Instant::now();
        let response = request.send().await.map_err(|e| {
            warn!(method, error = %e, "bookmark request failed before a response");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        let path = response.url().path().to_string();
        info!(
            method,
            path = %path,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "bookmark request completed"
        );
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.bytes().await {
            Ok(body) => error_message_from_body(&body),
            Err(_) => GENERIC_ERROR_MESSAGE.to_string(),
        };
        warn!(method, path = %path, status = status.as_u16(), %message, "bookmark request rejected");
        Err(ApiError::from_status(status.as_u16(), message))
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
}

impl BookmarkApiTrait for HttpBookmarkApi {
    async fn list(&self, tag: Option<&str>) -> Result<Vec<Bookmark>, ApiError> {
        let mut request = self
            .client
            .get(self.collection_url())
            .header(CACHE_CONTROL, "no-cache, no-store")
            .header(PRAGMA, "no-cache");
        if let Some(tag) = tag {
            request = request.query(&[("tag", tag)]);
        }
        debug!(tag = ?tag, "listing bookmarks");
        let response = self.send("GET", request).await?;
        read_json(response).await
    }

    async fn create(&self, input: &BookmarkInput) -> Result<Bookmark, ApiError> {
        debug!(url = %input.url, "creating bookmark");
        let request = self.client.post(self.collection_url()).json(input);
        let response = self.send("POST", request).await?;
        read_json(response).await
    }

    async fn update(&self, id: BookmarkId, input: &BookmarkInput) -> Result<Bookmark, ApiError> {
        debug!(%id, "updating bookmark");
        let request = self.client.put(self.item_url(id)).json(input);
        let response = self.send("PUT", request).await?;
        read_json(response).await
    }

    async fn delete(&self, id: BookmarkId) -> Result<(), ApiError> {
        debug!(%id, "deleting bookmark");
        let request = self.client.delete(self.item_url(id));
        self.send("DELETE", request).await?;
        Ok(())
    }
}
