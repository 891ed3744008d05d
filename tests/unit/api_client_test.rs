//! HTTP client tests against a loopback axum server speaking the bookmark
//! REST contract.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query};
use axum::http::header::{CACHE_CONTROL, PRAGMA};
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use bookmark_manager::config::ClientConfig;
use bookmark_manager::services::api_client::{BookmarkApiTrait, HttpBookmarkApi};
use bookmark_manager::types::bookmark::{BookmarkId, BookmarkInput};
use bookmark_manager::types::errors::ApiError;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/api", addr)
}

fn client(base_url: &str) -> HttpBookmarkApi {
    HttpBookmarkApi::new(&ClientConfig {
        api_base_url: base_url.to_string(),
        request_timeout: Duration::from_secs(5),
        config_dir: None,
    })
    .unwrap()
}

fn bookmark_json(id: u64, url: &str, title: &str, tags: &[&str]) -> Value {
    json!({
        "id": id,
        "url": url,
        "title": title,
        "description": "",
        "tags": tags,
        "created_at": "2025-03-04T10:00:00.000000Z",
    })
}

fn input(url: &str, title: &str, tags: &[&str]) -> BookmarkInput {
    BookmarkInput {
        url: url.to_string(),
        title: title.to_string(),
        description: String::new(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

#[derive(Debug, Clone, Default)]
struct SeenList {
    query: HashMap<String, String>,
    cache_control: Option<String>,
    pragma: Option<String>,
}

fn recording_list_router(seen: Arc<Mutex<Option<SeenList>>>) -> Router {
    Router::new().route(
        "/api/bookmarks/",
        get(
            move |Query(query): Query<HashMap<String, String>>, headers: HeaderMap| {
                let seen = seen.clone();
                async move {
                    let header = |name: HeaderName| {
                        headers
                            .get(name)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string)
                    };
                    *seen.lock().unwrap() = Some(SeenList {
                        cache_control: header(CACHE_CONTROL),
                        pragma: header(PRAGMA),
                        query,
                    });
                    Json(json!([
                        bookmark_json(2, "https://go.dev", "Go", &["go"]),
                        bookmark_json(1, "https://www.rust-lang.org", "Rust", &[]),
                    ]))
                }
            },
        ),
    )
}

#[tokio::test]
async fn list_decodes_bookmarks_and_disables_caching() {
    let seen = Arc::new(Mutex::new(None));
    let api = client(&serve(recording_list_router(seen.clone())).await);

    let bookmarks = api.list(None).await.unwrap();

    assert_eq!(bookmarks.len(), 2);
    assert_eq!(bookmarks[0].id, BookmarkId(2));
    assert_eq!(bookmarks[0].tags, vec!["go"]);
    assert!(bookmarks[1].tags.is_empty());

    let seen = seen.lock().unwrap().clone().unwrap();
    assert!(seen.query.is_empty());
    assert_eq!(seen.cache_control.as_deref(), Some("no-cache, no-store"));
    assert_eq!(seen.pragma.as_deref(), Some("no-cache"));
}

#[tokio::test]
async fn list_passes_tag_as_query_parameter() {
    let seen = Arc::new(Mutex::new(None));
    let api = client(&serve(recording_list_router(seen.clone())).await);

    api.list(Some("go")).await.unwrap();

    let seen = seen.lock().unwrap().clone().unwrap();
    assert_eq!(seen.query.get("tag").map(String::as_str), Some("go"));
}

#[tokio::test]
async fn base_url_trailing_slash_is_ignored() {
    let seen = Arc::new(Mutex::new(None));
    let base = serve(recording_list_router(seen.clone())).await;
    let api = client(&format!("{}/", base));

    assert_eq!(api.base_url(), base);
    assert!(api.list(None).await.is_ok());
}

#[tokio::test]
async fn create_posts_json_and_returns_saved_bookmark() {
    let router = Router::new().route(
        "/api/bookmarks/",
        post(|Json(mut body): Json<Value>| async move {
            body["id"] = json!(7);
            body["created_at"] = json!("2025-03-04T10:00:00.000000Z");
            (StatusCode::CREATED, Json(body))
        }),
    );
    let api = client(&serve(router).await);

    let saved = api
        .create(&input("https://go.dev", "Go", &["go", "lang"]))
        .await
        .unwrap();

    assert_eq!(saved.id, BookmarkId(7));
    assert_eq!(saved.url, "https://go.dev");
    assert_eq!(saved.tags, vec!["go", "lang"]);
}

#[tokio::test]
async fn update_puts_to_item_path() {
    let router = Router::new().route(
        "/api/bookmarks/{id}/",
        put(|Path(id): Path<u64>, Json(body): Json<Value>| async move {
            let title = body["title"].as_str().unwrap_or_default().to_string();
            Json(bookmark_json(id, "https://go.dev", &title, &[]))
        }),
    );
    let api = client(&serve(router).await);

    let saved = api
        .update(BookmarkId(3), &input("https://go.dev", "Go (renamed)", &[]))
        .await
        .unwrap();

    assert_eq!(saved.id, BookmarkId(3));
    assert_eq!(saved.title, "Go (renamed)");
}

#[tokio::test]
async fn delete_accepts_no_content() {
    let deleted = Arc::new(Mutex::new(Vec::new()));
    let recorded = deleted.clone();
    let router = Router::new().route(
        "/api/bookmarks/{id}/",
        delete(move |Path(id): Path<u64>| {
            let recorded = recorded.clone();
            async move {
                recorded.lock().unwrap().push(id);
                StatusCode::NO_CONTENT
            }
        }),
    );
    let api = client(&serve(router).await);

    api.delete(BookmarkId(5)).await.unwrap();
    assert_eq!(*deleted.lock().unwrap(), vec![5]);
}

#[tokio::test]
async fn field_errors_become_rejected_with_first_message() {
    let router = Router::new().route(
        "/api/bookmarks/",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "title": ["Ensure this field has no more than 200 characters."],
                    "url": ["Enter a valid URL."],
                })),
            )
        }),
    );
    let api = client(&serve(router).await);

    let err = api.create(&input("x", "y", &[])).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Rejected {
            status: 400,
            message: "Enter a valid URL.".to_string()
        }
    );
}

#[tokio::test]
async fn not_found_detail_is_the_message() {
    let router = Router::new().route(
        "/api/bookmarks/{id}/",
        delete(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "detail": "No Bookmark matches the given query." })),
            )
        }),
    );
    let api = client(&serve(router).await);

    let err = api.delete(BookmarkId(9999)).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "No Bookmark matches the given query.");
}

#[tokio::test]
async fn non_json_server_error_uses_generic_message() {
    let router = Router::new().route(
        "/api/bookmarks/",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "<h1>Server Error</h1>") }),
    );
    let api = client(&serve(router).await);

    let err = api.list(None).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::ServerFault {
            status: 500,
            message: "Something went wrong".to_string()
        }
    );
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() {
    let router = Router::new().route(
        "/api/bookmarks/",
        get(|| async { Json(json!({ "results": [] })) }),
    );
    let api = client(&serve(router).await);

    let err = api.list(None).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let api = client(&format!("http://{}/api", addr));

    let err = api.list(None).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "got {:?}", err);
    assert_eq!(err.status(), None);
}
