//! Fake Discogs API for exercising the HTTP client end to end.

use super::constants::*;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Clone)]
struct ServerState {
    releases: Arc<Mutex<Vec<Value>>>,
    forced_status: Arc<Mutex<Option<u16>>>,
    collection_requests: Arc<AtomicUsize>,
}

/// Serves `GET /users/{username}/collection/folders/0/releases` and
/// `GET /oauth/identity` for [`TEST_USER`] authenticated with [`TEST_TOKEN`].
pub struct FakeDiscogsServer {
    pub base_url: String,
    state: ServerState,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl FakeDiscogsServer {
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let state = ServerState {
            releases: Arc::new(Mutex::new(Vec::new())),
            forced_status: Arc::new(Mutex::new(None)),
            collection_requests: Arc::new(AtomicUsize::new(0)),
        };

        let app = Router::new()
            .route(
                "/users/{username}/collection/folders/0/releases",
                get(collection_handler),
            )
            .route("/oauth/identity", get(identity_handler))
            .with_state(state.clone());

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            state,
            _shutdown_tx: Some(shutdown_tx),
        };
        server.wait_for_ready().await;
        server
    }

    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }
            // Any HTTP answer, even 401, means the listener is up
            if client
                .get(format!("{}/oauth/identity", self.base_url))
                .send()
                .await
                .is_ok()
            {
                return;
            }
            tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
        }
    }

    /// Adds a release to the fake collection, in the shape Discogs returns.
    pub fn add_release(&self, id: i64, title: &str, artist: &str, year: i32) {
        self.state.releases.lock().unwrap().push(json!({
            "id": id,
            "instance_id": id * 10,
            "date_added": "2024-03-01T10:12:44-08:00",
            "rating": 0,
            "basic_information": {
                "id": id,
                "title": title,
                "year": year,
                "artists": [{"name": artist, "anv": "", "id": 1}],
                "thumb": format!("https://img.discogs.com/{}-150.jpg", id),
                "cover_image": format!("https://img.discogs.com/{}.jpg", id),
                "resource_url": format!("https://api.discogs.com/releases/{}", id),
                "genres": ["Jazz"],
                "styles": ["Hard Bop"],
                "formats": [{"name": "Vinyl", "qty": "1"}]
            }
        }));
    }

    /// Makes every collection request answer with `status`.
    pub fn force_status(&self, status: Option<u16>) {
        *self.state.forced_status.lock().unwrap() = status;
    }

    pub fn collection_requests(&self) -> usize {
        self.state.collection_requests.load(Ordering::SeqCst)
    }
}

fn is_authorized(headers: &HeaderMap) -> bool {
    let expected = format!("Discogs token={}", TEST_TOKEN);
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected)
}

async fn collection_handler(
    State(state): State<ServerState>,
    Path(username): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    state.collection_requests.fetch_add(1, Ordering::SeqCst);

    if let Some(status) = *state.forced_status.lock().unwrap() {
        return Err(StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR));
    }
    if !is_authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    if username != TEST_USER {
        return Err(StatusCode::NOT_FOUND);
    }

    let page: usize = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1)
        .max(1);
    let per_page: usize = params
        .get("per_page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(50)
        .max(1);

    let releases = state.releases.lock().unwrap();
    let items = releases.len();
    let pages = items.div_ceil(per_page).max(1);
    let slice: Vec<Value> = releases
        .iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .cloned()
        .collect();

    Ok(Json(json!({
        "pagination": {
            "page": page,
            "pages": pages,
            "per_page": per_page,
            "items": items,
            "urls": {}
        },
        "releases": slice
    })))
}

async fn identity_handler(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    if !is_authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(json!({
        "id": 1,
        "username": TEST_USER,
        "resource_url": format!("https://api.discogs.com/users/{}", TEST_USER),
        "consumer_name": "vinyl-cache tests"
    })))
}
