//! Tests for the REST adapter against an in-process fake store
//!
//! The fake speaks just enough of the storage REST API to exercise login,
//! listing, upload and delete.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, put},
};
use dc_core::{
    ConnectionConfig, ContentStore, Credential, Error, NewContent, StoreManager, file_md5,
    list_content_ids,
};
use dc_rest::StoreManagerClient;
use futures::TryStreamExt;
use md5::{Digest, Md5};
use tokio::net::TcpListener;

// ============================================================================
// Fake store
// ============================================================================

/// `alice:secret` in basic auth form
const AUTHORIZATION: &str = "Basic YWxpY2U6c2VjcmV0";

#[derive(Default)]
struct FakeState {
    spaces: BTreeMap<String, BTreeMap<String, Vec<u8>>>,
    listing_requests: usize,
}

type Shared = Arc<Mutex<FakeState>>;

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .is_some_and(|value| value == AUTHORIZATION)
}

async fn stores(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    r#"<storageProviderAccounts>
         <storageAcct isPrimary="false"><id>1</id><storageProviderType>RACKSPACE</storageProviderType></storageAcct>
         <storageAcct isPrimary="true"><id>0</id><storageProviderType>AMAZON_S3</storageProviderType></storageAcct>
       </storageProviderAccounts>"#
        .into_response()
}

async fn spaces(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let state = state.lock().unwrap();
    let body: String = state
        .spaces
        .keys()
        .map(|id| format!(r#"<space id="{id}"/>"#))
        .collect();
    format!("<spaces>{body}</spaces>").into_response()
}

async fn space_properties(
    State(state): State<Shared>,
    Path(space_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let state = state.lock().unwrap();
    match state.spaces.get(&space_id) {
        Some(contents) => (
            [
                ("x-dura-meta-space-count", contents.len().to_string()),
                ("x-dura-meta-space-access", "CLOSED".to_string()),
                ("x-unrelated", "ignored".to_string()),
            ],
            (),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn space_contents(
    State(state): State<Shared>,
    Path(space_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let mut state = state.lock().unwrap();
    state.listing_requests += 1;

    let Some(contents) = state.spaces.get(&space_id) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let max_results: usize = query
        .get("maxResults")
        .and_then(|v| v.parse().ok())
        .unwrap_or(1000);
    let prefix = query.get("prefix").cloned().unwrap_or_default();
    let marker = query.get("marker");

    let items: String = contents
        .keys()
        .filter(|id| id.starts_with(&prefix))
        .filter(|id| marker.is_none_or(|m| id.as_str() > m.as_str()))
        .take(max_results)
        .map(|id| format!("<item>{id}</item>"))
        .collect();

    format!(r#"<space id="{space_id}">{items}</space>"#).into_response()
}

async fn add_content(
    State(state): State<Shared>,
    Path((space_id, content_id)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let declared: Option<usize> = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok());
    if declared != Some(body.len()) {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let mut state = state.lock().unwrap();
    let Some(contents) = state.spaces.get_mut(&space_id) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let checksum = hex::encode(Md5::digest(&body));
    contents.insert(content_id, body.to_vec());
    (StatusCode::CREATED, [("content-md5", checksum)], ()).into_response()
}

async fn delete_content(
    State(state): State<Shared>,
    Path((space_id, content_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let mut state = state.lock().unwrap();
    match state
        .spaces
        .get_mut(&space_id)
        .and_then(|contents| contents.remove(&content_id))
    {
        Some(_) => StatusCode::OK.into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

// ============================================================================
// Test server infrastructure
// ============================================================================

struct TestServer {
    port: u16,
    state: Shared,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    async fn new(state: FakeState) -> Self {
        let state = Arc::new(Mutex::new(state));
        let router = Router::new()
            .route("/durastore/stores", get(stores))
            .route("/durastore/spaces", get(spaces))
            .route(
                "/durastore/{space_id}",
                get(space_contents).head(space_properties),
            )
            .route(
                "/durastore/{space_id}/{content_id}",
                put(add_content).delete(delete_content),
            )
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let server = axum::serve(listener, router).with_graceful_shutdown(async {
            shutdown_rx.await.ok();
        });
        tokio::spawn(async move {
            server.await.unwrap();
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        Self {
            port,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    fn manager(&self) -> StoreManagerClient {
        let config = ConnectionConfig::new("127.0.0.1").with_port(self.port);
        StoreManagerClient::new(&config).unwrap()
    }

    fn contains(&self, space_id: &str, content_id: &str) -> bool {
        self.state.lock().unwrap().spaces[space_id].contains_key(content_id)
    }

    fn listing_requests(&self) -> usize {
        self.state.lock().unwrap().listing_requests
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
    }
}

fn demo_state() -> FakeState {
    let mut state = FakeState::default();
    let mut demo = BTreeMap::new();
    demo.insert("existing.txt".to_string(), b"old".to_vec());
    state.spaces.insert("demo-space".to_string(), demo);
    state.spaces.insert("archive".to_string(), BTreeMap::new());
    state
}

async fn logged_in(server: &TestServer) -> StoreManagerClient {
    let mut manager = server.manager();
    manager
        .login(&Credential::new("alice", "secret"))
        .await
        .unwrap();
    manager
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let server = TestServer::new(demo_state()).await;
    let mut manager = server.manager();

    let result = manager.login(&Credential::new("alice", "wrong")).await;
    assert!(matches!(result, Err(Error::Auth(_))));

    let result = manager.primary_content_store().await;
    assert!(matches!(result, Err(Error::Auth(_))));
}

#[tokio::test]
async fn test_primary_store_selected() {
    let server = TestServer::new(demo_state()).await;
    let manager = logged_in(&server).await;

    let accounts = manager.storage_accounts().await.unwrap();
    assert_eq!(accounts.len(), 2);

    let store = manager.primary_content_store().await.unwrap();
    assert_eq!(store.account().id, "0");
    assert_eq!(store.account().provider_type, "AMAZON_S3");
}

#[tokio::test]
async fn test_list_spaces_and_properties() {
    let server = TestServer::new(demo_state()).await;
    let store = logged_in(&server).await.primary_content_store().await.unwrap();

    let spaces = store.list_spaces().await.unwrap();
    assert_eq!(spaces, vec!["archive", "demo-space"]);

    let properties = store.space_properties("demo-space").await.unwrap();
    assert_eq!(properties.get("space-count").map(String::as_str), Some("1"));
    assert_eq!(
        properties.get("space-access").map(String::as_str),
        Some("CLOSED")
    );
    assert!(!properties.contains_key("x-unrelated"));
}

#[tokio::test]
async fn test_missing_space_is_not_found() {
    let server = TestServer::new(demo_state()).await;
    let store = logged_in(&server).await.primary_content_store().await.unwrap();

    let result = store.space_properties("nope").await;
    assert!(matches!(result, Err(Error::NotFound(_))));

    let result: dc_core::Result<Vec<String>> =
        list_content_ids(&store, "nope", None).try_collect().await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_add_list_delete_round_trip() {
    let server = TestServer::new(demo_state()).await;
    let store = logged_in(&server).await.primary_content_store().await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.txt");
    std::fs::write(&path, b"hello-data").unwrap();

    let content_id = "report.txt-1712345678901";
    let file = tokio::fs::File::open(&path).await.unwrap();
    let checksum = store
        .add_content(
            "demo-space",
            NewContent::new(content_id, 10),
            Box::new(file),
        )
        .await
        .unwrap();

    assert_eq!(checksum, file_md5(&path).await.unwrap());
    assert!(server.contains("demo-space", content_id));

    let listed: Vec<String> = list_content_ids(&store, "demo-space", None)
        .try_collect()
        .await
        .unwrap();
    assert_eq!(listed.iter().filter(|id| *id == content_id).count(), 1);

    store.delete_content("demo-space", content_id).await.unwrap();
    assert!(!server.contains("demo-space", content_id));

    let listed: Vec<String> = list_content_ids(&store, "demo-space", None)
        .try_collect()
        .await
        .unwrap();
    assert_eq!(listed, vec!["existing.txt"]);
}

#[tokio::test]
async fn test_content_id_is_percent_encoded() {
    let server = TestServer::new(demo_state()).await;
    let store = logged_in(&server).await.primary_content_store().await.unwrap();

    let content_id = "my report.txt-1";
    store
        .add_content(
            "demo-space",
            NewContent::new(content_id, 3),
            Box::new(&b"abc"[..]),
        )
        .await
        .unwrap();
    assert!(server.contains("demo-space", content_id));
}

#[tokio::test]
async fn test_delete_missing_content_is_not_found() {
    let server = TestServer::new(demo_state()).await;
    let store = logged_in(&server).await.primary_content_store().await.unwrap();

    let result = store.delete_content("demo-space", "never-added").await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_listing_pages_through_large_space() {
    let mut state = demo_state();
    let big: BTreeMap<String, Vec<u8>> = (0..2500)
        .map(|i| (format!("item-{i:05}"), Vec::new()))
        .collect();
    state.spaces.insert("big".to_string(), big);

    let server = TestServer::new(state).await;
    let store = logged_in(&server).await.primary_content_store().await.unwrap();

    let listed: Vec<String> = list_content_ids(&store, "big", None)
        .try_collect()
        .await
        .unwrap();
    assert_eq!(listed.len(), 2500);
    assert_eq!(listed[1000], "item-01000");
    assert_eq!(server.listing_requests(), 3);

    let filtered: Vec<String> = list_content_ids(&store, "big", Some("item-024"))
        .try_collect()
        .await
        .unwrap();
    assert_eq!(filtered.len(), 100);
}
