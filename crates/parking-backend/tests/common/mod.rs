//! Common test utilities for integration tests
#![allow(dead_code)]

use std::sync::Arc;

use parking_backend::auth::{FileTokenStore, TokenStorage};
use parking_backend::ApiClient;
use serde_json::{json, Value};
use tempfile::TempDir;
use url::Url;
use wiremock::MockServer;

/// An API client pointed at a mock server, with its token file in a temp dir
pub struct TestBackend {
    pub server: MockServer,
    pub client: ApiClient,
    pub tokens: Arc<FileTokenStore>,
    _dir: TempDir,
}

impl TestBackend {
    /// Starts a mock server and a client rooted at `{server}/api`
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let tokens = Arc::new(FileTokenStore::with_path(dir.path().join("auth_token")));
        let base_url = Url::parse(&format!("{}/api", server.uri())).unwrap();
        let client = ApiClient::new(base_url, tokens.clone());

        Self {
            server,
            client,
            tokens,
            _dir: dir,
        }
    }

    /// Stores a bearer token for subsequent requests
    pub async fn login(&self, token: &str) {
        self.tokens.save(token).await.unwrap();
    }

    /// Returns the Authorization header of every request received so far
    pub async fn authorization_headers(&self) -> Vec<Option<String>> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| {
                r.headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            })
            .collect()
    }
}

/// A spot in the snake_case shape the backend sends
pub fn wire_spot(id: &str, title: &str, distance: f64) -> Value {
    json!({
        "id": id,
        "title": title,
        "address": "Rua Floriano Peixoto, 100",
        "latitude": "-3.72790000",
        "longitude": "-38.52700000",
        "spot_type": "garage",
        "price_per_hour": "8.50",
        "available_spots": 2,
        "total_spots": 6,
        "distance": distance,
        "features": ["covered"]
    })
}
