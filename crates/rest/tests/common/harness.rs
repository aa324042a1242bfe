//! API test harness.
//!
//! Runs the full application (routes, tenant middleware and layers) on an
//! `axum-test` [`TestServer`] backed by SQLite in a temporary directory.

use std::sync::Arc;

use axum::http::{HeaderValue, header};
use axum_test::{TestRequest, TestResponse, TestServer};
use serde_json::{Value, json};
use tempfile::TempDir;

use atrium_persistence::backends::sqlite::SqliteBackend;
use atrium_persistence::core::Backend;
use atrium_rest::{ServerConfig, create_app_with_config};

/// Test harness for API testing.
///
/// # Example
///
/// ```rust,ignore
/// let app = TestApp::new().await;
/// app.provision("acme.example.com").await;
/// let response = app.get("acme", "/books").await;
/// response.assert_status_ok();
/// ```
pub struct TestApp {
    /// The test server instance.
    pub server: TestServer,

    /// The storage backend.
    pub backend: Arc<SqliteBackend>,

    /// Server configuration.
    pub config: ServerConfig,

    /// Holds the data directory until the harness is dropped.
    pub data_dir: TempDir,
}

impl TestApp {
    /// Creates a harness where tenants are the first label of a 3+ label host.
    pub async fn new() -> Self {
        Self::with_config(ServerConfig {
            base_domain: None,
            ..ServerConfig::for_testing()
        })
        .await
    }

    /// Creates a harness with a custom configuration.
    pub async fn with_config(config: ServerConfig) -> Self {
        let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let backend = SqliteBackend::open(data_dir.path()).expect("Failed to open SQLite backend");
        backend.initialize().await.expect("Failed to initialize catalog");
        let backend = Arc::new(backend);

        let app = create_app_with_config(Arc::clone(&backend), config.clone());
        let server = TestServer::new(app).expect("Failed to create test server");

        Self {
            server,
            backend,
            config,
            data_dir,
        }
    }

    /// The host a tenant's requests arrive on.
    pub fn host_for(&self, tenant: &str) -> String {
        match &self.config.base_domain {
            Some(base) => format!("{tenant}.{base}"),
            None => format!("{tenant}.example.com"),
        }
    }

    fn with_host(&self, request: TestRequest, tenant: &str) -> TestRequest {
        let host = HeaderValue::from_str(&self.host_for(tenant)).expect("valid host header");
        request.add_header(header::HOST, host)
    }

    /// Provisions a tenant and returns the response body.
    pub async fn provision(&self, domain_url: &str) -> Value {
        let response = self.create_tenant(domain_url).await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()
    }

    /// `POST /tenants`.
    pub async fn create_tenant(&self, domain_url: &str) -> TestResponse {
        self.server
            .post("/tenants")
            .json(&json!({ "domainURL": domain_url }))
            .await
    }

    /// `GET {path}` on the tenant's host.
    pub async fn get(&self, tenant: &str, path: &str) -> TestResponse {
        self.with_host(self.server.get(path), tenant).await
    }

    /// `POST {path}` with a JSON body on the tenant's host.
    pub async fn post(&self, tenant: &str, path: &str, body: Value) -> TestResponse {
        self.with_host(self.server.post(path), tenant)
            .json(&body)
            .await
    }

    /// `PUT {path}` with a JSON body on the tenant's host.
    pub async fn put(&self, tenant: &str, path: &str, body: Value) -> TestResponse {
        self.with_host(self.server.put(path), tenant)
            .json(&body)
            .await
    }

    /// `DELETE {path}` on the tenant's host.
    pub async fn delete(&self, tenant: &str, path: &str) -> TestResponse {
        self.with_host(self.server.delete(path), tenant).await
    }

    /// Number of tenants in the catalog.
    pub async fn tenant_count(&self) -> u64 {
        use atrium_persistence::core::TenantCatalog;
        self.backend
            .count_tenants()
            .await
            .expect("Failed to count tenants")
    }
}

/// Asserts a response carries the API error body with `code`.
pub fn assert_error(response: &TestResponse, status: u16, code: &str) {
    assert_eq!(response.status_code().as_u16(), status, "{}", response.text());
    let body = response.json::<Value>();
    assert_eq!(body["status"], status);
    assert_eq!(body["code"], code);
    assert!(body["message"].is_string());
}
