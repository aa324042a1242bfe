//! End-to-end API tests: tenant management and tenant-scoped books.

mod common;

use axum::body::Bytes;
use axum::http::{HeaderValue, StatusCode, header};
use serde_json::{Value, json};

use common::harness::{TestApp, assert_error};

// =============================================================================
// Tenant management
// =============================================================================

#[tokio::test]
async fn test_provision_tenant() {
    let app = TestApp::new().await;

    let body = app.provision("acme.example.com").await;
    assert_eq!(body["domainURL"], "acme.example.com");
    assert_eq!(body["schemaName"], "acme");
    assert_eq!(body["status"], "active");
    assert!(body["id"].is_i64());
    assert!(body["createdAt"].is_string());
    assert!(body["updatedAt"].is_string());

    let id = body["id"].as_i64().unwrap();
    let response = app.server.get(&format!("/tenants/{id}")).await;
    response.assert_status_ok();
    let tenant = response.json::<Value>();
    assert_eq!(tenant["status"], "active");
    assert_eq!(tenant["schemaName"], "acme");
}

#[tokio::test]
async fn test_provision_with_scheme_and_hyphen() {
    let app = TestApp::new().await;

    let body = app.provision("https://big-co.example.com/").await;
    assert_eq!(body["schemaName"], "big_co");

    app.post("big-co", "/books", json!({ "name": "Dune" }))
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_provision_without_subdomain_is_rejected() {
    let app = TestApp::new().await;

    let response = app.create_tenant("example.com").await;
    assert_error(&response, 400, "invalid");
    assert_eq!(app.tenant_count().await, 0);
}

#[tokio::test]
async fn test_provision_duplicate_is_conflict() {
    let app = TestApp::new().await;
    app.provision("acme.example.com").await;

    let response = app.create_tenant("acme.example.com").await;
    assert_error(&response, 409, "conflict");
    assert_eq!(app.tenant_count().await, 1);
}

#[tokio::test]
async fn test_provision_malformed_body() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/tenants")
        .add_header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )
        .bytes(Bytes::from_static(b"{not json"))
        .await;
    assert_error(&response, 400, "invalid");

    let response = app.server.post("/tenants").json(&json!({})).await;
    assert_error(&response, 400, "invalid");
    assert_eq!(app.tenant_count().await, 0);
}

#[tokio::test]
async fn test_get_unknown_tenant() {
    let app = TestApp::new().await;

    assert_error(&app.server.get("/tenants/99").await, 404, "not-found");
    assert_error(&app.server.get("/tenants/abc").await, 404, "not-found");
}

#[tokio::test]
async fn test_decommission_tenant() {
    let app = TestApp::new().await;
    let body = app.provision("acme.example.com").await;
    let id = body["id"].as_i64().unwrap();
    app.post("acme", "/books", json!({ "name": "Dune" }))
        .await
        .assert_status(StatusCode::CREATED);

    app.server
        .delete(&format!("/tenants/{id}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    assert_error(
        &app.server.get(&format!("/tenants/{id}")).await,
        404,
        "not-found",
    );
    assert_error(&app.get("acme", "/books").await, 404, "not-found");
    assert!(!app.data_dir.path().join("schemas").join("acme.db").exists());
    assert_eq!(app.tenant_count().await, 0);
}

#[tokio::test]
async fn test_decommission_unknown_tenant() {
    let app = TestApp::new().await;
    app.provision("acme.example.com").await;

    let response = app.server.delete("/tenants/42").await;
    assert_error(&response, 404, "not-found");
    assert_eq!(app.tenant_count().await, 1);

    app.get("acme", "/books").await.assert_status_ok();
}

#[tokio::test]
async fn test_reprovision_after_decommission() {
    let app = TestApp::new().await;
    let body = app.provision("acme.example.com").await;
    app.post("acme", "/books", json!({ "name": "Dune" })).await;

    app.server
        .delete(&format!("/tenants/{}", body["id"]))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    app.provision("acme.example.com").await;

    let books = app.get("acme", "/books").await.json::<Value>();
    assert_eq!(books, json!([]));
}

// =============================================================================
// Books
// =============================================================================

#[tokio::test]
async fn test_book_crud() {
    let app = TestApp::new().await;
    app.provision("acme.example.com").await;

    let response = app.post("acme", "/books", json!({ "name": "Dune" })).await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>(), json!({ "id": 1, "name": "Dune" }));

    let response = app.get("acme", "/books/1").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "id": 1, "name": "Dune" }));

    let response = app
        .put("acme", "/books/1", json!({ "name": "Dune Messiah" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["name"], "Dune Messiah");

    app.delete("acme", "/books/1")
        .await
        .assert_status(StatusCode::NO_CONTENT);
    assert_error(&app.get("acme", "/books/1").await, 404, "not-found");
    assert_error(&app.delete("acme", "/books/1").await, 404, "not-found");
}

#[tokio::test]
async fn test_books_are_isolated_per_tenant() {
    let app = TestApp::new().await;
    app.provision("acme.example.com").await;
    app.provision("globex.example.com").await;

    app.post("acme", "/books", json!({ "name": "Dune" }))
        .await
        .assert_status(StatusCode::CREATED);

    let acme = app.get("acme", "/books").await;
    acme.assert_status_ok();
    assert_eq!(acme.json::<Value>(), json!([{ "id": 1, "name": "Dune" }]));

    let globex = app.get("globex", "/books").await;
    globex.assert_status_ok();
    assert_eq!(globex.json::<Value>(), json!([]));

    assert_error(&app.get("globex", "/books/1").await, 404, "not-found");

    // Ids are allocated per schema
    let response = app
        .post("globex", "/books", json!({ "name": "Neuromancer" }))
        .await;
    assert_eq!(response.json::<Value>()["id"], 1);
}

#[tokio::test]
async fn test_update_with_empty_name_leaves_record() {
    let app = TestApp::new().await;
    app.provision("acme.example.com").await;
    app.post("acme", "/books", json!({ "name": "Dune" })).await;

    let response = app.put("acme", "/books/1", json!({ "name": "" })).await;
    assert_error(&response, 400, "invalid");

    let book = app.get("acme", "/books/1").await.json::<Value>();
    assert_eq!(book["name"], "Dune");
}

#[tokio::test]
async fn test_create_with_empty_name_is_rejected() {
    let app = TestApp::new().await;
    app.provision("acme.example.com").await;

    let response = app.post("acme", "/books", json!({ "name": "  " })).await;
    assert_error(&response, 400, "invalid");
    assert_eq!(app.get("acme", "/books").await.json::<Value>(), json!([]));
}

#[tokio::test]
async fn test_update_missing_book() {
    let app = TestApp::new().await;
    app.provision("acme.example.com").await;

    let response = app.put("acme", "/books/7", json!({ "name": "Dune" })).await;
    assert_error(&response, 404, "not-found");
}

#[tokio::test]
async fn test_non_numeric_book_id() {
    let app = TestApp::new().await;
    app.provision("acme.example.com").await;

    assert_error(&app.get("acme", "/books/abc").await, 404, "not-found");
}

#[tokio::test]
async fn test_malformed_book_body() {
    let app = TestApp::new().await;
    app.provision("acme.example.com").await;

    let response = app.post("acme", "/books", json!({ "title": "Dune" })).await;
    assert_error(&response, 400, "invalid");
}

#[tokio::test]
async fn test_unregistered_tenant_host() {
    let app = TestApp::new().await;

    assert_error(&app.get("initech", "/books").await, 404, "not-found");
}

#[tokio::test]
async fn test_host_without_subdomain() {
    let app = TestApp::new().await;

    let response = app
        .server
        .get("/books")
        .add_header(header::HOST, HeaderValue::from_static("example.com"))
        .await;
    assert_error(&response, 500, "no-tenant");
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_on_any_host() {
    let app = TestApp::new().await;

    let response = app.server.get("/health").await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "sqlite");
}
