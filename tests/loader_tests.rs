//! Dialect detection and document loading tests.

use gantry::document::loader::{load_document, load_from_source};
use gantry::error::GantryError;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn modern_json_document_is_detected() {
    let doc = json!({
        "openapi": "3.1.0",
        "info": { "title": "Modern API", "version": "2.0" },
        "servers": [{ "url": "https://api.example.com" }],
        "paths": { "/ping": { "get": { "operationId": "ping" } } },
    });

    let spec = load_document(doc.to_string().as_bytes()).expect("loads");
    assert_eq!(spec.version(), "3.1.0");
    assert_eq!(spec.title(), "Modern API");
    assert_eq!(spec.base_url(), "https://api.example.com");
}

#[test]
fn modern_yaml_document_is_detected() {
    let doc = "\
openapi: 3.0.3
info:
  title: YAML API
paths:
  /ping:
    get:
      operationId: ping
";
    let spec = load_document(doc.as_bytes()).expect("loads");
    assert_eq!(spec.version(), "3.0.3");
    assert_eq!(spec.base_url(), "http://localhost:8080");
}

#[test]
fn legacy_json_document_is_not_mistaken_for_modern() {
    let doc = json!({
        "swagger": "2.0",
        "host": "petstore.example.com",
        "basePath": "/v2",
        "schemes": ["https"],
        "paths": { "/pets": { "get": { "operationId": "listPets" } } },
    });

    let spec = load_document(doc.to_string().as_bytes()).expect("loads");
    assert_eq!(spec.version(), "2.0");
    assert_eq!(spec.base_url(), "https://petstore.example.com/v2");
}

#[test]
fn legacy_yaml_document_is_detected() {
    let doc = "\
swagger: \"2.0\"
host: petstore.example.com
paths:
  /pets:
    get:
      operationId: listPets
";
    let spec = load_document(doc.as_bytes()).expect("loads");
    assert_eq!(spec.version(), "2.0");
    assert_eq!(spec.base_url(), "http://petstore.example.com");
}

#[test]
fn unmarked_document_is_rejected() {
    let doc = json!({ "title": "not a spec", "paths": {} });
    let err = load_document(doc.to_string().as_bytes()).expect_err("must fail");
    assert!(matches!(err, GantryError::UnsupportedDocument));
}

#[test]
fn garbage_input_is_rejected() {
    let err = load_document(b"\x00\x01 not a document").expect_err("must fail");
    assert!(matches!(err, GantryError::UnsupportedDocument));
}

#[tokio::test]
async fn load_from_source_fetches_http_urls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/openapi.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "openapi": "3.0.0",
            "info": { "title": "Remote API" },
            "paths": { "/ping": { "get": {} } },
        })))
        .mount(&server)
        .await;

    let spec = load_from_source(&format!("{}/openapi.json", server.uri()))
        .await
        .expect("remote document loads");
    assert_eq!(spec.title(), "Remote API");
}

#[tokio::test]
async fn load_from_source_surfaces_http_error_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = load_from_source(&format!("{}/missing.json", server.uri()))
        .await
        .expect_err("must fail");
    assert!(matches!(err, GantryError::FetchStatus(404)));
}

#[tokio::test]
async fn load_from_source_reads_local_files() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("spec.yaml");
    std::fs::write(
        &file,
        "openapi: 3.0.0\ninfo:\n  title: Local API\npaths:\n  /ping:\n    get: {}\n",
    )
    .unwrap();

    let spec = load_from_source(file.to_str().unwrap())
        .await
        .expect("local document loads");
    assert_eq!(spec.title(), "Local API");
}

#[tokio::test]
async fn load_from_source_reports_missing_files() {
    let err = load_from_source("/definitely/not/here.json")
        .await
        .expect_err("must fail");
    assert!(matches!(err, GantryError::Io(_)));
}
