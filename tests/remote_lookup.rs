// Issuer resolution against an in-process stand-in for the binlist API

use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use bin_lookup::{
    resolve, BinCode, BinRecord, BinTable, BinlistClient, Brand, IssuerSource, LookupDegraded,
    LookupSource, UNKNOWN,
};
use std::time::Duration;
use tokio::net::TcpListener;

/// Serve `app` on an ephemeral port, return its base URL
async fn spawn_stub(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn found(headers: HeaderMap, Path(bin): Path<String>) -> impl IntoResponse {
    if headers.get("Accept-Version").and_then(|v| v.to_str().ok()) != Some("3") {
        return (StatusCode::BAD_REQUEST, String::new());
    }
    if bin == "515151" {
        return (StatusCode::OK, r#"{"scheme":"mastercard"}"#.to_string());
    }
    (
        StatusCode::OK,
        r#"{"bank":{"name":"ACME"},"country":{"name":"Nowhere","alpha2":"NW"}}"#.to_string(),
    )
}

async fn server_error() -> impl IntoResponse {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn not_found() -> impl IntoResponse {
    StatusCode::NOT_FOUND
}

async fn garbage() -> impl IntoResponse {
    (StatusCode::OK, "<html>not json</html>")
}

async fn slow() -> impl IntoResponse {
    tokio::time::sleep(Duration::from_secs(5)).await;
    (StatusCode::OK, r#"{"bank":{"name":"Late"}}"#)
}

fn table() -> BinTable {
    BinTable::from_records(vec![BinRecord::new("424242", "VISA", "TestBank", "Testland")])
}

fn bin(s: &str) -> BinCode {
    BinCode::parse(s).unwrap()
}

fn client(base: &str) -> BinlistClient {
    BinlistClient::new(base, Duration::from_millis(500)).unwrap()
}

#[tokio::test]
async fn test_remote_200_fills_issuer_and_country() {
    let base = spawn_stub(Router::new().route("/:bin", get(found))).await;

    let result = resolve(&bin("555555"), &table(), &client(&base)).await;
    assert_eq!(result.brand, Brand::MasterCard);
    assert_eq!(result.issuer, "ACME");
    assert_eq!(result.country, "Nowhere");
    assert_eq!(result.source, LookupSource::Remote);
}

#[tokio::test]
async fn test_remote_200_without_fields_defaults_to_unknown() {
    let base = spawn_stub(Router::new().route("/:bin", get(found))).await;

    let result = resolve(&bin("515151"), &table(), &client(&base)).await;
    assert_eq!(result.issuer, UNKNOWN);
    assert_eq!(result.country, UNKNOWN);
    assert_eq!(result.source, LookupSource::Remote);
}

#[tokio::test]
async fn test_local_hit_never_calls_remote() {
    // Nothing listens here; a call would degrade and change the source
    let result = resolve(&bin("424242"), &table(), &client("http://127.0.0.1:9")).await;
    assert_eq!(result.issuer, "TestBank");
    assert_eq!(result.country, "Testland");
    assert_eq!(result.source, LookupSource::LocalTable);
}

#[tokio::test]
async fn test_remote_500_degrades() {
    let base = spawn_stub(Router::new().route("/:bin", get(server_error))).await;

    let err = client(&base).lookup(&bin("411111")).await.unwrap_err();
    assert!(matches!(err, LookupDegraded::Status(500)));

    let result = resolve(&bin("411111"), &table(), &client(&base)).await;
    assert_eq!(result.brand, Brand::Visa);
    assert_eq!(result.issuer, UNKNOWN);
    assert_eq!(result.country, UNKNOWN);
    assert_eq!(result.source, LookupSource::NotFound);
}

#[tokio::test]
async fn test_remote_404_degrades() {
    let base = spawn_stub(Router::new().route("/:bin", get(not_found))).await;

    let result = resolve(&bin("220000"), &table(), &client(&base)).await;
    assert_eq!(result.brand, Brand::Mir);
    assert_eq!(result.source, LookupSource::NotFound);
}

#[tokio::test]
async fn test_malformed_body_degrades() {
    let base = spawn_stub(Router::new().route("/:bin", get(garbage))).await;

    let err = client(&base).lookup(&bin("411111")).await.unwrap_err();
    assert!(matches!(err, LookupDegraded::Body(_)));

    let result = resolve(&bin("411111"), &table(), &client(&base)).await;
    assert_eq!(result.issuer, UNKNOWN);
    assert_eq!(result.country, UNKNOWN);
}

#[tokio::test]
async fn test_timeout_degrades_quickly() {
    let base = spawn_stub(Router::new().route("/:bin", get(slow))).await;

    let started = std::time::Instant::now();
    let result = resolve(&bin("411111"), &table(), &client(&base)).await;

    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(result.issuer, UNKNOWN);
    assert_eq!(result.country, UNKNOWN);
    assert_eq!(result.source, LookupSource::NotFound);
}

#[tokio::test]
async fn test_unreachable_host_degrades() {
    let result = resolve(&bin("411111"), &table(), &client("http://127.0.0.1:9")).await;
    assert_eq!(result.source, LookupSource::NotFound);
}
