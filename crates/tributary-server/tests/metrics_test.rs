mod helpers;

use axum::http::StatusCode;
use helpers::{client, router};

#[tokio::test]
async fn metrics_endpoint_returns_prometheus_text() {
    let response = client(router(vec![])).get("/metrics").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.content_type().unwrap().starts_with("text/plain"));
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let response = client(router(vec![])).get("/cache").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn metrics_endpoint_uses_exposition_format_version() {
    let response = client(router(vec![])).get("/metrics").await;

    assert_eq!(
        response.content_type(),
        Some(tributary_server::handlers::metrics::PROMETHEUS_CONTENT_TYPE)
    );
}
