use std::sync::Arc;

use crate::helpers::{get, spawn_app, MockClimateAccess};
use axum::http::StatusCode;

#[tokio::test]
async fn index_lists_every_endpoint() {
    let test_app = spawn_app(Arc::new(MockClimateAccess::new()));

    let (status, headers, body) = get(&test_app.app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    let html = std::str::from_utf8(&body).unwrap();
    for endpoint in [
        "/api/v1.0/precipitation",
        "/api/v1.0/stations",
        "/api/v1.0/tobs",
        "/api/v1.0/2017-03-14",
        "/api/v1.0/2017-03-14/2017-03-28",
    ] {
        assert!(html.contains(endpoint), "missing {}", endpoint);
    }
}

#[tokio::test]
async fn unknown_nested_path_is_not_found() {
    let test_app = spawn_app(Arc::new(MockClimateAccess::new()));

    let (status, _, _) = get(&test_app.app, "/api/v1.0/2017-03-14/2017-03-28/extra").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
