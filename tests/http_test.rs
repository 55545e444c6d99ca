//! Integration tests for the HTTP surface.

mod helpers;

use axum::http::StatusCode;

use helpers::{TestServer, next_named, seed, test_config, user_ids};

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start(test_config(vec![])).await;

    let (status, body) = server.get("/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    server.stop().await;
}

#[tokio::test]
async fn test_detailed_health_reports_connections() {
    let server = TestServer::start(test_config(vec![seed("Ada Lovelace")])).await;
    let ada = server.user("Ada Lovelace");
    let mut ws = server.connect(Some(&ada.token)).await;
    next_named(&mut ws, "clients-updated").await;

    let (status, body) = server.get("/api/health/detailed").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ws_connections"], 1);
    assert_eq!(body["sessions"], 1);
    assert_eq!(body["metrics"]["connections_accepted"], 1);

    server.stop().await;
}

#[tokio::test]
async fn test_presence_lists_registered_sessions() {
    let server = TestServer::start(test_config(vec![seed("Ada Lovelace")])).await;

    let (status, body) = server.get("/api/presence").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["clients"].as_array().unwrap().is_empty());

    let ada = server.user("Ada Lovelace");
    let mut ws = server.connect(Some(&ada.token)).await;
    next_named(&mut ws, "clients-updated").await;

    let (_, body) = server.get("/api/presence").await;
    assert_eq!(user_ids(&body["clients"]), vec![ada.id.to_string()]);

    server.stop().await;
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let server = TestServer::start(test_config(vec![])).await;

    let (status, body) = server.get("/api/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");

    server.stop().await;
}
