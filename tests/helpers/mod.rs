//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures::StreamExt;
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tower::ServiceExt;

use teslo_api::AppState;
use teslo_auth::jwt::JwtEncoder;
use teslo_core::config::{AppConfig, SeedUser};
use teslo_core::types::id::UserId;

/// Client side of a test WebSocket.
pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long a test waits for a single frame.
const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

/// A seeded user with a ready-made token.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: UserId,
    pub full_name: String,
    pub token: String,
}

/// Running server bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: AppState,
    pub config: AppConfig,
    encoder: JwtEncoder,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

/// Test configuration with the given seed users.
pub fn test_config(users: Vec<SeedUser>) -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    config.auth.jwt_leeway_seconds = 0;
    config.realtime.verify_timeout_ms = 1000;
    config.identity.users = users;
    config
}

/// Seed entry for an active user.
pub fn seed(full_name: &str) -> SeedUser {
    SeedUser {
        id: UserId::new(),
        full_name: full_name.to_string(),
        email: format!("{}@teslo.test", full_name.to_lowercase().replace(' ', ".")),
        is_active: true,
    }
}

impl TestServer {
    /// Starts a server with the given configuration.
    pub async fn start(config: AppConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("No local address");

        let state = teslo_api::build_state(config.clone());
        let (tx, rx) = oneshot::channel::<()>();
        let serve_state = state.clone();
        let task = tokio::spawn(async move {
            teslo_api::serve(listener, serve_state, async move {
                let _ = rx.await;
            })
            .await
            .expect("Server failed");
        });

        Self {
            addr,
            state,
            encoder: JwtEncoder::new(&config.auth),
            config,
            shutdown: Some(tx),
            task,
        }
    }

    /// Looks up a seeded user by display name and mints a token for them.
    pub fn user(&self, full_name: &str) -> TestUser {
        let seed = self
            .config
            .identity
            .users
            .iter()
            .find(|u| u.full_name == full_name)
            .expect("Unknown seed user");
        TestUser {
            id: seed.id,
            full_name: seed.full_name.clone(),
            token: self.token_for(seed.id),
        }
    }

    /// Mints a valid token for any user ID.
    pub fn token_for(&self, user_id: UserId) -> String {
        self.encoder.issue(user_id).expect("Failed to issue token").0
    }

    /// Opens a WebSocket, optionally sending `token` in the handshake header.
    pub async fn connect(&self, token: Option<&str>) -> WsClient {
        let value = token.map(|t| HeaderValue::from_str(t).expect("Bad header value"));
        self.connect_with_header(value).await
    }

    /// Opens a WebSocket with a raw value for the token header.
    pub async fn connect_with_header(&self, value: Option<HeaderValue>) -> WsClient {
        let mut request = format!("ws://{}/ws", self.addr)
            .into_client_request()
            .expect("Bad request");
        if let Some(value) = value {
            request
                .headers_mut()
                .insert(
                    HeaderName::from_bytes(self.config.realtime.token_header.as_bytes())
                        .expect("Bad header name"),
                    value,
                );
        }

        let (ws, _) = tokio_tungstenite::connect_async(request)
            .await
            .expect("WebSocket handshake failed");
        ws
    }

    /// Performs an HTTP request against the live application state.
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let app = teslo_api::build_app(self.state.clone());
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    /// Stops the server and waits for it to exit.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = tokio::time::timeout(FRAME_TIMEOUT, &mut self.task).await;
    }
}

/// Waits for the next text frame and parses it as a `{event, data}` envelope.
pub async fn next_event(ws: &mut WsClient) -> Value {
    loop {
        let frame = tokio::time::timeout(FRAME_TIMEOUT, ws.next())
            .await
            .expect("Timed out waiting for a frame")
            .expect("Stream ended")
            .expect("WebSocket error");

        match frame {
            Message::Text(text) => return serde_json::from_str(text.as_str()).unwrap(),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("Expected a text frame, got {other:?}"),
        }
    }
}

/// Waits for the next event named `event`, skipping others.
pub async fn next_named(ws: &mut WsClient, event: &str) -> Value {
    loop {
        let envelope = next_event(ws).await;
        if envelope["event"] == event {
            return envelope["data"].clone();
        }
    }
}

/// Reads until the server closes the socket; fails on any text frame.
pub async fn expect_closed_without_events(ws: &mut WsClient) {
    loop {
        let frame = tokio::time::timeout(FRAME_TIMEOUT, ws.next())
            .await
            .expect("Server did not close the socket");

        match frame {
            Some(Ok(Message::Text(text))) => panic!("Unexpected event: {}", text.as_str()),
            Some(Ok(Message::Close(_))) | None | Some(Err(_)) => return,
            Some(Ok(_)) => continue,
        }
    }
}

/// User IDs listed in a `clients-updated` payload, in order.
pub fn user_ids(clients: &Value) -> Vec<String> {
    clients
        .as_array()
        .expect("clients-updated payload is not an array")
        .iter()
        .map(|c| c["userId"].as_str().unwrap_or_default().to_string())
        .collect()
}
