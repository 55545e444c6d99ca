//! WebSocket upgrade handler and per-socket task.
//!
//! Each socket runs connect → read loop → disconnect sequentially in one
//! task, so a disconnect never overtakes its own registration.

use std::time::Duration;

use axum::extract::ws::{CloseFrame, Message, Utf8Bytes, WebSocket, close_code};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{debug, warn};

use crate::state::AppState;

/// How long the writer may take to flush after the connection closes.
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// GET /ws: WebSocket upgrade, token in the configured handshake header.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Response {
    let token = handshake_token(&headers, &state.realtime.config().token_header);

    ws.on_upgrade(move |socket| handle_socket(state, token, socket))
}

/// Token from the handshake header; a non-UTF-8 value counts as missing.
fn handshake_token(headers: &HeaderMap, header_name: &str) -> Option<String> {
    headers
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Drives one accepted socket until it closes.
async fn handle_socket(state: AppState, token: Option<String>, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let gateway = state.realtime.gateway.clone();
    let (handle, mut outbound_rx) = state.realtime.open_connection();
    let conn_id = handle.id;

    if gateway
        .handle_connection(&handle, token.as_deref())
        .await
        .is_err()
    {
        let frame = CloseFrame {
            code: close_code::POLICY,
            reason: Utf8Bytes::from_static("unauthorized"),
        };
        let _ = ws_tx.send(Message::Close(Some(frame))).await;
        return;
    }

    // Forward queued frames; once closed, flush what is queued and say goodbye.
    let close = handle.close_token();
    let mut writer = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                frame = outbound_rx.recv() => match frame {
                    Some(frame) => {
                        if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                },
                _ = close.cancelled() => {
                    let _ = ws_tx.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    });

    loop {
        tokio::select! {
            incoming = ws_rx.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    gateway.handle_inbound(&conn_id, text.as_str()).await;
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                    break;
                }
            },
            _ = handle.closed() => {
                debug!(conn_id = %conn_id, "Connection closed by server");
                break;
            }
        }
    }

    gateway.handle_disconnect(&conn_id).await;

    if tokio::time::timeout(WRITER_DRAIN_TIMEOUT, &mut writer)
        .await
        .is_err()
    {
        writer.abort();
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_handshake_token_reads_configured_header() {
        let mut headers = HeaderMap::new();
        headers.insert("authentication", HeaderValue::from_static("abc.def.ghi"));

        assert_eq!(
            handshake_token(&headers, "authentication").as_deref(),
            Some("abc.def.ghi")
        );
        assert_eq!(handshake_token(&headers, "authorization"), None);
    }

    #[test]
    fn test_non_utf8_token_counts_as_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "authentication",
            HeaderValue::from_bytes(b"tok\xffen").unwrap(),
        );

        assert_eq!(handshake_token(&headers, "authentication"), None);
    }
}
