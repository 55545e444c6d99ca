//! Real-time WebSocket gateway configuration.

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Handshake header carrying the signed token.
    #[serde(default = "default_token_header")]
    pub token_header: String,
    /// Outbound frame buffer per connection.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Upper bound on token verification; exceeding it rejects the connection.
    #[serde(default = "default_verify_timeout")]
    pub verify_timeout_ms: u64,
    /// Force-close older connections of a user when that user connects again.
    #[serde(default)]
    pub evict_previous_sessions: bool,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            token_header: default_token_header(),
            channel_buffer_size: default_channel_buffer(),
            verify_timeout_ms: default_verify_timeout(),
            evict_previous_sessions: false,
        }
    }
}

fn default_token_header() -> String {
    "authentication".to_string()
}

fn default_channel_buffer() -> usize {
    256
}

fn default_verify_timeout() -> u64 {
    2000
}
