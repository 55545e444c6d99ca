//! Inbound and outbound event definitions.
//!
//! Every frame is a JSON text envelope `{"event": <name>, "data": <payload>}`.
//! Event names are part of the public protocol and must not change.

use serde::{Deserialize, Serialize};

use crate::error::InboundError;
use crate::session::ActiveSession;

/// Chat message sent by a client.
pub const MESSAGE_FROM_CLIENT: &str = "message-from-client";
/// Presence snapshot pushed after every join and leave.
pub const CLIENTS_UPDATED: &str = "clients-updated";
/// Relayed chat message.
pub const MESSAGE_FROM_SERVER: &str = "message-from-server";
/// Body substituted when a client sends an empty or missing message.
pub const NO_MESSAGE_PLACEHOLDER: &str = "no-message!!";

/// Events sent by the server to every connected peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum OutboundEvent {
    /// Presence snapshot.
    #[serde(rename = "clients-updated")]
    ClientsUpdated(Vec<ActiveSession>),
    /// Relayed chat message.
    #[serde(rename = "message-from-server")]
    MessageFromServer(ChatMessage),
}

/// Relayed chat payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Sender's display name.
    pub full_name: String,
    /// Message body.
    pub message: String,
}

impl ChatMessage {
    /// Builds a relay payload, substituting the placeholder for empty bodies.
    pub fn new(full_name: String, body: Option<String>) -> Self {
        Self {
            full_name,
            message: body
                .filter(|b| !b.is_empty())
                .unwrap_or_else(|| NO_MESSAGE_PLACEHOLDER.to_string()),
        }
    }
}

/// Payload of `message-from-client`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewMessage {
    /// Message body; may be absent.
    #[serde(default)]
    pub message: Option<String>,
}

/// Events accepted from clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A chat message to relay.
    MessageFromClient(NewMessage),
}

#[derive(Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

impl InboundEvent {
    /// Parses a text frame.
    pub fn parse(raw: &str) -> Result<Self, InboundError> {
        let envelope: Envelope = serde_json::from_str(raw)?;
        match envelope.event.as_str() {
            MESSAGE_FROM_CLIENT => {
                let payload = if envelope.data.is_null() {
                    NewMessage::default()
                } else {
                    serde_json::from_value(envelope.data)?
                };
                Ok(Self::MessageFromClient(payload))
            }
            other => Err(InboundError::UnknownEvent(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use teslo_core::types::id::{ConnectionId, UserId};

    use super::*;

    #[test]
    fn test_parse_message_from_client() {
        let event = InboundEvent::parse(r#"{"event":"message-from-client","data":{"message":"hi"}}"#)
            .unwrap();
        assert_eq!(
            event,
            InboundEvent::MessageFromClient(NewMessage {
                message: Some("hi".to_string())
            })
        );
    }

    #[test]
    fn test_parse_tolerates_missing_payload() {
        let bare = InboundEvent::parse(r#"{"event":"message-from-client"}"#).unwrap();
        let empty = InboundEvent::parse(r#"{"event":"message-from-client","data":{}}"#).unwrap();
        assert_eq!(bare, InboundEvent::MessageFromClient(NewMessage::default()));
        assert_eq!(empty, bare);
    }

    #[test]
    fn test_parse_rejects_unknown_and_malformed() {
        assert!(matches!(
            InboundEvent::parse(r#"{"event":"join-room","data":{}}"#),
            Err(InboundError::UnknownEvent(name)) if name == "join-room"
        ));
        assert!(matches!(
            InboundEvent::parse("not json"),
            Err(InboundError::Malformed(_))
        ));
    }

    #[test]
    fn test_chat_message_placeholder() {
        assert_eq!(ChatMessage::new("A".into(), None).message, NO_MESSAGE_PLACEHOLDER);
        assert_eq!(
            ChatMessage::new("A".into(), Some(String::new())).message,
            NO_MESSAGE_PLACEHOLDER
        );
        assert_eq!(ChatMessage::new("A".into(), Some("yo".into())).message, "yo");
    }

    #[test]
    fn test_outbound_wire_shape() {
        let conn = ConnectionId::new();
        let user = UserId::new();
        let presence = OutboundEvent::ClientsUpdated(vec![ActiveSession {
            connection_id: conn,
            user_id: user,
        }]);
        assert_eq!(
            serde_json::to_value(&presence).unwrap(),
            json!({
                "event": "clients-updated",
                "data": [{"connectionId": conn.to_string(), "userId": user.to_string()}]
            })
        );

        let chat = OutboundEvent::MessageFromServer(ChatMessage::new("Ada".into(), Some("hi".into())));
        assert_eq!(
            serde_json::to_value(&chat).unwrap(),
            json!({"event": "message-from-server", "data": {"fullName": "Ada", "message": "hi"}})
        );
    }
}
