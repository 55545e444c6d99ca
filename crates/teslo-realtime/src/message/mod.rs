//! Wire protocol: event names, envelopes, and payloads.

pub mod types;

pub use types::{
    CLIENTS_UPDATED, ChatMessage, InboundEvent, MESSAGE_FROM_CLIENT, MESSAGE_FROM_SERVER,
    NO_MESSAGE_PLACEHOLDER, NewMessage, OutboundEvent,
};
