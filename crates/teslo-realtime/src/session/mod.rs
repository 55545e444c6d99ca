//! Authenticated session bookkeeping.

pub mod registry;

pub use registry::{ActiveSession, Session, SessionRegistry};
