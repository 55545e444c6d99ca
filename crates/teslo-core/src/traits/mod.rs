//! Collaborator contracts consumed by the realtime gateway.
//!
//! The gateway only *consumes* these; concrete implementations live in
//! `teslo-auth` and can be swapped for test doubles.

pub mod identity;
pub mod verifier;

pub use identity::IdentityResolver;
pub use verifier::{TokenVerifier, VerifiedToken};
