//! # teslo-auth
//!
//! Concrete collaborators for the realtime gateway.
//!
//! ## Modules
//!
//! - `jwt`: HS256 token verification (and minting for tooling and tests)
//! - `identity`: in-memory user directory resolving display names

pub mod identity;
pub mod jwt;

pub use identity::{UserDirectory, UserRecord};
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
