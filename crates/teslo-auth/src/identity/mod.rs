//! Identity store used to resolve display names at registration time.

pub mod directory;

pub use directory::{UserDirectory, UserRecord};
