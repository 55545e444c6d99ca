//! # teslo-core
//!
//! Core crate for the Teslo shop backend. Contains configuration schemas,
//! typed identifiers, the collaborator traits consumed by the realtime
//! gateway, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Teslo crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
