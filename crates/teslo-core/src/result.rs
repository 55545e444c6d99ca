//! Convenience result type alias for Teslo.

use crate::error::AppError;

/// A specialized `Result` type for Teslo operations.
pub type AppResult<T> = Result<T, AppError>;
