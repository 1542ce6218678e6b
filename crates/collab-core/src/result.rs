//! Convenience result type alias for CollabVoice.

use crate::error::AppError;

/// A specialized `Result` type for CollabVoice operations.
pub type AppResult<T> = Result<T, AppError>;
