//! Error types for the rating pipeline
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating-pipeline scenarios
#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error("identity integrity violation: {message}")]
    IdentityIntegrity { message: String },

    #[error("cross-generation merge conflict: {message}")]
    MergeConflict { message: String },

    #[error("malformed game in session {session_id}: {message}")]
    MalformedGame { session_id: i64, message: String },

    #[error("engine invariant violated: {message}")]
    EngineInvariant { message: String },

    #[error("configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("snapshot error: {message}")]
    SnapshotError { message: String },
}
