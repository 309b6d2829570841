//! Error types for aktifite-core operations.
//!
//! Guard failures on roster transitions are not errors; they surface as
//! [`crate::roster::Outcome::Skipped`]. Only form validation, missing sessions
//! and collaborator failures are reported through [`AktifiteError`].

use std::path::PathBuf;

use crate::validation::ValidationErrors;

/// All errors that can occur in aktifite-core operations.
#[derive(Debug, thiserror::Error)]
pub enum AktifiteError {
    // ─────────────────────────────────────────────────────────────────────
    // Input Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Unknown sport: {0}")]
    UnknownSport(String),

    #[error("Unknown city: {0}")]
    UnknownCity(String),

    // ─────────────────────────────────────────────────────────────────────
    // Session Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("No active session; sign in first")]
    NotAuthorized,

    // ─────────────────────────────────────────────────────────────────────
    // Collaborator Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Backend {operation} failed: {details}")]
    Backend { operation: String, details: String },

    // ─────────────────────────────────────────────────────────────────────
    // I/O Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage path has no parent directory: {0}")]
    InvalidStoragePath(PathBuf),
}

impl AktifiteError {
    pub fn backend(operation: impl Into<String>, details: impl Into<String>) -> Self {
        AktifiteError::Backend {
            operation: operation.into(),
            details: details.into(),
        }
    }
}

impl From<ValidationErrors> for AktifiteError {
    fn from(errors: ValidationErrors) -> Self {
        AktifiteError::Validation(errors)
    }
}

/// Convenience type alias for Results using AktifiteError.
pub type Result<T> = std::result::Result<T, AktifiteError>;
