//! Error types for the Hearth client core
//!
//! This module contains the error types surfaced by the core: failures reported
//! by the backend collaborator, session errors, configuration errors and the
//! `HearthError` type that unifies them.

use thiserror::Error;

// ----------------------------------------------------------------------------
// Specific Error Types
// ----------------------------------------------------------------------------

/// Failures reported by the managed backend (auth, documents, blobs)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("Backend unavailable: {reason}")]
    Unavailable { reason: String },
    #[error("Permission denied for {operation}")]
    PermissionDenied { operation: String },
    #[error("Document not found: {path}")]
    NotFound { path: String },
}

/// Session and authentication error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Invalid credentials for {email}")]
    InvalidCredentials { email: String },
    #[error("No user is signed in")]
    NotSignedIn,
    #[error("Auth state stream failed: {reason}")]
    StreamFailed { reason: String },
    #[error("Session provider has shut down")]
    ProviderClosed,
}

/// Configuration validation error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

// ----------------------------------------------------------------------------
// Core Error Type
// ----------------------------------------------------------------------------

/// Core error type for the Hearth client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HearthError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Topic table rejected at construction
    #[error("Duplicate topic slug '{slug}' for tags {first} and {second}")]
    DuplicateTopicSlug {
        slug: String,
        first: String,
        second: String,
    },
}

// ----------------------------------------------------------------------------
// Convenience Error Constructors
// ----------------------------------------------------------------------------

impl HearthError {
    /// Create a backend unavailable error with a reason
    pub fn unavailable<T: Into<String>>(reason: T) -> Self {
        HearthError::Backend(BackendError::Unavailable {
            reason: reason.into(),
        })
    }

    /// Create a permission denied error for an operation
    pub fn permission_denied<T: Into<String>>(operation: T) -> Self {
        HearthError::Backend(BackendError::PermissionDenied {
            operation: operation.into(),
        })
    }

    /// Create a not-found error for a document path
    pub fn not_found<T: Into<String>>(path: T) -> Self {
        HearthError::Backend(BackendError::NotFound { path: path.into() })
    }

    /// Create an invalid credentials error
    pub fn invalid_credentials<T: Into<String>>(email: T) -> Self {
        HearthError::Session(SessionError::InvalidCredentials {
            email: email.into(),
        })
    }

    /// Create a missing configuration field error
    pub fn missing_field<T: Into<String>>(field: T) -> Self {
        HearthError::Config(ConfigError::MissingField {
            field: field.into(),
        })
    }

    /// Create an invalid configuration value error
    pub fn invalid_value<F: Into<String>, R: Into<String>>(field: F, reason: R) -> Self {
        HearthError::Config(ConfigError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        })
    }
}

// ----------------------------------------------------------------------------
// Type Aliases
// ----------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, HearthError>;
pub type HearthResult<T> = Result<T>;
