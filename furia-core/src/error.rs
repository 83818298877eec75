//! # FURIA Error Types
//!
//! Centralized error handling for the FURIA client core.

use thiserror::Error;

use crate::api::TransportError;
use crate::recovery::RecoveryError;
use crate::storage::StorageError;

/// Result type alias for FURIA operations
pub type Result<T> = std::result::Result<T, FuriaError>;

/// Core error types for FURIA
#[derive(Error, Debug)]
pub enum FuriaError {
    /// No response was received from the backend
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Backend answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Key-value persistence errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// E-mail confirmation workflow errors
    #[error("Recovery error: {0}")]
    Recovery(#[from] RecoveryError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Not authenticated / missing session
    #[error("Not authenticated: {0}")]
    Unauthenticated(String),
}

impl FuriaError {
    /// Create a new API error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a new invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a new unauthenticated error
    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    /// Check if this error is an input validation error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// HTTP status carried by the error, if the backend answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Recovery(RecoveryError::Server { status, .. }) => Some(*status),
            _ => None,
        }
    }
}
