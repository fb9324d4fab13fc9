//! Custom error types for flowvault
//!
//! This module defines the error hierarchy for the storage core using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for flowvault operations
#[derive(Error, Debug)]
pub enum VaultError {
    /// Encryption, decryption, or key derivation errors
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Backing key-value store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Configuration errors (bad namespace, unusable data directory)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl VaultError {
    /// Check if this is a crypto error
    pub fn is_crypto(&self) -> bool {
        matches!(self, Self::Crypto(_))
    }

    /// Check if this is a storage error
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for flowvault operations
pub type VaultResult<T> = Result<T, VaultError>;
