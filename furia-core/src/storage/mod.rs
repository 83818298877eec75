//! # Key-Value Persistence
//!
//! Opaque string storage used to carry small pieces of client state across
//! screens and restarts: the access token and the e-mail awaiting
//! confirmation.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

/// Access token returned by `auth/login`
pub const ACCESS_TOKEN_KEY: &str = "auth.access_token";

/// E-mail of the password recovery waiting for confirmation
pub const PENDING_EMAIL_KEY: &str = "recovery.pending_email";

/// Storage failures
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    fn name(&self) -> &str;

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Returns whether the key existed
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key).await?.is_some())
    }
}
