//! Storage layer for flowvault
//!
//! A small injected key-value abstraction stands in for the host's persistent
//! store (browser storage, a file directory, an embedded DB). The encrypted
//! store sits on top of it and owns namespacing, envelope encryption, and the
//! legacy-plaintext migration path.

pub mod encrypted;
pub mod file;

pub use encrypted::{EncryptedStore, LoadOutcome};
pub use file::FileStore;

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{VaultError, VaultResult};

/// The backing key-value store contract
///
/// Exactly one logical writer is assumed; there is no locking or conflict
/// detection across concurrent writers (last write wins).
pub trait KvStore {
    /// Read the raw value at a key, `None` if never written
    fn get(&self, key: &str) -> VaultResult<Option<String>>;

    /// Write a value, overwriting any previous value at that key
    fn set(&self, key: &str, value: &str) -> VaultResult<()>;

    /// Remove a key; removing a missing key is not an error
    fn remove(&self, key: &str) -> VaultResult<()>;
}

/// In-memory store, used in tests and as a session-scoped cache
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> VaultResult<Option<String>> {
        let data = self
            .data
            .read()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> VaultResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> VaultResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        data.remove(key);
        Ok(())
    }
}
