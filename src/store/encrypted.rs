//! Per-user encrypted collection storage
//!
//! Wraps any [`KvStore`] with envelope encryption and user-scoped key
//! namespacing. Stored values are either an [`Envelope`] or a legacy plaintext
//! JSON record written before encryption existed; the shape is resolved once
//! here, at the boundary, and never re-inferred deeper in the call chain.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::crypto::{self, Envelope, KdfParams};
use crate::error::VaultResult;

use super::KvStore;

/// A raw stored value, decoded once at load time
///
/// Anything carrying the three envelope fields is an envelope; any other JSON
/// is treated as an unmigrated plaintext record. A corrupted envelope missing
/// exactly those fields would therefore come back as garbage legacy data
/// rather than an error; that ambiguity is accepted, not silently repaired.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredRecord {
    Envelope(Envelope),
    Legacy(serde_json::Value),
}

/// Result of loading a collection
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    /// No record has ever been written at this key
    Missing,
    /// An envelope was decrypted and parsed successfully
    Decrypted(T),
    /// An unencrypted legacy record was found; the caller should re-save it
    /// to complete the one-time migration
    Legacy(T),
    /// A record exists but could not be read: wrong secret, tampering, or
    /// corruption. The two are deliberately indistinguishable.
    Unreadable,
}

impl<T> LoadOutcome<T> {
    /// Flatten to the value, treating `Missing` and `Unreadable` alike
    ///
    /// Callers using this lose the ability to tell "never written" from
    /// "wrong secret"; match on the outcome instead when that matters.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Decrypted(value) | Self::Legacy(value) => Some(value),
            Self::Missing | Self::Unreadable => None,
        }
    }

    /// Check whether a raw record existed at the key
    pub fn record_exists(&self) -> bool {
        !matches!(self, Self::Missing)
    }
}

/// Encrypted, user-namespaced view over a backing key-value store
pub struct EncryptedStore<S: KvStore> {
    store: S,
    namespace: String,
    kdf_params: KdfParams,
    plaintext_fallback: bool,
}

impl<S: KvStore> EncryptedStore<S> {
    /// Create a store with the given namespace and default KDF parameters
    ///
    /// `plaintext_fallback` defaults to on, matching the original host
    /// behavior of preferring an unencrypted write over losing data when
    /// encryption itself fails.
    pub fn new(store: S, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            kdf_params: KdfParams::default(),
            plaintext_fallback: true,
        }
    }

    /// Override the key derivation cost parameters
    pub fn with_kdf_params(mut self, params: KdfParams) -> Self {
        self.kdf_params = params;
        self
    }

    /// Turn the unencrypted degradation path on save failure on or off
    pub fn with_plaintext_fallback(mut self, enabled: bool) -> Self {
        self.plaintext_fallback = enabled;
        self
    }

    /// Access the underlying store
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Build the store key for a collection, scoped to a user
    ///
    /// `<namespace>_<collection>_<userId>` for an authenticated user,
    /// `<namespace>_<collection>` otherwise. User ids are non-empty, so the
    /// anonymous key can never collide with a user-scoped one.
    pub fn key_for(&self, collection: &str, user_id: Option<&str>) -> String {
        match user_id {
            Some(uid) => format!("{}_{}_{}", self.namespace, collection, uid),
            None => format!("{}_{}", self.namespace, collection),
        }
    }

    /// Serialize, encrypt, and persist a value under a key
    ///
    /// Overwrites any previous value; storage is not versioned. If encryption
    /// itself fails and the plaintext fallback is enabled, the value is
    /// written unencrypted instead of being lost, with a warning.
    pub fn save<T: Serialize>(&self, key: &str, value: &T, secret: &str) -> VaultResult<()> {
        let plaintext = serde_json::to_string(value)?;

        match crypto::encrypt(&plaintext, secret, &self.kdf_params) {
            Ok(envelope) => {
                let raw = serde_json::to_string(&envelope)?;
                self.store.set(key, &raw)
            }
            Err(e) if self.plaintext_fallback => {
                warn!(key, error = %e, "encryption failed, falling back to plaintext write");
                self.store.set(key, &plaintext)
            }
            Err(e) => Err(e),
        }
    }

    /// Load and decrypt a value from a key
    ///
    /// Crypto failures never error out of this call; they surface as
    /// [`LoadOutcome::Unreadable`]. Only backing-store failures return `Err`.
    pub fn load<T: DeserializeOwned>(&self, key: &str, secret: &str) -> VaultResult<LoadOutcome<T>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(LoadOutcome::Missing);
        };

        let record: StoredRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(_) => return Ok(LoadOutcome::Unreadable),
        };

        match record {
            StoredRecord::Envelope(envelope) => {
                let plaintext = match crypto::decrypt(&envelope, secret, &self.kdf_params) {
                    Ok(plaintext) => plaintext,
                    Err(e) => {
                        debug!(key, error = %e, "envelope could not be decrypted");
                        return Ok(LoadOutcome::Unreadable);
                    }
                };
                match serde_json::from_str(&plaintext) {
                    Ok(value) => Ok(LoadOutcome::Decrypted(value)),
                    Err(_) => Ok(LoadOutcome::Unreadable),
                }
            }
            StoredRecord::Legacy(value) => {
                debug!(key, "found unmigrated plaintext record");
                match serde_json::from_value(value) {
                    Ok(value) => Ok(LoadOutcome::Legacy(value)),
                    Err(_) => Ok(LoadOutcome::Unreadable),
                }
            }
        }
    }

    /// Load a value, collapsing every failure mode to `None`
    pub fn load_or_none<T: DeserializeOwned>(
        &self,
        key: &str,
        secret: &str,
    ) -> VaultResult<Option<T>> {
        Ok(self.load(key, secret)?.into_option())
    }

    /// Remove a collection outright; there is no soft delete
    pub fn delete(&self, key: &str) -> VaultResult<()> {
        self.store.remove(key)
    }

    /// Re-encrypt one collection under a new secret
    ///
    /// Storage confidentiality is tied to the user's password hash, so a
    /// password change must rotate every collection the user owns or they
    /// become unreadable. Returns whether a record was rotated; a missing key
    /// is a no-op and an unreadable record is left untouched.
    pub fn rotate_secret(
        &self,
        key: &str,
        old_secret: &str,
        new_secret: &str,
    ) -> VaultResult<bool> {
        match self.load::<serde_json::Value>(key, old_secret)? {
            LoadOutcome::Decrypted(value) | LoadOutcome::Legacy(value) => {
                self.save(key, &value, new_secret)?;
                Ok(true)
            }
            LoadOutcome::Missing => Ok(false),
            LoadOutcome::Unreadable => {
                warn!(key, "record not readable with old secret, skipping rotation");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Recurrence, Transaction, TransactionType};
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    fn test_store() -> EncryptedStore<MemoryStore> {
        EncryptedStore::new(MemoryStore::new(), "flow")
            .with_kdf_params(KdfParams::with_values(1024, 1, 1))
    }

    fn sample_transactions() -> Vec<Transaction> {
        vec![
            Transaction::new("Rent", 900.0, TransactionType::Expense, "Jan 1, 2025"),
            Transaction::new("Streaming", 10.0, TransactionType::Expense, "Jan 5, 2025")
                .with_recurrence(
                    Recurrence::Monthly,
                    NaiveDate::from_ymd_opt(2025, 2, 5).unwrap(),
                ),
        ]
    }

    #[test]
    fn test_key_for_scoping() {
        let store = test_store();
        assert_eq!(
            store.key_for("transactions", Some("u1")),
            "flow_transactions_u1"
        );
        assert_eq!(store.key_for("transactions", None), "flow_transactions");
        assert_ne!(
            store.key_for("transactions", Some("u1")),
            store.key_for("transactions", Some("u2"))
        );
    }

    #[test]
    fn test_save_load_round_trip() {
        let store = test_store();
        let key = store.key_for("transactions", Some("u1"));
        let txns = sample_transactions();

        store.save(&key, &txns, "secret").unwrap();

        let outcome: LoadOutcome<Vec<Transaction>> = store.load(&key, "secret").unwrap();
        assert_eq!(outcome, LoadOutcome::Decrypted(txns));
    }

    #[test]
    fn test_saved_value_is_an_envelope_on_disk() {
        let store = test_store();
        store.save("flow_settings", &vec!["dark-mode"], "secret").unwrap();

        let raw = store.inner().get("flow_settings").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.get("iv").is_some());
        assert!(value.get("data").is_some());
        assert!(value.get("salt").is_some());
        assert!(!raw.contains("dark-mode"));
    }

    #[test]
    fn test_missing_key() {
        let store = test_store();
        let outcome: LoadOutcome<Vec<Transaction>> =
            store.load("flow_transactions_nobody", "secret").unwrap();
        assert_eq!(outcome, LoadOutcome::Missing);
        assert!(!outcome.record_exists());
        assert_eq!(outcome.into_option(), None);
    }

    #[test]
    fn test_wrong_secret_is_unreadable_not_missing() {
        let store = test_store();
        store.save("k", &sample_transactions(), "right").unwrap();

        let outcome: LoadOutcome<Vec<Transaction>> = store.load("k", "wrong").unwrap();
        assert_eq!(outcome, LoadOutcome::Unreadable);
        assert!(outcome.record_exists());
    }

    #[test]
    fn test_legacy_plaintext_record_migrates() {
        let store = test_store();
        let txns = sample_transactions();

        // Simulate a record written before encryption existed
        let raw = serde_json::to_string(&txns).unwrap();
        store.inner().set("flow_transactions_u1", &raw).unwrap();

        let outcome: LoadOutcome<Vec<Transaction>> =
            store.load("flow_transactions_u1", "secret").unwrap();
        assert_eq!(outcome, LoadOutcome::Legacy(txns.clone()));

        // Re-save completes the migration; subsequent loads decrypt
        store.save("flow_transactions_u1", &txns, "secret").unwrap();
        let outcome: LoadOutcome<Vec<Transaction>> =
            store.load("flow_transactions_u1", "secret").unwrap();
        assert_eq!(outcome, LoadOutcome::Decrypted(txns));
    }

    #[test]
    fn test_garbage_record_is_unreadable() {
        let store = test_store();
        store.inner().set("k", "{ not json").unwrap();

        let outcome: LoadOutcome<Vec<Transaction>> = store.load("k", "secret").unwrap();
        assert_eq!(outcome, LoadOutcome::Unreadable);
    }

    #[test]
    fn test_load_or_none_collapses_failures() {
        let store = test_store();
        store.save("k", &sample_transactions(), "right").unwrap();

        let missing: Option<Vec<Transaction>> = store.load_or_none("absent", "right").unwrap();
        let wrong: Option<Vec<Transaction>> = store.load_or_none("k", "wrong").unwrap();
        let ok: Option<Vec<Transaction>> = store.load_or_none("k", "right").unwrap();

        assert!(missing.is_none());
        assert!(wrong.is_none());
        assert_eq!(ok.unwrap().len(), 2);
    }

    #[test]
    fn test_delete_removes_record() {
        let store = test_store();
        store.save("k", &sample_transactions(), "secret").unwrap();
        store.delete("k").unwrap();

        let outcome: LoadOutcome<Vec<Transaction>> = store.load("k", "secret").unwrap();
        assert_eq!(outcome, LoadOutcome::Missing);
    }

    #[test]
    fn test_rotate_secret_re_encrypts() {
        let store = test_store();
        let txns = sample_transactions();
        store.save("k", &txns, "old").unwrap();

        assert!(store.rotate_secret("k", "old", "new").unwrap());

        let outcome: LoadOutcome<Vec<Transaction>> = store.load("k", "new").unwrap();
        assert_eq!(outcome, LoadOutcome::Decrypted(txns));
        let stale: LoadOutcome<Vec<Transaction>> = store.load("k", "old").unwrap();
        assert_eq!(stale, LoadOutcome::Unreadable);
    }

    #[test]
    fn test_rotate_secret_missing_and_unreadable() {
        let store = test_store();
        assert!(!store.rotate_secret("absent", "old", "new").unwrap());

        store.save("k", &sample_transactions(), "right").unwrap();
        assert!(!store.rotate_secret("k", "wrong", "new").unwrap());
        // Untouched: still readable with the original secret
        let outcome: LoadOutcome<Vec<Transaction>> = store.load("k", "right").unwrap();
        assert!(matches!(outcome, LoadOutcome::Decrypted(_)));
    }

    #[test]
    fn test_fresh_envelope_every_save() {
        let store = test_store();
        let txns = sample_transactions();

        store.save("k", &txns, "secret").unwrap();
        let first = store.inner().get("k").unwrap().unwrap();
        store.save("k", &txns, "secret").unwrap();
        let second = store.inner().get("k").unwrap().unwrap();

        let first: Envelope = serde_json::from_str(&first).unwrap();
        let second: Envelope = serde_json::from_str(&second).unwrap();
        assert_ne!(first.salt, second.salt);
        assert_ne!(first.iv, second.iv);
    }
}
