//! flowvault - encrypted storage and subscription engine for Flow
//!
//! This library is the storage/recurrence core of the Flow personal finance
//! tracker. All user data lives client-side in a key-value store, encrypted
//! per user; recurring "subscription" transactions advance through billing
//! periods as real time passes.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `crypto`: AES-256-GCM envelope encryption with Argon2id key derivation
//! - `store`: injected key-value backends plus the encrypted, user-scoped
//!   collection store with legacy plaintext migration
//! - `models`: transactions, price tiers, and the receipt-scan struct
//! - `recurrence`: the pure billing-period state machine
//! - `projection`: the derived "upcoming transactions" view
//! - `dates`: localized date parsing and formatting
//! - `identity`: the storage secret handed over by the auth layer
//! - `error`: custom error types
//!
//! # Example
//!
//! ```rust,ignore
//! use flowvault::identity::StoreIdentity;
//! use flowvault::store::{EncryptedStore, FileStore};
//!
//! let identity = StoreIdentity::derive(user_id, stored_password_hash);
//! let store = EncryptedStore::new(FileStore::open_default()?, "flow");
//! let key = store.key_for("transactions", identity.user_id());
//!
//! let mut txns = store
//!     .load_or_none(&key, identity.secret())?
//!     .unwrap_or_default();
//! let advanced = flowvault::recurrence::process_to_current(&txns, today);
//! if advanced.has_changes {
//!     store.save(&key, &advanced.transactions, identity.secret())?;
//! }
//! ```

pub mod crypto;
pub mod dates;
pub mod error;
pub mod identity;
pub mod models;
pub mod projection;
pub mod recurrence;
pub mod store;

pub use error::{VaultError, VaultResult};
pub use identity::StoreIdentity;
pub use models::{PriceTier, Recurrence, Transaction, TransactionType};
pub use store::{EncryptedStore, LoadOutcome};
