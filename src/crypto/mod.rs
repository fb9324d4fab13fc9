//! Cryptographic functions for flowvault
//!
//! Provides AES-256-GCM envelope encryption with Argon2id key derivation for
//! at-rest encryption of per-user collections.

pub mod envelope;
pub mod key_derivation;

pub use envelope::{decrypt, encrypt, Envelope};
pub use key_derivation::{derive_key, DerivedKey, KdfParams};
