//! Storage identity supplied by the authentication collaborator
//!
//! This crate never sees a user's raw password. The host authenticates the
//! user elsewhere and hands over a storage secret derived from durable
//! identity material: a fixed-length prefix of the user's stored password
//! hash. Only someone who already authenticated (and can therefore reproduce
//! that hash) can decrypt the user's collections, with no second secret to
//! manage. The accepted tradeoff is that a password change must re-encrypt
//! every stored collection (see `EncryptedStore::rotate_secret`).

use std::fmt;

use zeroize::Zeroizing;

/// Number of password-hash characters used as the storage secret
const SECRET_PREFIX_LEN: usize = 32;

/// Secret used for the unauthenticated, non-user-scoped collections
///
/// Data written without a signed-in user is obfuscated, not protected; there
/// is no identity material to bind it to.
const ANONYMOUS_SECRET: &str = "flowvault-local";

/// A user's storage identity: who they are plus what decrypts their data
pub struct StoreIdentity {
    user_id: Option<String>,
    secret: Zeroizing<String>,
}

impl StoreIdentity {
    /// Derive an identity from a user id and their stored password hash
    ///
    /// Takes the first [`SECRET_PREFIX_LEN`] characters of the hash as the
    /// storage secret; a shorter hash is used whole.
    pub fn derive(user_id: impl Into<String>, stored_password_hash: &str) -> Self {
        let prefix: String = stored_password_hash.chars().take(SECRET_PREFIX_LEN).collect();
        Self {
            user_id: Some(user_id.into()),
            secret: Zeroizing::new(prefix),
        }
    }

    /// The identity of the unauthenticated context
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            secret: Zeroizing::new(ANONYMOUS_SECRET.to_string()),
        }
    }

    /// The user id, `None` when unauthenticated
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// The storage secret to encrypt and decrypt with
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

// Never leak the secret through Debug output
impl fmt::Debug for StoreIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreIdentity")
            .field("user_id", &self.user_id)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
