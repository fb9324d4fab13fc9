//! Envelope encryption with AES-256-GCM
//!
//! Turns a secret plus a plaintext JSON payload into a portable, tamper-
//! evident envelope `{iv, data, salt}` and inverts that transform. Every
//! encryption generates a fresh salt and nonce, so neither the derived key nor
//! the IV is ever reused across saves of the same record.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

use crate::error::{VaultError, VaultResult};

use super::key_derivation::{derive_key, KdfParams};

/// Size of the KDF salt in bytes (128 bits)
const SALT_SIZE: usize = 16;

/// Size of the AES-GCM nonce in bytes (96 bits)
const NONCE_SIZE: usize = 12;

/// One encrypted blob as persisted in the key-value store
///
/// Field names match the stored JSON exactly; a record with all three of
/// these keys is recognized as an envelope at load time, anything else is
/// treated as a legacy plaintext record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// The AES-GCM nonce for this encryption (base64 encoded)
    pub iv: String,
    /// Ciphertext plus authentication tag (base64 encoded)
    pub data: String,
    /// The KDF salt for this encryption (base64 encoded)
    pub salt: String,
}

impl Envelope {
    fn decode_field(value: &str, name: &str) -> VaultResult<Vec<u8>> {
        STANDARD
            .decode(value)
            .map_err(|e| VaultError::Crypto(format!("Invalid {} encoding: {}", name, e)))
    }
}

/// Encrypt a plaintext string under a secret
///
/// Generates a fresh random salt and nonce, derives the key with Argon2id,
/// and seals the UTF-8 plaintext with AES-256-GCM. No part of the secret is
/// stored in the envelope.
pub fn encrypt(plaintext: &str, secret: &str, params: &KdfParams) -> VaultResult<Envelope> {
    let mut salt = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt);

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let key = derive_key(secret, &salt, params)?;

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::Crypto(format!("Failed to create cipher: {}", e)))?;

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|e| VaultError::Crypto(format!("Encryption failed: {}", e)))?;

    Ok(Envelope {
        iv: STANDARD.encode(nonce_bytes),
        data: STANDARD.encode(&ciphertext),
        salt: STANDARD.encode(salt),
    })
}

/// Decrypt an envelope back into its plaintext string
///
/// Re-derives the key from the envelope's own salt with identical KDF
/// parameters. Fails closed: a wrong secret, flipped bit, truncated
/// ciphertext, or malformed base64 all yield a [`VaultError::Crypto`] with no
/// partial output.
pub fn decrypt(envelope: &Envelope, secret: &str, params: &KdfParams) -> VaultResult<String> {
    let nonce_bytes = Envelope::decode_field(&envelope.iv, "iv")?;
    if nonce_bytes.len() != NONCE_SIZE {
        return Err(VaultError::Crypto(format!(
            "Invalid nonce size: expected {}, got {}",
            NONCE_SIZE,
            nonce_bytes.len()
        )));
    }
    let nonce = Nonce::from_slice(&nonce_bytes);

    let salt = Envelope::decode_field(&envelope.salt, "salt")?;
    let ciphertext = Envelope::decode_field(&envelope.data, "data")?;

    let key = derive_key(secret, &salt, params)?;

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::Crypto(format!("Failed to create cipher: {}", e)))?;

    let plaintext = cipher
        .decrypt(nonce, ciphertext.as_ref())
        .map_err(|_| VaultError::Crypto("Decryption failed: wrong secret or corrupted data".to_string()))?;

    String::from_utf8(plaintext)
        .map_err(|e| VaultError::Crypto(format!("Invalid UTF-8 in decrypted data: {}", e)))
}
