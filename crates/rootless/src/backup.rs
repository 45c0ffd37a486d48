//! Password-protected identity backup.
//!
//! The identity wire JSON carries the private key seed in plaintext; this
//! module is the collaborator that wraps it. It is pure blob-in/blob-out;
//! callers own storage. Blob layout: `salt(16) || nonce(12) || ciphertext`,
//! where the key is Argon2id over the password and salt and the cipher is
//! ChaCha20-Poly1305.

use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Nonce};
use rand::RngCore;
use thiserror::Error;

use rootless_core::Identity;

/// Salt length for Argon2 (128 bits).
pub const SALT_LEN: usize = 16;

/// Nonce length for ChaCha20-Poly1305 (96 bits).
pub const NONCE_LEN: usize = 12;

/// Poly1305 authentication tag length.
const TAG_LEN: usize = 16;

/// Errors that can occur while sealing or opening a backup.
#[derive(Debug, Error)]
pub enum BackupError {
    /// The password could not be stretched into a key.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// The payload could not be encrypted.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Wrong password or tampered blob. No plaintext is returned.
    #[error("decryption failed (wrong password or corrupted backup)")]
    DecryptionFailed,

    /// The blob is too short or otherwise not a backup.
    #[error("invalid backup format: {0}")]
    InvalidFormat(String),
}

/// Seal an opaque payload under a password.
///
/// The payload is treated as opaque bytes; callers normally pass the
/// identity wire JSON.
pub fn seal(payload: &[u8], password: &str) -> Result<Vec<u8>, BackupError> {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);

    let mut nonce_bytes = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);

    let key = derive_key(password, &salt)?;
    let cipher = ChaCha20Poly1305::new(&key.into());
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), payload)
        .map_err(|e| BackupError::Encryption(e.to_string()))?;

    let mut blob = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(&salt);
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Open a sealed blob with the password it was sealed under.
pub fn open(blob: &[u8], password: &str) -> Result<Vec<u8>, BackupError> {
    if blob.len() < SALT_LEN + NONCE_LEN + TAG_LEN {
        return Err(BackupError::InvalidFormat(format!(
            "blob too short: {} bytes",
            blob.len()
        )));
    }

    let salt = &blob[..SALT_LEN];
    let nonce = &blob[SALT_LEN..SALT_LEN + NONCE_LEN];
    let ciphertext = &blob[SALT_LEN + NONCE_LEN..];

    let key = derive_key(password, salt)?;
    let cipher = ChaCha20Poly1305::new(&key.into());
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| BackupError::DecryptionFailed)
}

/// Seal an identity's wire JSON under a password.
pub fn export_identity(identity: &Identity, password: &str) -> Result<Vec<u8>, BackupError> {
    let json = identity
        .export_json()
        .map_err(|e| BackupError::Encryption(e.to_string()))?;
    seal(json.as_bytes(), password)
}

/// Open a sealed identity backup and rebuild the identity.
pub fn import_identity(blob: &[u8], password: &str) -> Result<Identity, BackupError> {
    let plaintext = open(blob, password)?;
    let json = String::from_utf8(plaintext)
        .map_err(|_| BackupError::InvalidFormat("payload is not UTF-8".into()))?;
    Identity::import_json(&json).map_err(|e| BackupError::InvalidFormat(e.to_string()))
}

/// Stretch the password into a 256-bit key with Argon2id.
///
/// OWASP-recommended parameters: 64 MiB memory, 3 iterations, 4 lanes.
fn derive_key(password: &str, salt: &[u8]) -> Result<[u8; 32], BackupError> {
    let params = Params::new(65536, 3, 4, Some(32))
        .map_err(|e| BackupError::KeyDerivation(e.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let salt_string =
        SaltString::encode_b64(salt).map_err(|e| BackupError::KeyDerivation(e.to_string()))?;
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt_string)
        .map_err(|e| BackupError::KeyDerivation(e.to_string()))?;
    let output = password_hash
        .hash
        .ok_or_else(|| BackupError::KeyDerivation("empty hash output".into()))?;

    let bytes = output.as_bytes();
    if bytes.len() < 32 {
        return Err(BackupError::KeyDerivation("derived key too short".into()));
    }
    let mut key = [0u8; 32];
    key.copy_from_slice(&bytes[..32]);
    Ok(key)
}
