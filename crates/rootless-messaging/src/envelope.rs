//! The encrypted message envelope.
//!
//! Envelopes are typed, schema-validated wire records: unknown fields are
//! rejected and every hex field is length-checked during parsing, before any
//! cryptographic operation touches the input. The MAC is verified in
//! constant time before decryption; a failed MAC never yields plaintext.

use rand::RngCore;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use rootless_core::{Identity, PublicKey};

use crate::cipher::{keystream_xor, NONCE_LEN};
use crate::error::MessagingError;
use crate::keys::SharedSecret;
use crate::suite::{active_suite, HashSuite};

/// Length of the message-id fingerprint in bytes (16 hex chars).
const MESSAGE_ID_LEN: usize = 8;

/// A fresh random per-message nonce, hex-encoded on the wire.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Nonce(pub [u8; NONCE_LEN]);

impl Nonce {
    /// Generate from the OS random source.
    pub fn generate() -> Self {
        let mut bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Raw nonce bytes.
    pub const fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }
}

impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nonce({})", hex::encode(self.0))
    }
}

impl Serialize for Nonce {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for Nonce {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(D::Error::custom)?;
        let arr: [u8; NONCE_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| D::Error::custom(format!("nonce must be {NONCE_LEN} bytes")))?;
        Ok(Self(arr))
    }
}

/// A 32-byte envelope MAC, hex-encoded on the wire.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct MacTag(pub [u8; 32]);

impl MacTag {
    /// Raw tag bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for MacTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacTag({}...)", &hex::encode(self.0)[..16])
    }
}

impl Serialize for MacTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for MacTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(D::Error::custom)?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| D::Error::custom("mac must be 32 bytes"))?;
        Ok(Self(arr))
    }
}

/// Hex-string serde for variable-length byte fields.
mod hex_vec {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(&s).map_err(D::Error::custom)
    }
}

/// An encrypted, authenticated message in transit.
///
/// Wire value only: produced by [`encrypt`], consumed by [`decrypt`]. No
/// ordering or replay window is enforced; `message_id` is a non-secret
/// fingerprint for deduplication and display, never authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Envelope {
    /// Sender's public key.
    pub sender_public_key: PublicKey,

    /// Recipient's public key.
    pub recipient_public_key: PublicKey,

    /// XOR-encrypted message bytes.
    #[serde(with = "hex_vec")]
    pub ciphertext: Vec<u8>,

    /// Per-message random nonce.
    pub nonce: Nonce,

    /// MAC over `nonce || ciphertext`.
    pub mac: MacTag,

    /// Creation time, Unix seconds.
    pub timestamp: i64,

    /// Non-secret fingerprint of the plaintext and timestamp.
    pub message_id: String,
}

impl Envelope {
    /// Serialize to the canonical JSON wire form.
    pub fn to_json(&self) -> Result<String, MessagingError> {
        serde_json::to_string(self).map_err(|e| MessagingError::Encoding(e.to_string()))
    }

    /// Parse from the canonical JSON wire form, validating shape.
    pub fn from_json(json: &str) -> Result<Self, MessagingError> {
        serde_json::from_str(json).map_err(|e| MessagingError::MalformedEnvelope(e.to_string()))
    }
}

/// Encrypt a message from `sender` to the holder of `recipient_public_key`,
/// using the process-wide suite. Returns the serialized envelope.
pub fn encrypt(
    message: &str,
    sender: &Identity,
    recipient_public_key: &PublicKey,
) -> Result<String, MessagingError> {
    let envelope = encrypt_with(active_suite(), message, sender, recipient_public_key);
    envelope.to_json()
}

/// Encrypt under an explicit suite. Both parties must use the same suite.
pub fn encrypt_with(
    suite: &dyn HashSuite,
    message: &str,
    sender: &Identity,
    recipient_public_key: &PublicKey,
) -> Envelope {
    let sender_public_key = sender.public_key();
    let timestamp = unix_now();
    let nonce = Nonce::generate();

    let secret = SharedSecret::derive(suite, &sender_public_key, recipient_public_key);
    let encryption_key = secret.encryption_key(suite);
    let mac_key = secret.mac_key(suite);

    let ciphertext = keystream_xor(suite, &encryption_key, nonce.as_bytes(), message.as_bytes());

    let mut mac_input = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    mac_input.extend_from_slice(nonce.as_bytes());
    mac_input.extend_from_slice(&ciphertext);
    let mac = MacTag(suite.mac(mac_key.as_bytes(), &mac_input));

    let message_id = message_fingerprint(suite, message, timestamp);

    Envelope {
        sender_public_key,
        recipient_public_key: *recipient_public_key,
        ciphertext,
        nonce,
        mac,
        timestamp,
        message_id,
    }
}

/// Decrypt a serialized envelope addressed to `recipient`, checking that it
/// came from the holder of `sender_public_key`. Uses the process-wide suite.
pub fn decrypt(
    envelope_json: &str,
    recipient: &Identity,
    sender_public_key: &PublicKey,
) -> Result<String, MessagingError> {
    let envelope = Envelope::from_json(envelope_json)?;
    decrypt_with(active_suite(), &envelope, recipient, sender_public_key)
}

/// Decrypt under an explicit suite.
///
/// The MAC is recomputed and compared in constant time before any
/// decryption happens; on mismatch this fails with
/// [`MessagingError::AuthenticationFailed`] and returns no plaintext bytes.
pub fn decrypt_with(
    suite: &dyn HashSuite,
    envelope: &Envelope,
    recipient: &Identity,
    sender_public_key: &PublicKey,
) -> Result<String, MessagingError> {
    if &envelope.sender_public_key != sender_public_key {
        return Err(MessagingError::SenderMismatch);
    }

    let secret = SharedSecret::derive(suite, sender_public_key, &recipient.public_key());
    let mac_key = secret.mac_key(suite);

    let mut mac_input = Vec::with_capacity(NONCE_LEN + envelope.ciphertext.len());
    mac_input.extend_from_slice(envelope.nonce.as_bytes());
    mac_input.extend_from_slice(&envelope.ciphertext);

    if !suite.verify_mac(mac_key.as_bytes(), &mac_input, envelope.mac.as_bytes()) {
        tracing::warn!(
            message_id = %envelope.message_id,
            "rejected envelope: MAC verification failed"
        );
        return Err(MessagingError::AuthenticationFailed);
    }

    let encryption_key = secret.encryption_key(suite);
    let plaintext = keystream_xor(
        suite,
        &encryption_key,
        envelope.nonce.as_bytes(),
        &envelope.ciphertext,
    );

    String::from_utf8(plaintext)
        .map_err(|_| MessagingError::MalformedEnvelope("plaintext is not UTF-8".into()))
}

/// Truncated digest of `message:timestamp`, for deduplication and display.
fn message_fingerprint(suite: &dyn HashSuite, message: &str, timestamp: i64) -> String {
    let digest = suite.digest(format!("{message}:{timestamp}").as_bytes());
    hex::encode(&digest[..MESSAGE_ID_LEN])
}

fn unix_now() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_secs() as i64
}
