//! Self-sovereign identities.
//!
//! An identity is an Ed25519 keypair plus a decentralized identifier (DID)
//! derived from the public key. Identities sign content and messages; they
//! are created once and never mutated, and there is no revocation mechanism.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::{Digest128, Keypair, PublicKey, Signature};
use crate::error::CoreError;

/// Prefix of every key-derived RootlessNet DID.
pub const DID_PREFIX: &str = "did:rootless:key:";

/// A decentralized identifier.
///
/// Key-derived DIDs have the form `did:rootless:key:<32 hex chars>`, the hex
/// being the 128-bit Blake3 truncation of the public key. The ledger also
/// carries the reserved `SYSTEM` identifier on its genesis block.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Did(String);

impl Did {
    /// Derive the DID for a public key.
    pub fn derive(public_key: &PublicKey) -> Self {
        let digest = Digest128::of(public_key.as_bytes());
        Self(format!("{DID_PREFIX}{}", digest.to_hex()))
    }

    /// The identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is a key-derived DID (as opposed to a reserved
    /// identifier such as the genesis author).
    pub fn is_key_derived(&self) -> bool {
        self.0.len() == DID_PREFIX.len() + 32
            && self.0.starts_with(DID_PREFIX)
            && self.0[DID_PREFIX.len()..]
                .bytes()
                .all(|b| b.is_ascii_hexdigit())
    }
}

impl fmt::Debug for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Did({})", self.0)
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Did {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Did {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A self-sovereign identity: keypair, DID, optional display name.
#[derive(Clone)]
pub struct Identity {
    did: Did,
    name: Option<String>,
    keypair: Keypair,
    created_at: i64,
}

/// Wire form of an identity, field names per the serialization contract.
///
/// `private_key` is the hex seed in plaintext. That is deliberate: the
/// persistence collaborator stores this record verbatim, and the encrypted
/// backup collaborator exists to wrap it. See the crate docs.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct IdentityRecord {
    did: String,
    name: Option<String>,
    public_key: String,
    private_key: String,
    created_at: i64,
}

impl Identity {
    /// Create a new identity with a fresh keypair.
    ///
    /// Key material comes from the OS random source and is never reused
    /// across calls.
    pub fn create(name: Option<&str>) -> Self {
        Self::build(Keypair::generate(), name, unix_now())
    }

    /// Rebuild an identity from a 32-byte seed.
    ///
    /// Deterministic; used by tests and by embedders that own key storage.
    pub fn from_seed(seed: &[u8; 32], name: Option<&str>) -> Self {
        Self::build(Keypair::from_seed(seed), name, unix_now())
    }

    fn build(keypair: Keypair, name: Option<&str>, created_at: i64) -> Self {
        let did = Did::derive(&keypair.public_key());
        Self {
            did,
            name: name.map(String::from),
            keypair,
            created_at,
        }
    }

    /// The decentralized identifier.
    pub fn did(&self) -> &Did {
        &self.did
    }

    /// The display name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Creation time, Unix seconds.
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// The public key.
    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    /// The keypair, for signing and for the backup collaborator.
    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    /// Sign an arbitrary payload.
    pub fn sign(&self, payload: &[u8]) -> Signature {
        self.keypair.sign(payload)
    }

    /// Verify a signature over a payload using only public material.
    ///
    /// Pure function; an invalid or malformed signature is `false`, never an
    /// error.
    pub fn verify(public_key: &PublicKey, payload: &[u8], signature: &Signature) -> bool {
        public_key.verify(payload, signature).is_ok()
    }

    /// Export to the canonical JSON wire form.
    ///
    /// The record contains the private key seed in plaintext hex.
    pub fn export_json(&self) -> Result<String, CoreError> {
        let record = IdentityRecord {
            did: self.did.as_str().to_string(),
            name: self.name.clone(),
            public_key: self.public_key().to_hex(),
            private_key: hex::encode(self.keypair.seed()),
            created_at: self.created_at,
        };
        serde_json::to_string_pretty(&record).map_err(|e| CoreError::Encoding(e.to_string()))
    }

    /// Import from the canonical JSON wire form.
    ///
    /// Rejects malformed JSON, bad hex, wrong key lengths, a public key that
    /// does not belong to the private key, and a DID that does not match the
    /// public key. Security-relevant fields are never defaulted.
    pub fn import_json(json: &str) -> Result<Self, CoreError> {
        let record: IdentityRecord =
            serde_json::from_str(json).map_err(|e| CoreError::malformed(e.to_string()))?;

        let seed_bytes =
            hex::decode(&record.private_key).map_err(|e| CoreError::malformed(e.to_string()))?;
        let seed: [u8; 32] = seed_bytes
            .as_slice()
            .try_into()
            .map_err(|_| CoreError::malformed("private key must be 32 bytes"))?;
        let keypair = Keypair::from_seed(&seed);

        let public_key = PublicKey::from_hex(&record.public_key)?;
        if public_key != keypair.public_key() {
            return Err(CoreError::malformed(
                "public key does not belong to private key",
            ));
        }

        let did = Did::derive(&public_key);
        if did.as_str() != record.did {
            return Err(CoreError::malformed("did does not match public key"));
        }

        Ok(Self {
            did,
            name: record.name,
            keypair,
            created_at: record.created_at,
        })
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("did", &self.did)
            .field("name", &self.name)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

fn unix_now() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_secs() as i64
}
