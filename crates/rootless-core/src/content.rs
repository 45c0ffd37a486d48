//! Signed, content-addressed posts.
//!
//! A `Content` is immutable once created: its CID is derived from the author,
//! body, and creation time, and its Ed25519 signature covers the CID plus
//! those same fields. Verification needs only the embedded public key.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::{Digest128, PublicKey, Signature};
use crate::error::CoreError;
use crate::identity::{Did, Identity};

/// Fixed tag prefixing every content identifier.
pub const CID_PREFIX: &str = "bafk";

/// A content identifier: `bafk<32 hex chars>`, the hex being the 128-bit
/// Blake3 truncation of `author:body:created_at`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cid(String);

impl Cid {
    /// Derive the CID for a post.
    pub fn derive(author: &Did, body: &str, created_at: i64) -> Self {
        let preimage = format!("{author}:{body}:{created_at}");
        let digest = Digest128::of(preimage.as_bytes());
        Self(format!("{CID_PREFIX}{}", digest.to_hex()))
    }

    /// The identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cid({})", self.0)
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An immutable, author-signed post.
///
/// This struct is its own wire form; the field order below is the canonical
/// JSON layout the ledger hashes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Content {
    /// Content identifier.
    pub cid: Cid,

    /// Author's DID.
    pub author: Did,

    /// Author's public key, recorded so anyone can verify the signature.
    pub author_public_key: PublicKey,

    /// The post body.
    pub body: String,

    /// Creation time, Unix seconds.
    pub created_at: i64,

    /// Ed25519 signature over `cid:author:body:created_at`.
    pub signature: Signature,
}

impl Content {
    /// Create and sign a post.
    ///
    /// Stamps the current time; no side effects beyond object construction.
    pub fn create(body: impl Into<String>, identity: &Identity) -> Self {
        Self::create_at(body, identity, unix_now())
    }

    /// Create and sign a post with an explicit timestamp.
    ///
    /// For tests and embedders that own the clock.
    pub fn create_at(body: impl Into<String>, identity: &Identity, created_at: i64) -> Self {
        let body = body.into();
        let author = identity.did().clone();
        let cid = Cid::derive(&author, &body, created_at);
        let payload = signing_payload(&cid, &author, &body, created_at);
        let signature = identity.sign(payload.as_bytes());

        Self {
            cid,
            author,
            author_public_key: identity.public_key(),
            body,
            created_at,
            signature,
        }
    }

    /// Verify the signature against the embedded public key.
    ///
    /// Uses public material only. Returns `false` for any mismatch,
    /// including malformed key or signature bytes; verification failure is
    /// an expected outcome of untrusted input, not an error.
    pub fn verify(&self) -> bool {
        let payload = signing_payload(&self.cid, &self.author, &self.body, self.created_at);
        self.author_public_key
            .verify(payload.as_bytes(), &self.signature)
            .is_ok()
    }

    /// The canonical JSON form, as hashed by the ledger.
    pub fn canonical_json(&self) -> Result<String, CoreError> {
        serde_json::to_string(self).map_err(|e| CoreError::Encoding(e.to_string()))
    }

    /// Export to the canonical JSON wire form.
    pub fn export_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self).map_err(|e| CoreError::Encoding(e.to_string()))
    }

    /// Import from the canonical JSON wire form.
    ///
    /// Validates shape only (field names, hex lengths); call
    /// [`Content::verify`] to check the signature.
    pub fn import_json(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json).map_err(|e| CoreError::malformed(e.to_string()))
    }
}

/// The exact byte string covered by a content signature.
fn signing_payload(cid: &Cid, author: &Did, body: &str, created_at: i64) -> String {
    format!("{cid}:{author}:{body}:{created_at}")
}

fn unix_now() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_secs() as i64
}
