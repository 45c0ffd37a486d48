//! Pluggable hash suite for the symmetric layer of messaging.
//!
//! The digest, keystream, and MAC primitives are behind one trait with two
//! interchangeable implementations: Blake3 (the preferred, self-accelerating
//! one) and SHA-256 + HMAC-SHA-256 (a portable fallback). The active suite
//! is selected once at startup and cached; envelopes produced under one
//! suite do not decrypt under the other, so both parties must run the same
//! selection.
//!
//! Content addressing (DID/CID) does not go through the suite: identifiers
//! must stay stable across builds and are always Blake3.

use hmac::{Hmac, Mac as _};
use sha2::{Digest as _, Sha256};
use std::sync::OnceLock;

/// Digest and MAC primitives used by the messaging cipher.
pub trait HashSuite: Send + Sync {
    /// Suite name, for diagnostics.
    fn name(&self) -> &'static str;

    /// 32-byte digest of `data`.
    fn digest(&self, data: &[u8]) -> [u8; 32];

    /// 32-byte MAC over `data` under a 32-byte key.
    fn mac(&self, key: &[u8; 32], data: &[u8]) -> [u8; 32];

    /// Constant-time comparison of `tag` against the MAC of `data`.
    fn verify_mac(&self, key: &[u8; 32], data: &[u8], tag: &[u8; 32]) -> bool;
}

/// Blake3-backed suite. The library picks its fastest implementation
/// (SIMD where available) at runtime.
#[derive(Debug, Default)]
pub struct Blake3Suite;

impl HashSuite for Blake3Suite {
    fn name(&self) -> &'static str {
        "blake3"
    }

    fn digest(&self, data: &[u8]) -> [u8; 32] {
        *blake3::hash(data).as_bytes()
    }

    fn mac(&self, key: &[u8; 32], data: &[u8]) -> [u8; 32] {
        *blake3::keyed_hash(key, data).as_bytes()
    }

    fn verify_mac(&self, key: &[u8; 32], data: &[u8], tag: &[u8; 32]) -> bool {
        // blake3::Hash equality is constant-time.
        blake3::keyed_hash(key, data) == blake3::Hash::from(*tag)
    }
}

/// Portable SHA-256 suite, the fallback candidate.
#[derive(Debug, Default)]
pub struct Sha256Suite;

impl HashSuite for Sha256Suite {
    fn name(&self) -> &'static str {
        "sha256"
    }

    fn digest(&self, data: &[u8]) -> [u8; 32] {
        Sha256::digest(data).into()
    }

    fn mac(&self, key: &[u8; 32], data: &[u8]) -> [u8; 32] {
        let mut mac =
            Hmac::<Sha256>::new_from_slice(key).expect("HMAC can take key of any size");
        mac.update(data);
        mac.finalize().into_bytes().into()
    }

    fn verify_mac(&self, key: &[u8; 32], data: &[u8], tag: &[u8; 32]) -> bool {
        let mut mac =
            Hmac::<Sha256>::new_from_slice(key).expect("HMAC can take key of any size");
        mac.update(data);
        mac.verify_slice(tag).is_ok()
    }
}

static BLAKE3_SUITE: Blake3Suite = Blake3Suite;

/// The suite selected for this process. Detection runs once; every
/// subsequent call returns the cached choice.
pub fn active_suite() -> &'static dyn HashSuite {
    static ACTIVE: OnceLock<&'static dyn HashSuite> = OnceLock::new();
    *ACTIVE.get_or_init(detect)
}

/// Pick the best available suite. Blake3 is compiled in and self-selects
/// its accelerated code paths, so it always wins; the SHA-256 suite stays
/// available for explicit use via [`encrypt_with`](crate::encrypt_with).
fn detect() -> &'static dyn HashSuite {
    &BLAKE3_SUITE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suites() -> Vec<Box<dyn HashSuite>> {
        vec![Box::new(Blake3Suite), Box::new(Sha256Suite)]
    }

    #[test]
    fn digests_are_deterministic_and_distinct_per_suite() {
        for suite in suites() {
            assert_eq!(suite.digest(b"data"), suite.digest(b"data"));
            assert_ne!(suite.digest(b"data"), suite.digest(b"other"));
        }
        assert_ne!(
            Blake3Suite.digest(b"data"),
            Sha256Suite.digest(b"data"),
            "suites are not interchangeable on the wire"
        );
    }

    #[test]
    fn mac_verifies_and_rejects() {
        let key = [0x42u8; 32];
        for suite in suites() {
            let tag = suite.mac(&key, b"payload");
            assert!(suite.verify_mac(&key, b"payload", &tag));
            assert!(!suite.verify_mac(&key, b"payload!", &tag));

            let mut wrong_key = key;
            wrong_key[0] ^= 1;
            assert!(!suite.verify_mac(&wrong_key, b"payload", &tag));

            let mut wrong_tag = tag;
            wrong_tag[31] ^= 1;
            assert!(!suite.verify_mac(&key, b"payload", &wrong_tag));
        }
    }

    #[test]
    fn detection_is_stable() {
        assert_eq!(active_suite().name(), active_suite().name());
        assert_eq!(active_suite().name(), "blake3");
    }
}
