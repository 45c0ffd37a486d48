//! Deterministic protocol vectors.
//!
//! Each vector pins an identity seed, a body, and a timestamp; every
//! derivation downstream of those inputs (DID, CID, signature, wire JSON)
//! must be reproducible run over run and machine over machine. The expected
//! values are recomputed rather than hardcoded, so the vectors check
//! determinism and internal consistency, not historical bytes.

use rootless_core::{Cid, Content, Did, Identity};

/// A pinned set of protocol inputs.
#[derive(Debug, Clone)]
pub struct ProtocolVector {
    pub name: &'static str,
    pub seed: [u8; 32],
    pub body: &'static str,
    pub created_at: i64,
}

/// Everything derived from a vector's inputs.
#[derive(Debug, Clone)]
pub struct DerivedVector {
    pub did: Did,
    pub cid: Cid,
    pub content: Content,
    pub content_json: String,
}

/// The standard vector set.
pub fn all_vectors() -> Vec<ProtocolVector> {
    vec![
        ProtocolVector {
            name: "empty_body",
            seed: [0x01; 32],
            body: "",
            created_at: 0,
        },
        ProtocolVector {
            name: "hello",
            seed: [0x02; 32],
            body: "Hello, RootlessNet!",
            created_at: 1_736_870_400,
        },
        ProtocolVector {
            name: "unicode_body",
            seed: [0x03; 32],
            body: "メッセージ ✶ mixed",
            created_at: 1_736_870_401,
        },
        ProtocolVector {
            name: "colon_heavy_body",
            seed: [0x04; 32],
            body: "a:b:c:d",
            created_at: 1_736_870_402,
        },
        ProtocolVector {
            name: "long_body",
            seed: [0x05; 32],
            body: "lorem ipsum dolor sit amet consectetur adipiscing elit sed do \
                   eiusmod tempor incididunt ut labore et dolore magna aliqua",
            created_at: 2_000_000_000,
        },
    ]
}

/// Derive everything from a vector's pinned inputs.
pub fn derive_vector(vector: &ProtocolVector) -> DerivedVector {
    let identity = Identity::from_seed(&vector.seed, None);
    let content = Content::create_at(vector.body, &identity, vector.created_at);
    let content_json = content.canonical_json().expect("vector content serializes");

    DerivedVector {
        did: identity.did().clone(),
        cid: content.cid.clone(),
        content,
        content_json,
    }
}

/// Check every vector: derivations are deterministic, signatures verify,
/// and the wire form round-trips. Panics on the first violation.
pub fn verify_all_vectors() {
    for vector in all_vectors() {
        let first = derive_vector(&vector);
        let second = derive_vector(&vector);

        assert_eq!(first.did, second.did, "did drifted for {}", vector.name);
        assert_eq!(first.cid, second.cid, "cid drifted for {}", vector.name);
        assert_eq!(
            first.content_json, second.content_json,
            "canonical json drifted for {}",
            vector.name
        );
        assert!(
            first.content.verify(),
            "signature failed for {}",
            vector.name
        );

        let reimported = Content::import_json(&first.content_json)
            .unwrap_or_else(|e| panic!("reimport failed for {}: {e}", vector.name));
        assert_eq!(
            reimported, first.content,
            "roundtrip drifted for {}",
            vector.name
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vectors_hold() {
        verify_all_vectors();
    }

    #[test]
    fn vectors_are_pairwise_distinct() {
        let derived: Vec<DerivedVector> = all_vectors().iter().map(derive_vector).collect();
        for (i, a) in derived.iter().enumerate() {
            for b in &derived[i + 1..] {
                assert_ne!(a.did, b.did);
                assert_ne!(a.cid, b.cid);
            }
        }
    }
}
