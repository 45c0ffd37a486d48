//! Test fixtures and helpers.
//!
//! Common setup code for integration tests across the protocol crates.

use rootless_core::{Content, Identity, PublicKey};
use rootless_ledger::{Block, Chain, ChainConfig};
use rootless_messaging::{encrypt, Envelope};

/// A test fixture with one identity and its chain.
pub struct TestFixture {
    pub identity: Identity,
    pub chain: Chain,
}

impl TestFixture {
    /// Fixture with a random identity and a low-difficulty chain.
    pub fn new() -> Self {
        Self::with_identity(Identity::create(None))
    }

    /// Fixture with a deterministic identity from a seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self::with_identity(Identity::from_seed(&seed, None))
    }

    fn with_identity(identity: Identity) -> Self {
        // Difficulty 1 keeps mined tests fast while still exercising the
        // nonce search.
        let chain = Chain::with_config(ChainConfig {
            difficulty: 1,
            ..ChainConfig::default()
        });
        Self { identity, chain }
    }

    /// The fixture identity's public key.
    pub fn public_key(&self) -> PublicKey {
        self.identity.public_key()
    }

    /// Create signed content authored by the fixture identity.
    pub fn make_content(&self, body: &str) -> Content {
        Content::create(body, &self.identity)
    }

    /// Create signed content with a pinned timestamp.
    pub fn make_content_at(&self, body: &str, created_at: i64) -> Content {
        Content::create_at(body, &self.identity, created_at)
    }

    /// Post a body onto the fixture chain.
    pub fn post(&mut self, body: &str) -> Block {
        let content = self.make_content(body);
        self.chain
            .add_block(content, self.identity.did().clone())
            .expect("fixture post should append")
    }

    /// Encrypt a message from this fixture to a recipient key.
    pub fn send(&self, text: &str, recipient: &PublicKey) -> Envelope {
        let json = encrypt(text, &self.identity, recipient).expect("fixture encrypt");
        Envelope::from_json(&json).expect("fixture envelope parses")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple fixtures with distinct deterministic identities.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            seed[31] = 0x5f;
            TestFixture::with_seed(seed)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_posts_valid_blocks() {
        let mut fixture = TestFixture::new();
        let block = fixture.post("hello");

        assert_eq!(block.index, 1);
        assert!(block.content.verify());
        assert!(fixture.chain.is_valid());
    }

    #[test]
    fn multi_party_identities_are_distinct() {
        let parties = multi_party_fixtures(3);
        assert_ne!(parties[0].public_key(), parties[1].public_key());
        assert_ne!(parties[1].public_key(), parties[2].public_key());
        assert_ne!(parties[0].public_key(), parties[2].public_key());
    }

    #[test]
    fn fixtures_can_exchange_messages() {
        let parties = multi_party_fixtures(2);
        let envelope = parties[0].send("ping", &parties[1].public_key());
        let plaintext = rootless_messaging::decrypt_with(
            rootless_messaging::active_suite(),
            &envelope,
            &parties[1].identity,
            &parties[0].public_key(),
        )
        .unwrap();
        assert_eq!(plaintext, "ping");
    }
}
