//! Shared-secret and message-key derivation.
//!
//! Both parties derive the same secret from the pair of public keys alone;
//! there is no key-exchange handshake. The concatenation order is always
//! sender-then-recipient (roles are fixed per message, not per key-pair),
//! so the sender and the recipient of a given envelope compute identical
//! keys without negotiating.

use rootless_core::PublicKey;

use crate::suite::HashSuite;

/// The pair-derived shared secret: `H(sender_pk || recipient_pk)`.
pub struct SharedSecret([u8; 32]);

impl SharedSecret {
    /// Derive the shared secret for one message direction.
    pub fn derive(suite: &dyn HashSuite, sender: &PublicKey, recipient: &PublicKey) -> Self {
        let mut input = Vec::with_capacity(64);
        input.extend_from_slice(sender.as_bytes());
        input.extend_from_slice(recipient.as_bytes());
        Self(suite.digest(&input))
    }

    /// Domain-separated encryption key: `H(secret || "encryption")`.
    pub fn encryption_key(&self, suite: &dyn HashSuite) -> EncryptionKey {
        EncryptionKey(self.expand(suite, b"encryption"))
    }

    /// Domain-separated MAC key: `H(secret || "authentication")`.
    pub fn mac_key(&self, suite: &dyn HashSuite) -> MacKey {
        MacKey(self.expand(suite, b"authentication"))
    }

    fn expand(&self, suite: &dyn HashSuite, label: &[u8]) -> [u8; 32] {
        let mut input = Vec::with_capacity(32 + label.len());
        input.extend_from_slice(&self.0);
        input.extend_from_slice(label);
        suite.digest(&input)
    }
}

/// Key for the keystream cipher. Never used for authentication.
pub struct EncryptionKey(pub(crate) [u8; 32]);

impl EncryptionKey {
    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Key for the envelope MAC. Never used for confidentiality.
pub struct MacKey(pub(crate) [u8; 32]);

impl MacKey {
    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}
