//! The Node: one identity plus one chain behind a single API.
//!
//! A node owns its state outright; nothing here is a singleton. Share a
//! node across threads only behind caller-supplied synchronization.

use rootless_core::{Content, Identity, PublicKey};
use rootless_ledger::{Block, Chain, ChainConfig, MineOutcome, Miner};
use rootless_messaging as messaging;

use crate::error::{NodeError, Result};

/// Configuration for a node.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Ledger tunables (difficulty, mining attempt cap).
    pub chain: ChainConfig,
    /// Whether `post` re-verifies the freshly signed content before mining.
    pub verify_on_post: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            chain: ChainConfig::default(),
            verify_on_post: true,
        }
    }
}

/// A participant: an identity publishing to its own chain and exchanging
/// encrypted messages with peers.
pub struct Node {
    identity: Identity,
    chain: Chain,
    config: NodeConfig,
}

impl Node {
    /// Create a node around an existing identity with a fresh chain.
    pub fn new(identity: Identity, config: NodeConfig) -> Self {
        let chain = Chain::with_config(config.chain.clone());
        Self {
            identity,
            chain,
            config,
        }
    }

    /// Create a node with a brand-new identity.
    pub fn create(name: Option<&str>) -> Self {
        Self::new(Identity::create(name), NodeConfig::default())
    }

    /// This node's identity.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// This node's chain.
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    // ─────────────────────────────────────────────────────────────────────
    // Publishing
    // ─────────────────────────────────────────────────────────────────────

    /// Sign `body` as content and mine it onto the chain.
    pub fn post(&mut self, body: &str) -> Result<Block> {
        let content = self.make_post(body)?;
        let block = self
            .chain
            .add_block(content, self.identity.did().clone())?;
        Ok(block)
    }

    /// Like [`Node::post`], but with a caller-supplied miner, surfacing how
    /// mining ended so the caller can retry or accept an under-mined block.
    pub fn post_with(&mut self, body: &str, miner: &Miner) -> Result<(Block, MineOutcome)> {
        let content = self.make_post(body)?;
        let result =
            self.chain
                .add_block_with(content, self.identity.did().clone(), miner)?;
        Ok(result)
    }

    fn make_post(&self, body: &str) -> Result<Content> {
        let content = Content::create(body, &self.identity);
        if self.config.verify_on_post && !content.verify() {
            return Err(NodeError::InvalidPost);
        }
        Ok(content)
    }

    /// All blocks this node has published, in chain order.
    pub fn feed(&self) -> Vec<&Block> {
        self.chain.get_blocks_by_author(self.identity.did())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Messaging
    // ─────────────────────────────────────────────────────────────────────

    /// Encrypt `text` for the holder of `recipient`. Returns the serialized
    /// envelope.
    pub fn send(&self, text: &str, recipient: &PublicKey) -> Result<String> {
        Ok(messaging::encrypt(text, &self.identity, recipient)?)
    }

    /// Decrypt a serialized envelope from the holder of `sender`.
    pub fn open(&self, envelope_json: &str, sender: &PublicKey) -> Result<String> {
        Ok(messaging::decrypt(envelope_json, &self.identity, sender)?)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Serialization
    // ─────────────────────────────────────────────────────────────────────

    /// Export the chain to its JSON wire form (for the persistence
    /// collaborator).
    pub fn export_chain(&self) -> Result<String> {
        Ok(self.chain.export_json()?)
    }

    /// Replace this node's chain with an imported one.
    ///
    /// Parsing validates shape; tampering is reported by
    /// [`Chain::is_valid`] on the result, which this method does not gate on.
    pub fn import_chain(&mut self, json: &str) -> Result<()> {
        self.chain = Chain::import_json(json)?;
        Ok(())
    }

    /// Export the identity to its JSON wire form. Contains the private key
    /// seed in plaintext; prefer [`crate::backup::export_identity`] for
    /// anything that leaves the process.
    pub fn export_identity(&self) -> Result<String> {
        Ok(self.identity.export_json()?)
    }
}
