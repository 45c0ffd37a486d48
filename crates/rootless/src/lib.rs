//! # RootlessNet
//!
//! The RootlessNet protocol core: self-sovereign identities, signed
//! content-addressed posts on a proof-of-work-gated hash-linked ledger, and
//! authenticated-encrypted direct messages.
//!
//! This workspace defines data and algorithms only. There is no network, no
//! storage, and no UI here; those are external collaborators that consume
//! the JSON wire shapes and the public operations re-exported below.
//!
//! ## Components
//!
//! - [`Identity`] - Ed25519 keypair with a derived DID
//! - [`Content`] - immutable, author-signed, content-addressed post
//! - [`Chain`] - append-only block sequence with bounded mining
//! - [`messaging`] - envelope encryption between two identities
//! - [`backup`] - password-protected wrapper for the identity export
//! - [`Node`] - one identity plus one chain behind a single API
//!
//! ## Usage
//!
//! ```rust
//! use rootless::Node;
//!
//! let mut alice = Node::create(Some("Alice"));
//! let block = alice.post("Hello, RootlessNet!").unwrap();
//! assert!(block.content.verify());
//! assert!(alice.chain().is_valid());
//!
//! let bob = Node::create(Some("Bob"));
//! let envelope = alice.send("secret", &bob.identity().public_key()).unwrap();
//! let plaintext = bob.open(&envelope, &alice.identity().public_key()).unwrap();
//! assert_eq!(plaintext, "secret");
//! ```
//!
//! ## A note on key material
//!
//! The identity wire JSON contains the private key seed in plaintext. That
//! is the serialization contract, not an accident; the [`backup`] module is
//! the mitigation for anything that leaves the process.

pub mod backup;
pub mod error;
pub mod node;

// Re-export component crates
pub use rootless_core as core;
pub use rootless_ledger as ledger;
pub use rootless_messaging as messaging;

// Re-export main types for convenience
pub use error::{NodeError, Result};
pub use node::{Node, NodeConfig};

pub use rootless_core::{Cid, Content, CoreError, Did, Identity, Keypair, PublicKey, Signature};
pub use rootless_ledger::{
    Block, Chain, ChainConfig, LedgerError, MineOutcome, Miner, StopSignal,
};
pub use rootless_messaging::{Envelope, MessagingError};
