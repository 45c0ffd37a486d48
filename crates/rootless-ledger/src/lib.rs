//! # RootlessNet Ledger
//!
//! An append-only, hash-linked chain of content blocks gated by a bounded
//! proof-of-work.
//!
//! - [`Block`] - one ledger entry wrapping a single [`rootless_core::Content`]
//! - [`Miner`] - bounded, cancellable nonce search
//! - [`Chain`] - genesis-rooted block sequence with full-chain validation
//!
//! The proof-of-work is a rate-limiting gate, not a security property:
//! validation checks hash consistency only, never the difficulty predicate,
//! because mining may legitimately stop at its attempt cap.

pub mod block;
pub mod chain;
pub mod error;
pub mod miner;

pub use block::{leading_zero_hex_chars, Block};
pub use chain::{Chain, ChainConfig, GENESIS_AUTHOR, GENESIS_BODY};
pub use error::LedgerError;
pub use miner::{MineOutcome, Miner, StopSignal, DEFAULT_MAX_ATTEMPTS};
