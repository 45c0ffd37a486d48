//! # RootlessNet Core
//!
//! Pure primitives for the RootlessNet protocol: identities, signed content,
//! and content addressing.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over cryptographic data structures.
//!
//! ## Key Types
//!
//! - [`Identity`] - Ed25519 keypair with a derived DID
//! - [`Content`] - Immutable, content-addressed, author-signed post
//! - [`Did`] / [`Cid`] - Deterministic identifiers (128-bit Blake3)
//!
//! ## Wire contract
//!
//! Every type serializes to a canonical JSON shape with hex-encoded byte
//! fields. The identity export contains the private key seed in plaintext;
//! that is a documented property of the format, mitigated by the encrypted
//! backup collaborator in the `rootless` crate.

pub mod content;
pub mod crypto;
pub mod error;
pub mod identity;

pub use content::{Cid, Content, CID_PREFIX};
pub use crypto::{Blake3Hash, Digest128, Keypair, PublicKey, Signature};
pub use error::CoreError;
pub use identity::{Did, Identity, DID_PREFIX};
