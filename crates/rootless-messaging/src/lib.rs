//! # RootlessNet Messaging
//!
//! Point-to-point authenticated encryption between two identities that know
//! each other's public keys out of band. No handshake, no transport: this
//! crate turns a plaintext string into a self-contained JSON envelope and
//! back.
//!
//! ## Protocol
//!
//! 1. Shared secret: `H(sender_pk || recipient_pk)`, sender-first order.
//! 2. Key separation: `H(secret || "encryption")` and
//!    `H(secret || "authentication")`.
//! 3. Keystream cipher: XOR against `H(enc_key || nonce || counter)` blocks.
//! 4. MAC over `nonce || ciphertext`, verified in constant time before any
//!    decryption.
//!
//! The hash primitive behind all of this is the [`HashSuite`] seam, selected
//! once at startup ([`active_suite`]).

pub mod cipher;
pub mod envelope;
pub mod error;
pub mod keys;
pub mod suite;

pub use cipher::{keystream_xor, NONCE_LEN};
pub use envelope::{decrypt, decrypt_with, encrypt, encrypt_with, Envelope, MacTag, Nonce};
pub use error::MessagingError;
pub use keys::{EncryptionKey, MacKey, SharedSecret};
pub use suite::{active_suite, Blake3Suite, HashSuite, Sha256Suite};
