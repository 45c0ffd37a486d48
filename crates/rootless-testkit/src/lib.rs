//! # RootlessNet Testkit
//!
//! Testing utilities shared by the protocol crates.
//!
//! - **Fixtures**: one-line setup for identities, chains, and envelopes
//! - **Generators**: proptest strategies for seeds, bodies, and content
//! - **Vectors**: pinned inputs whose derivations must stay deterministic
//!
//! ```rust
//! use rootless_testkit::TestFixture;
//!
//! let mut fixture = TestFixture::with_seed([7; 32]);
//! let block = fixture.post("fixture post");
//! assert!(fixture.chain.is_valid());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_fixtures, TestFixture};
pub use generators::{content_from_params, ContentParams};
pub use vectors::{all_vectors, derive_vector, verify_all_vectors, ProtocolVector};
