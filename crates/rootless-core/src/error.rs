//! Error types for the RootlessNet core.

use thiserror::Error;

/// Errors that can occur while working with identities and content.
///
/// There is no signature-mismatch variant: verification of untrusted input
/// is an expected outcome and is reported as a boolean, not an error.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Externally supplied JSON or hex did not have the required shape.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Key bytes do not form a valid Ed25519 public key.
    #[error("invalid public key")]
    InvalidPublicKey,

    /// Signature bytes do not form a valid Ed25519 signature.
    #[error("invalid signature")]
    InvalidSignature,

    /// A value could not be serialized to its wire form.
    #[error("encoding error: {0}")]
    Encoding(String),
}

impl CoreError {
    /// Shorthand for a `MalformedInput` with a formatted message.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }
}
