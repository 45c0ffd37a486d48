//! Error types for messaging.

use thiserror::Error;

/// Errors that can occur while encrypting or decrypting messages.
#[derive(Debug, Error)]
pub enum MessagingError {
    /// The envelope MAC did not verify. No plaintext is ever returned in
    /// this case; unauthenticated output must not be usable by accident.
    #[error("message authentication failed")]
    AuthenticationFailed,

    /// The envelope's sender key is not the expected sender.
    #[error("sender public key mismatch")]
    SenderMismatch,

    /// The envelope JSON did not have the required shape.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// An envelope could not be serialized to its wire form.
    #[error("encoding error: {0}")]
    Encoding(String),
}
