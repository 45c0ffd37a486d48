//! Error types for the ledger.

use rootless_core::CoreError;
use thiserror::Error;

/// Errors that can occur during ledger operations.
///
/// Hash mismatches in a chain are not errors: [`crate::Chain::is_valid`]
/// reports them as a boolean, since they are an expected outcome of
/// untrusted input. Likewise, mining exhaustion is a [`crate::MineOutcome`],
/// not an error, because the best-effort block is still appended.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Externally supplied JSON did not have the required shape.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A block or chain could not be serialized to its wire form.
    #[error("encoding error: {0}")]
    Encoding(String),
}

impl From<CoreError> for LedgerError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Encoding(msg) => LedgerError::Encoding(msg),
            other => LedgerError::MalformedInput(other.to_string()),
        }
    }
}
