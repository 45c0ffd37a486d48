//! Error types for the umbrella crate.

use rootless_core::CoreError;
use rootless_ledger::LedgerError;
use rootless_messaging::MessagingError;
use thiserror::Error;

use crate::backup::BackupError;

/// Errors that can occur during node operations.
#[derive(Debug, Error)]
pub enum NodeError {
    /// Identity or content error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Ledger error.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Messaging error.
    #[error("messaging error: {0}")]
    Messaging(#[from] MessagingError),

    /// Backup error.
    #[error("backup error: {0}")]
    Backup(#[from] BackupError),

    /// A freshly created post failed its own signature check.
    #[error("post failed signature verification")]
    InvalidPost,
}

/// Result type for node operations.
pub type Result<T> = std::result::Result<T, NodeError>;
