//! Bounded, cancellable proof-of-work mining.
//!
//! Mining is a cooperative loop: it increments the nonce until the block
//! hash meets the difficulty predicate, the attempt cap is reached, or an
//! injected stop signal fires. It always returns; exhaustion yields a
//! best-effort block rather than an error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::block::Block;
use crate::error::LedgerError;

/// Default attempt cap. Mining stops with whatever hash was last computed
/// once this many nonces have been tried.
pub const DEFAULT_MAX_ATTEMPTS: u64 = 1_000_000;

/// How a mining run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MineOutcome {
    /// The hash meets the difficulty predicate.
    Satisfied {
        /// Nonces tried.
        attempts: u64,
    },
    /// The attempt cap was reached first. The block keeps its last-computed
    /// hash and is still internally consistent; only the difficulty
    /// predicate is unmet.
    Exhausted {
        /// Nonces tried.
        attempts: u64,
    },
    /// The stop signal fired before either of the above.
    Cancelled {
        /// Nonces tried.
        attempts: u64,
    },
}

impl MineOutcome {
    /// Whether the difficulty predicate was met.
    pub fn satisfied(&self) -> bool {
        matches!(self, MineOutcome::Satisfied { .. })
    }
}

/// Handle for cancelling an in-flight mining run from another thread.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    /// Create a signal in the not-fired state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the signal. Mining returns at the next loop iteration.
    pub fn fire(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether the signal has fired.
    pub fn fired(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A bounded proof-of-work miner.
#[derive(Debug, Clone)]
pub struct Miner {
    max_attempts: u64,
    stop: StopSignal,
}

impl Miner {
    /// Miner with the given attempt cap and a private stop signal.
    pub fn new(max_attempts: u64) -> Self {
        Self {
            max_attempts,
            stop: StopSignal::new(),
        }
    }

    /// Miner with an injected stop signal, for embeddings that run mining
    /// off the interactive thread and need to cancel it.
    pub fn with_stop_signal(max_attempts: u64, stop: StopSignal) -> Self {
        Self { max_attempts, stop }
    }

    /// The attempt cap.
    pub fn max_attempts(&self) -> u64 {
        self.max_attempts
    }

    /// A clone of the stop signal driving this miner.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Mine the block in place until its hash has `difficulty` leading zero
    /// hex characters, the attempt cap is hit, or the stop signal fires.
    pub fn mine(&self, block: &mut Block, difficulty: usize) -> Result<MineOutcome, LedgerError> {
        let mut attempts = 0u64;

        loop {
            if block.meets_difficulty(difficulty) {
                tracing::debug!(
                    index = block.index,
                    attempts,
                    difficulty,
                    "block mined"
                );
                return Ok(MineOutcome::Satisfied { attempts });
            }
            if attempts >= self.max_attempts {
                tracing::warn!(
                    index = block.index,
                    attempts,
                    difficulty,
                    "mining attempt cap reached, keeping best-effort hash"
                );
                return Ok(MineOutcome::Exhausted { attempts });
            }
            if self.stop.fired() {
                return Ok(MineOutcome::Cancelled { attempts });
            }

            block.nonce += 1;
            block.hash = block.compute_hash()?;
            attempts += 1;
        }
    }
}

impl Default for Miner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}
