//! Block: one ledger entry wrapping a single content object.
//!
//! A block's hash covers every other field, including the canonical JSON of
//! its content; the ledger never looks inside the content beyond that
//! serialization.

use serde::{Deserialize, Serialize};

use rootless_core::{Blake3Hash, Content, Did};

use crate::error::LedgerError;

/// A single block in the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Block {
    /// Position in the chain (genesis is 0).
    pub index: u64,

    /// Creation time, Unix seconds.
    pub timestamp: i64,

    /// The content stored in this block.
    pub content: Content,

    /// Identifier of the author who submitted the content.
    pub author: Did,

    /// Hash of the previous block (zero hash for genesis).
    pub previous_hash: Blake3Hash,

    /// Hash of this block.
    pub hash: Blake3Hash,

    /// Proof-of-work nonce.
    pub nonce: u64,
}

impl Block {
    /// Build a new unmined block (`nonce = 0`) and stamp its hash.
    pub fn new(
        index: u64,
        content: Content,
        author: Did,
        previous_hash: Blake3Hash,
    ) -> Result<Self, LedgerError> {
        Self::new_at(index, content, author, previous_hash, unix_now())
    }

    /// Build a new unmined block with an explicit timestamp.
    pub fn new_at(
        index: u64,
        content: Content,
        author: Did,
        previous_hash: Blake3Hash,
        timestamp: i64,
    ) -> Result<Self, LedgerError> {
        let mut block = Self {
            index,
            timestamp,
            content,
            author,
            previous_hash,
            hash: Blake3Hash::ZERO,
            nonce: 0,
        };
        block.hash = block.compute_hash()?;
        Ok(block)
    }

    /// Recompute this block's hash from its own fields.
    ///
    /// The preimage is the decimal/string concatenation
    /// `index || timestamp || content_json || author || previous_hash || nonce`.
    pub fn compute_hash(&self) -> Result<Blake3Hash, LedgerError> {
        let content_json = self.content.canonical_json()?;
        let preimage = format!(
            "{}{}{}{}{}{}",
            self.index,
            self.timestamp,
            content_json,
            self.author,
            self.previous_hash.to_hex(),
            self.nonce
        );
        Ok(Blake3Hash::hash(preimage.as_bytes()))
    }

    /// Whether the stored hash starts with `difficulty` zero hex characters.
    pub fn meets_difficulty(&self, difficulty: usize) -> bool {
        leading_zero_hex_chars(&self.hash) >= difficulty
    }
}

/// Count the leading zero hex characters (nibbles) of a hash.
pub fn leading_zero_hex_chars(hash: &Blake3Hash) -> usize {
    let mut count = 0;
    for byte in hash.as_bytes() {
        if *byte == 0 {
            count += 2;
        } else {
            if byte >> 4 == 0 {
                count += 1;
            }
            break;
        }
    }
    count
}

fn unix_now() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_secs() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rootless_core::Identity;

    fn test_content() -> (Identity, Content) {
        let identity = Identity::from_seed(&[0x11; 32], Some("Author"));
        let content = Content::create_at("block body", &identity, 1000);
        (identity, content)
    }

    #[test]
    fn new_block_hash_is_consistent() {
        let (identity, content) = test_content();
        let block = Block::new_at(
            1,
            content,
            identity.did().clone(),
            Blake3Hash::ZERO,
            2000,
        )
        .unwrap();

        assert_eq!(block.nonce, 0);
        assert_eq!(block.hash, block.compute_hash().unwrap());
    }

    #[test]
    fn hash_covers_every_field() {
        let (identity, content) = test_content();
        let block = Block::new_at(1, content, identity.did().clone(), Blake3Hash::ZERO, 2000)
            .unwrap();

        let mut touched = block.clone();
        touched.nonce += 1;
        assert_ne!(touched.compute_hash().unwrap(), block.hash);

        let mut touched = block.clone();
        touched.timestamp += 1;
        assert_ne!(touched.compute_hash().unwrap(), block.hash);

        let mut touched = block.clone();
        touched.content.body.push('x');
        assert_ne!(touched.compute_hash().unwrap(), block.hash);

        let mut touched = block.clone();
        touched.previous_hash = Blake3Hash::hash(b"elsewhere");
        assert_ne!(touched.compute_hash().unwrap(), block.hash);
    }

    #[test]
    fn leading_zero_count() {
        assert_eq!(leading_zero_hex_chars(&Blake3Hash::ZERO), 64);

        let mut bytes = [0xffu8; 32];
        assert_eq!(leading_zero_hex_chars(&Blake3Hash::from_bytes(bytes)), 0);

        bytes[0] = 0x0f;
        assert_eq!(leading_zero_hex_chars(&Blake3Hash::from_bytes(bytes)), 1);

        bytes[0] = 0x00;
        bytes[1] = 0x0f;
        assert_eq!(leading_zero_hex_chars(&Blake3Hash::from_bytes(bytes)), 3);
    }

    #[test]
    fn block_json_uses_hex_hashes() {
        let (identity, content) = test_content();
        let block = Block::new_at(0, content, identity.did().clone(), Blake3Hash::ZERO, 2000)
            .unwrap();

        let json = serde_json::to_string(&block).unwrap();
        assert!(json.contains(&format!("\"{}\"", "0".repeat(64))));

        let back: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(back, block);
    }
}
