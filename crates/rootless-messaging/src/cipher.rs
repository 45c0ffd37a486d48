//! Counter-mode stream cipher built from a hash primitive.
//!
//! The keystream is `H(key || nonce || counter)` for increasing u32 counter
//! values, big-endian fixed-width, concatenated block by block until it
//! covers the data. XOR makes encryption and decryption the same transform.
//! Confidentiality only; the envelope MAC provides integrity.

use crate::keys::EncryptionKey;
use crate::suite::HashSuite;

/// Nonce length in bytes.
pub const NONCE_LEN: usize = 16;

/// XOR `data` against the keystream for (`key`, `nonce`).
pub fn keystream_xor(
    suite: &dyn HashSuite,
    key: &EncryptionKey,
    nonce: &[u8; NONCE_LEN],
    data: &[u8],
) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut counter: u32 = 0;
    let mut block_input = Vec::with_capacity(32 + NONCE_LEN + 4);

    while out.len() < data.len() {
        block_input.clear();
        block_input.extend_from_slice(key.as_bytes());
        block_input.extend_from_slice(nonce);
        block_input.extend_from_slice(&counter.to_be_bytes());

        let block = suite.digest(&block_input);
        for k in block.iter() {
            let i = out.len();
            if i == data.len() {
                break;
            }
            out.push(data[i] ^ k);
        }
        counter += 1;
    }
    out
}
