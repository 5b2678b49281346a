use super::{Hash, MAX_DIFFICULTY};
use crate::codec;
use crate::transaction::Transaction;

/// Check a nonce against the difficulty target. The candidate block is hashed
/// with timestamp 0 so the check does not depend on when the block was sealed.
pub fn is_valid_proof(
    nonce: u64,
    previous_hash: &Hash,
    transactions: &[Transaction],
    difficulty: usize,
) -> bool {
    let bytes = codec::encode_block_fields(0, nonce, previous_hash, transactions);
    let digest = hex::encode(codec::sha256(&bytes));
    digest.len() >= difficulty && digest.bytes().take(difficulty).all(|c| c == b'0')
}

/// Find the smallest nonce satisfying `is_valid_proof`, scanning upward from 0.
/// Returns `None` if the difficulty is unreachable or the whole `u64` space was
/// exhausted.
pub fn solve(previous_hash: &Hash, transactions: &[Transaction], difficulty: usize) -> Option<u64> {
    if difficulty > MAX_DIFFICULTY {
        return None;
    }
    (0..=u64::MAX).find(|&nonce| is_valid_proof(nonce, previous_hash, transactions, difficulty))
}
