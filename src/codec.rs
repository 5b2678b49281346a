//! Canonical encoding shared by hashing, signing and the HTTP wire.
//!
//! A block encodes as compact JSON with the field order `timestamp`, `nonce`,
//! `previous_hash`, `transactions`; a transaction as `sender_address`,
//! `recipient_address`, `value`. Hashes travel as 64 lowercase hex characters.
//! Any change here changes every block hash, so peers built from different
//! revisions would stop agreeing on chains.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::blockchain::{Block, Hash};
use crate::error::CodecError;
use crate::transaction::Transaction;

#[derive(Serialize)]
pub(crate) struct BlockFields<'a> {
    pub timestamp: i64,
    pub nonce: u64,
    pub previous_hash: String,
    pub transactions: &'a [Transaction],
}

impl<'a> BlockFields<'a> {
    pub fn new(
        timestamp: i64,
        nonce: u64,
        previous_hash: &Hash,
        transactions: &'a [Transaction],
    ) -> Self {
        Self {
            timestamp,
            nonce,
            previous_hash: hex::encode(previous_hash),
            transactions,
        }
    }
}

/// Wire shape of a block before the hash string is checked.
#[doc(hidden)]
#[derive(Deserialize)]
pub struct BlockWire {
    pub timestamp: i64,
    pub nonce: u64,
    pub previous_hash: String,
    pub transactions: Vec<Transaction>,
}

impl TryFrom<BlockWire> for Block {
    type Error = CodecError;

    fn try_from(wire: BlockWire) -> Result<Self, Self::Error> {
        let previous_hash = decode_fixed::<32>(&wire.previous_hash)?;
        Ok(Block::from_parts(
            wire.timestamp,
            wire.nonce,
            previous_hash,
            wire.transactions,
        ))
    }
}

/// Canonical bytes for a block given its raw fields. Used directly by the
/// proof-of-work check so no temporary `Block` has to be built per nonce.
pub fn encode_block_fields(
    timestamp: i64,
    nonce: u64,
    previous_hash: &Hash,
    transactions: &[Transaction],
) -> Vec<u8> {
    let fields = BlockFields::new(timestamp, nonce, previous_hash, transactions);
    serde_json::to_vec(&fields).expect("block encoding is infallible")
}

pub fn encode_block(block: &Block) -> Vec<u8> {
    encode_block_fields(
        block.timestamp(),
        block.nonce(),
        block.previous_hash(),
        block.transactions(),
    )
}

/// Canonical bytes for a transaction. Signatures are never part of it.
pub fn encode_transaction(transaction: &Transaction) -> Vec<u8> {
    serde_json::to_vec(transaction).expect("transaction encoding is infallible")
}

pub fn sha256(bytes: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest[..]);
    out
}

/// Decode a lowercase or uppercase hex string into exactly `N` bytes.
pub fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], CodecError> {
    let bytes = hex::decode(s)?;
    let actual = bytes.len();
    bytes
        .try_into()
        .map_err(|_| CodecError::Length { expected: N, actual })
}

#[derive(Serialize)]
pub struct ChainEnvelope<'a> {
    pub chain: &'a [Block],
}

#[derive(Deserialize)]
struct OwnedChainEnvelope {
    chain: Vec<Block>,
}

/// `{"chain": [...]}` as served by `GET /chain`.
pub fn encode_chain(blocks: &[Block]) -> Vec<u8> {
    serde_json::to_vec(&ChainEnvelope { chain: blocks }).expect("chain encoding is infallible")
}

pub fn decode_chain(bytes: &[u8]) -> Result<Vec<Block>, CodecError> {
    let envelope: OwnedChainEnvelope = serde_json::from_slice(bytes)?;
    Ok(envelope.chain)
}
