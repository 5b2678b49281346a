use chrono::Utc;
use serde::{Deserialize, Serialize, Serializer};

use crate::codec::{self, BlockFields, BlockWire};
use crate::transaction::Transaction;

/// SHA-256 digest of a block's canonical encoding.
pub type Hash = [u8; 32];

/// A single block in the ledger. Immutable once built.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "BlockWire")]
pub struct Block {
    timestamp: i64, // Unix timestamp in nanoseconds (UTC)
    nonce: u64,
    previous_hash: Hash,
    transactions: Vec<Transaction>,
}

impl Block {
    /// Create a block stamped with the current time.
    pub fn new(nonce: u64, previous_hash: Hash, transactions: Vec<Transaction>) -> Self {
        let timestamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        Self::from_parts(timestamp, nonce, previous_hash, transactions)
    }

    pub fn from_parts(
        timestamp: i64,
        nonce: u64,
        previous_hash: Hash,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self {
            timestamp,
            nonce,
            previous_hash,
            transactions,
        }
    }

    /// The all-zero block whose hash seeds the genesis block.
    pub fn zero() -> Self {
        Self::from_parts(0, 0, [0u8; 32], Vec::new())
    }

    /// Create the genesis block (first block in the chain).
    pub fn genesis() -> Self {
        Self::new(0, Self::zero().hash(), Vec::new())
    }

    pub fn hash(&self) -> Hash {
        codec::sha256(&codec::encode_block(self))
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn previous_hash(&self) -> &Hash {
        &self.previous_hash
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        BlockFields::new(
            self.timestamp,
            self.nonce,
            &self.previous_hash,
            &self.transactions,
        )
        .serialize(serializer)
    }
}
