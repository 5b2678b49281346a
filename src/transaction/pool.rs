use log::{debug, warn};

use super::model::Transaction;
use super::signature::{self, Credentials};
use crate::blockchain::{Blockchain, MINING_SENDER};
use crate::error::AdmissionError;

/// Whether admission checks the sender's replayed balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BalancePolicy {
    #[default]
    Enforce,
    Skip,
}

#[derive(Debug, Clone)]
struct PoolEntry {
    seq: u64,
    transaction: Transaction,
}

/// Copy of the pool taken for mining. `watermark` is the sequence number of
/// the newest entry it contains, so exactly these entries can be removed once
/// the block is appended.
#[derive(Debug, Clone, Default)]
pub struct PoolSnapshot {
    pub transactions: Vec<Transaction>,
    watermark: Option<u64>,
}

impl PoolSnapshot {
    pub fn watermark(&self) -> Option<u64> {
        self.watermark
    }
}

/// Insertion-ordered set of admitted but not yet mined transactions.
#[derive(Debug, Default)]
pub struct TransactionPool {
    entries: Vec<PoolEntry>,
    next_seq: u64,
    policy: BalancePolicy,
}

impl TransactionPool {
    pub fn new(policy: BalancePolicy) -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
            policy,
        }
    }

    /// Admit a transaction: verify signature, check balance against the
    /// confirmed chain, append. Nothing changes on rejection. Transfers from
    /// the reserved reward identity skip every check.
    pub fn submit(
        &mut self,
        chain: &Blockchain,
        transaction: Transaction,
        credentials: Option<&Credentials>,
    ) -> Result<u64, AdmissionError> {
        if transaction.sender_address == MINING_SENDER {
            return Ok(self.push(transaction));
        }

        if !transaction.value.is_finite() || transaction.value < 0.0 {
            return Err(AdmissionError::InvalidValue(transaction.value));
        }

        let credentials = credentials.ok_or(AdmissionError::MissingCredentials)?;
        if !signature::verify(
            &credentials.public_key,
            &credentials.signature,
            transaction.digest(),
        ) {
            warn!(
                "signature verification failed for {} -> {}",
                transaction.sender_address, transaction.recipient_address
            );
            return Err(AdmissionError::InvalidSignature);
        }

        if self.policy == BalancePolicy::Enforce {
            let balance = chain.balance(&transaction.sender_address);
            if balance < transaction.value {
                warn!(
                    "not enough balance in {}: {} < {}",
                    transaction.sender_address, balance, transaction.value
                );
                return Err(AdmissionError::InsufficientBalance {
                    sender: transaction.sender_address,
                    balance,
                    value: transaction.value,
                });
            }
        }

        Ok(self.push(transaction))
    }

    fn push(&mut self, transaction: Transaction) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        debug!(
            "pool += {} -> {} ({}), size {}",
            transaction.sender_address,
            transaction.recipient_address,
            transaction.value,
            self.entries.len() + 1
        );
        self.entries.push(PoolEntry { seq, transaction });
        seq
    }

    /// Independent copy of the current contents.
    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            transactions: self.transactions(),
            watermark: self.entries.last().map(|e| e.seq),
        }
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.entries.iter().map(|e| e.transaction.clone()).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Remove every entry up to and including `watermark`; later submissions
    /// stay for the next block.
    pub fn clear_through(&mut self, watermark: u64) {
        self.entries.retain(|e| e.seq > watermark);
    }

    /// Withdraw a single entry, used when a mining cycle is abandoned.
    pub fn discard(&mut self, seq: u64) {
        self.entries.retain(|e| e.seq != seq);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
