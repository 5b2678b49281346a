use super::{Block, Hash, pow};
use crate::transaction::Transaction;

/// Append-only in-memory ledger. Always holds at least the genesis block.
#[derive(Debug, Clone)]
pub struct Blockchain {
    chain: Vec<Block>,
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}

impl Blockchain {
    /// Initialize a new blockchain with a genesis block.
    pub fn new() -> Self {
        Self {
            chain: vec![Block::genesis()],
        }
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("Blockchain should always have at least the genesis block")
    }

    /// Seal a block and append it. The only mutator outside conflict resolution.
    pub fn append_block(
        &mut self,
        nonce: u64,
        previous_hash: Hash,
        transactions: Vec<Transaction>,
    ) -> &Block {
        self.chain.push(Block::new(nonce, previous_hash, transactions));
        self.last_block()
    }

    /// Swap in a whole chain adopted from a peer. Empty chains are refused.
    pub fn replace(&mut self, chain: Vec<Block>) -> bool {
        if chain.is_empty() {
            return false;
        }
        self.chain = chain;
        true
    }

    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Balance replay: received minus sent over every confirmed transaction.
    pub fn balance(&self, address: &str) -> f64 {
        let mut total = 0.0;
        for tx in self.chain.iter().flat_map(Block::transactions) {
            if tx.recipient_address == address {
                total += tx.value;
            }
            if tx.sender_address == address {
                total -= tx.value;
            }
        }
        total
    }
}

/// Check linkage and proof-of-work of every block after the first. The first
/// block is taken as given; an empty candidate is never valid.
pub fn validate_chain(chain: &[Block], difficulty: usize) -> bool {
    if chain.is_empty() {
        return false;
    }
    chain.windows(2).all(|pair| {
        let (prev, current) = (&pair[0], &pair[1]);
        *current.previous_hash() == prev.hash()
            && pow::is_valid_proof(
                current.nonce(),
                current.previous_hash(),
                current.transactions(),
                difficulty,
            )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIFFICULTY: usize = 2;

    fn mine_onto(bc: &mut Blockchain, txs: Vec<Transaction>) {
        let prev = bc.last_block().hash();
        let nonce = pow::solve(&prev, &txs, DIFFICULTY).unwrap();
        bc.append_block(nonce, prev, txs);
    }

    fn mined_chain() -> Blockchain {
        let mut bc = Blockchain::new();
        mine_onto(&mut bc, vec![Transaction::new("NETWORK", "miner", 1.0)]);
        mine_onto(
            &mut bc,
            vec![
                Transaction::new("miner", "alice", 0.25),
                Transaction::new("NETWORK", "miner", 1.0),
            ],
        );
        mine_onto(&mut bc, vec![Transaction::new("NETWORK", "miner", 1.0)]);
        bc
    }

    #[test]
    fn mined_chain_is_valid() {
        let bc = mined_chain();
        assert_eq!(bc.len(), 4);
        assert!(validate_chain(bc.blocks(), DIFFICULTY));
    }

    #[test]
    fn single_block_chain_is_valid_and_empty_is_not() {
        assert!(validate_chain(Blockchain::new().blocks(), DIFFICULTY));
        assert!(!validate_chain(&[], DIFFICULTY));
    }

    #[test]
    fn broken_linkage_is_rejected() {
        let bc = mined_chain();
        let mut blocks = bc.blocks().to_vec();
        blocks.remove(1);
        assert!(!validate_chain(&blocks, DIFFICULTY));
    }

    #[test]
    fn bad_nonce_is_rejected() {
        let bc = mined_chain();
        let mut blocks = bc.blocks().to_vec();
        let last = blocks.pop().unwrap();
        let forged = (0..)
            .find(|n| !pow::is_valid_proof(*n, last.previous_hash(), last.transactions(), DIFFICULTY))
            .unwrap();
        blocks.push(Block::from_parts(
            last.timestamp(),
            forged,
            *last.previous_hash(),
            last.transactions().to_vec(),
        ));
        assert!(!validate_chain(&blocks, DIFFICULTY));
    }

    #[test]
    fn balance_replays_transfers() {
        let bc = mined_chain();
        assert_eq!(bc.balance("miner"), 2.75);
        assert_eq!(bc.balance("alice"), 0.25);
        assert_eq!(bc.balance("NETWORK"), -3.0);
        assert_eq!(bc.balance("nobody"), 0.0);
    }

    #[test]
    fn replace_refuses_empty_chain() {
        let mut bc = mined_chain();
        assert!(!bc.replace(Vec::new()));
        assert_eq!(bc.len(), 4);
        assert!(bc.replace(Blockchain::new().blocks().to_vec()));
        assert_eq!(bc.len(), 1);
    }
}
