use log::{debug, info, warn};
use std::sync::Arc;

use super::Node;
use crate::blockchain::{Block, MINING_REWARD, MINING_SENDER, pow};
use crate::error::MiningError;
use crate::transaction::Transaction;

impl Node {
    /// Run one mining cycle: pay the reward into the pool, snapshot it, search
    /// for a nonce off-lock, then append the block and drop exactly the
    /// snapshotted entries. Cycles on the same node never overlap.
    pub async fn mine(&self) -> Result<Block, MiningError> {
        let _cycle = self.mining.lock().await;

        let (previous_hash, snapshot, reward_seq) = {
            let mut ledger = self.lock_ledger();
            let super::LedgerState { chain, pool } = &mut *ledger;
            let reward =
                Transaction::new(MINING_SENDER, self.miner_address.clone(), MINING_REWARD);
            let reward_seq = pool.submit(chain, reward, None)?;
            (chain.last_block().hash(), pool.snapshot(), reward_seq)
        };

        let difficulty = self.config.difficulty;
        let transactions = snapshot.transactions.clone();
        debug!(
            "searching nonce over {} transactions at difficulty {difficulty}",
            transactions.len()
        );
        let nonce = tokio::task::spawn_blocking(move || {
            pow::solve(&previous_hash, &transactions, difficulty)
        })
        .await;

        let block = {
            let mut ledger = self.lock_ledger();
            let nonce = match nonce {
                Ok(Some(nonce)) => nonce,
                Ok(None) => {
                    ledger.pool.discard(reward_seq);
                    return Err(MiningError::NonceExhausted);
                }
                Err(e) => {
                    ledger.pool.discard(reward_seq);
                    return Err(e.into());
                }
            };
            if ledger.chain.last_block().hash() != previous_hash {
                ledger.pool.discard(reward_seq);
                warn!("action=mining, status=stale (chain replaced during search)");
                return Err(MiningError::StaleTip);
            }
            let watermark = snapshot.watermark();
            let block = ledger
                .chain
                .append_block(nonce, previous_hash, snapshot.transactions)
                .clone();
            if let Some(watermark) = watermark {
                ledger.pool.clear_through(watermark);
            }
            block
        };

        info!(
            "action=mining, status=success (height={}, nonce={}, txs={})",
            self.chain_len() - 1,
            block.nonce(),
            block.transactions().len()
        );
        self.announce_block();
        Ok(block)
    }

    /// Tell every peer to drop its pool and re-resolve. Fire-and-forget.
    fn announce_block(&self) {
        let peers = self.peers.snapshot();
        if peers.is_empty() {
            return;
        }
        let client = self.client.clone();
        tokio::spawn(async move {
            for peer in peers {
                if let Err(e) = client.clear_pool(&peer).await {
                    warn!("clear pool on {peer} failed: {e}");
                }
                if let Err(e) = client.request_consensus(&peer).await {
                    warn!("consensus request to {peer} failed: {e}");
                }
            }
        });
    }

    /// Begin periodic mining. Returns false if it is already running.
    pub fn start_mining(self: &Arc<Self>) -> bool {
        let token = {
            let mut task = self.mining_task.lock().expect("mutex poisoned");
            if task.as_ref().is_some_and(|t| !t.is_cancelled()) {
                return false;
            }
            let token = self.shutdown.child_token();
            *task = Some(token.clone());
            token
        };

        let node = Arc::clone(self);
        let interval = self.config.mining_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(e) = node.mine().await {
                            warn!("action=mining, status=fail: {e}");
                        }
                    }
                }
            }
            info!("periodic mining stopped");
        });
        info!("periodic mining started (every {interval:?})");
        true
    }

    /// Cancel periodic mining. Returns false if it was not running.
    pub fn stop_mining(&self) -> bool {
        match self.mining_task.lock().expect("mutex poisoned").take() {
            Some(token) if !token.is_cancelled() => {
                token.cancel();
                true
            }
            _ => false,
        }
    }

    pub fn is_mining(&self) -> bool {
        self.mining_task
            .lock()
            .expect("mutex poisoned")
            .as_ref()
            .is_some_and(|t| !t.is_cancelled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::{Blockchain, validate_chain};
    use crate::config::NodeConfig;
    use crate::node::tests::test_node;
    use crate::transaction::{BalancePolicy, TransactionRequest};
    use crate::wallet::Wallet;
    use std::time::Duration;

    /// Node on a fixed genesis at difficulty 5, so the nonce for a given pool
    /// is known in advance and takes a few hundred thousand hashes to find.
    fn pinned_node(miner: &str) -> Arc<Node> {
        let config = NodeConfig {
            difficulty: 5,
            balance_policy: BalancePolicy::Skip,
            mine_on_start: false,
            ..NodeConfig::default()
        };
        let node = Arc::new(Node::new(config, miner.into()).unwrap());
        let genesis = Block::from_parts(0, 0, [0x5a; 32], Vec::new());
        assert!(node.lock_ledger().chain.replace(vec![genesis]));
        node
    }

    /// Wait until the cycle has paid its reward into the pool, i.e. the
    /// snapshot is taken and the nonce search is under way.
    async fn wait_for_snapshot(node: &Node, pool_len: usize) {
        for _ in 0..5000 {
            if node.pool_len() == pool_len {
                return;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        panic!("mining cycle never took its snapshot");
    }

    #[tokio::test]
    async fn mined_block_holds_snapshot_plus_reward() {
        let node = test_node(BalancePolicy::Skip);
        let wallet = Wallet::generate();
        let tx = Transaction::new(wallet.address(), "bob", 1.5);
        node.submit(tx.clone(), Some(&wallet.credentials(&tx))).unwrap();

        let block = node.mine().await.unwrap();
        assert_eq!(
            block.transactions(),
            &[tx, Transaction::new(MINING_SENDER, "miner", MINING_REWARD)]
        );
        assert_eq!(node.pool_len(), 0);
        assert_eq!(node.chain_len(), 2);
        assert!(validate_chain(&node.chain(), node.difficulty()));
    }

    #[tokio::test]
    async fn empty_pool_still_mines_reward_block() {
        let node = test_node(BalancePolicy::Enforce);
        node.mine().await.unwrap();
        node.mine().await.unwrap();
        assert_eq!(node.chain_len(), 3);
        assert_eq!(node.balance("miner"), 2.0);
        assert!(validate_chain(&node.chain(), node.difficulty()));
    }

    #[tokio::test]
    async fn end_to_end_transfer_and_reward() {
        let node = test_node(BalancePolicy::Skip);
        let a = Wallet::generate();
        let b = Wallet::generate();
        let tx = Transaction::new(a.address(), b.address(), 1.01);
        let request = TransactionRequest::from_signed(&tx, &a.credentials(&tx));
        node.create_transaction(&request).unwrap();

        node.mine().await.unwrap();
        assert_eq!(node.balance(a.address()), -1.01);
        assert_eq!(node.balance(b.address()), 1.01);
        assert_eq!(node.balance("miner"), 1.00);
    }

    #[tokio::test]
    async fn enforced_balance_requires_funds_first() {
        let node = test_node(BalancePolicy::Enforce);
        let a = Wallet::generate();
        let tx = Transaction::new(a.address(), "bob", 0.5);
        let creds = a.credentials(&tx);
        assert!(node.submit(tx.clone(), Some(&creds)).is_err());

        // Fund `a` through a reward-only block addressed to it.
        node.submit(Transaction::new(MINING_SENDER, a.address(), 1.0), None)
            .unwrap();
        node.mine().await.unwrap();

        node.submit(tx, Some(&creds)).unwrap();
        node.mine().await.unwrap();
        assert_eq!(node.balance(a.address()), 0.5);
        assert_eq!(node.balance("bob"), 0.5);
    }

    #[tokio::test]
    async fn periodic_mining_starts_once_and_stops() {
        let node = test_node(BalancePolicy::Enforce);
        assert!(node.start_mining());
        assert!(!node.start_mining());
        assert!(node.is_mining());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(node.stop_mining());
        assert!(!node.stop_mining());
        assert!(!node.is_mining());
        // The first tick fires immediately.
        assert!(node.chain_len() >= 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn submission_during_search_waits_for_next_block() {
        let node = pinned_node("miner-12");
        let cycle = tokio::spawn({
            let node = Arc::clone(&node);
            async move { node.mine().await }
        });
        wait_for_snapshot(&node, 1).await;

        let late = Transaction::new(MINING_SENDER, "late", 7.0);
        node.submit(late.clone(), None).unwrap();

        let block = cycle.await.unwrap().unwrap();
        assert_eq!(block.nonce(), 198688);
        assert_eq!(
            block.transactions(),
            &[Transaction::new(MINING_SENDER, "miner-12", MINING_REWARD)]
        );
        assert_eq!(node.pool(), vec![late]);
        assert_eq!(node.chain_len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn chain_replaced_during_search_abandons_the_block() {
        let node = pinned_node("miner-1");
        let pending = Transaction::new(MINING_SENDER, "keep", 2.0);
        node.submit(pending.clone(), None).unwrap();

        let cycle = tokio::spawn({
            let node = Arc::clone(&node);
            async move { node.mine().await }
        });
        wait_for_snapshot(&node, 2).await;

        let mut other = Blockchain::new();
        let prev = other.last_block().hash();
        other.append_block(0, prev, Vec::new());
        let replacement = other.blocks().to_vec();
        assert!(node.lock_ledger().chain.replace(replacement.clone()));

        let result = cycle.await.unwrap();
        assert!(matches!(result, Err(MiningError::StaleTip)));
        assert_eq!(node.pool(), vec![pending]);
        assert_eq!(node.chain(), replacement);
    }
}
