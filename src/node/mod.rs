//! The running node: one ledger, one pool, one peer set, and the background
//! tasks that mine and reconcile. Handlers and tasks share it through `Arc`.

pub mod client;
pub mod consensus;
pub mod miner;
pub mod peers;

use log::{info, warn};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Mutex as AsyncMutex;
use tokio_util::sync::CancellationToken;

use crate::blockchain::{Block, Blockchain, MINING_SENDER};
use crate::config::NodeConfig;
use crate::error::{AdmissionError, NodeError};
use crate::transaction::{Credentials, Transaction, TransactionPool, TransactionRequest};

pub use client::PeerClient;
pub use peers::{Discovery, PeerSet, PortScanDiscovery, StaticDiscovery};

/// Chain and pool live behind one lock so a submission can never slip between
/// a mining snapshot and the removal of the mined entries.
#[derive(Debug)]
pub struct LedgerState {
    pub chain: Blockchain,
    pub pool: TransactionPool,
}

pub struct Node {
    config: NodeConfig,
    miner_address: String,
    ledger: Mutex<LedgerState>,
    mining: AsyncMutex<()>,
    mining_task: Mutex<Option<CancellationToken>>,
    peers: Arc<PeerSet>,
    client: PeerClient,
    shutdown: CancellationToken,
}

impl Node {
    pub fn new(config: NodeConfig, miner_address: String) -> Result<Self, NodeError> {
        let client = PeerClient::new(config.peer_timeout)?;
        let ledger = LedgerState {
            chain: Blockchain::new(),
            pool: TransactionPool::new(config.balance_policy),
        };
        Ok(Self {
            miner_address,
            ledger: Mutex::new(ledger),
            mining: AsyncMutex::new(()),
            mining_task: Mutex::new(None),
            peers: Arc::new(PeerSet::new()),
            client,
            shutdown: CancellationToken::new(),
            config,
        })
    }

    pub(crate) fn lock_ledger(&self) -> MutexGuard<'_, LedgerState> {
        self.ledger.lock().expect("ledger mutex poisoned")
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn miner_address(&self) -> &str {
        &self.miner_address
    }

    pub fn difficulty(&self) -> usize {
        self.config.difficulty
    }

    pub fn peers(&self) -> &Arc<PeerSet> {
        &self.peers
    }

    pub fn chain(&self) -> Vec<Block> {
        self.lock_ledger().chain.blocks().to_vec()
    }

    pub fn chain_len(&self) -> usize {
        self.lock_ledger().chain.len()
    }

    pub fn last_block(&self) -> Block {
        self.lock_ledger().chain.last_block().clone()
    }

    pub fn pool(&self) -> Vec<Transaction> {
        self.lock_ledger().pool.transactions()
    }

    pub fn pool_len(&self) -> usize {
        self.lock_ledger().pool.len()
    }

    pub fn balance(&self, address: &str) -> f64 {
        self.lock_ledger().chain.balance(address)
    }

    /// Admit a transaction through the pool's rules.
    pub fn submit(
        &self,
        transaction: Transaction,
        credentials: Option<&Credentials>,
    ) -> Result<(), AdmissionError> {
        let mut ledger = self.lock_ledger();
        let LedgerState { chain, pool } = &mut *ledger;
        pool.submit(chain, transaction, credentials).map(drop)
    }

    /// Admit a request from an untrusted source (client or peer relay).
    pub fn submit_request(
        &self,
        request: &TransactionRequest,
    ) -> Result<(Transaction, Credentials), AdmissionError> {
        let (transaction, credentials) = request.validate()?;
        if transaction.sender_address == MINING_SENDER {
            return Err(AdmissionError::ReservedSender);
        }
        self.submit(transaction.clone(), Some(&credentials))?;
        Ok((transaction, credentials))
    }

    /// Admit a client transaction and relay it to every peer in the
    /// background. Relay failures are only logged.
    pub fn create_transaction(&self, request: &TransactionRequest) -> Result<(), AdmissionError> {
        let (transaction, credentials) = self.submit_request(request)?;
        let relay = TransactionRequest::from_signed(&transaction, &credentials);
        let peers = self.peers.snapshot();
        if peers.is_empty() {
            return Ok(());
        }
        let client = self.client.clone();
        tokio::spawn(async move {
            for peer in peers {
                if let Err(e) = client.relay_transaction(&peer, &relay).await {
                    warn!("relay to {peer} failed: {e}");
                }
            }
        });
        Ok(())
    }

    pub fn clear_pool(&self) {
        self.lock_ledger().pool.clear();
        info!("transaction pool cleared");
    }

    /// Startup sequence: refresh peers, resolve once, spawn the refresh loop
    /// and, when configured, periodic mining.
    pub async fn run<D: Discovery>(self: &Arc<Self>, discovery: D) {
        self.peers.refresh(&discovery).await;
        self.resolve_conflicts().await;
        peers::spawn_refresh(
            self.peers.clone(),
            discovery,
            self.config.neighbor_sync_interval,
            self.shutdown.child_token(),
        );
        if self.config.mine_on_start {
            self.start_mining();
        }
    }

    /// Stop every background task started by this node.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
