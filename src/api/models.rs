use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::node::Node;
use crate::transaction::Transaction;

/// Shared application state: a handle to the one running node.
pub struct AppState {
    pub node: Arc<Node>,
}

impl AppState {
    pub fn new(node: Arc<Node>) -> Self {
        Self { node }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
}

impl StatusMessage {
    pub fn success() -> Self {
        Self {
            message: "success".into(),
        }
    }

    pub fn fail() -> Self {
        Self {
            message: "fail".into(),
        }
    }
}

/* ---------- Transaction API Models ---------- */

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
    pub length: usize,
}

/* ---------- Amount API Models ---------- */

#[derive(Deserialize)]
pub struct AmountQuery {
    pub address: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AmountResponse {
    pub amount: f64,
}

/* ---------- Node API Models ---------- */

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub height: usize,
    pub difficulty: usize,
    pub pool_size: usize,
    pub peers: usize,
    pub mining: bool,
    pub miner_address: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewWalletResponse {
    pub private_key: String,
    pub public_key: String,
    pub address: String,
}
