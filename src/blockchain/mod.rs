pub mod block;
pub mod model;
pub mod pow;

pub use block::{Block, Hash};
pub use model::{Blockchain, validate_chain};

/// Default Proof-of-Work difficulty (number of leading zero hex characters).
pub const MINING_DIFFICULTY: usize = 3;

/// A SHA-256 digest has 64 hex characters; no proof exists above this.
pub const MAX_DIFFICULTY: usize = 64;

/// Reserved sender identity of the mining reward. Never accepted from clients.
pub const MINING_SENDER: &str = "NETWORK";

/// Reward paid to the miner for every block.
pub const MINING_REWARD: f64 = 1.00;

/// Seconds between periodic mining cycles.
pub const MINING_INTERVAL_SECS: u64 = 10;

/// Seconds between peer set refreshes.
pub const NEIGHBOR_SYNC_SECS: u64 = 20;
