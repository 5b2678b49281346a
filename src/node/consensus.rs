use log::{info, warn};

use super::Node;
use crate::blockchain::{Block, validate_chain};

/// Longest-valid-chain rule: keep the first candidate that is strictly longer
/// than everything seen so far (starting from `baseline`) and validates.
pub fn select_longest<I>(baseline: usize, candidates: I, difficulty: usize) -> Option<Vec<Block>>
where
    I: IntoIterator<Item = Vec<Block>>,
{
    let mut best_len = baseline;
    let mut best = None;
    for chain in candidates {
        if chain.len() > best_len && validate_chain(&chain, difficulty) {
            best_len = chain.len();
            best = Some(chain);
        }
    }
    best
}

impl Node {
    /// Pull every peer's chain and adopt the longest valid one if it beats
    /// ours. Unreachable or misbehaving peers are skipped. Returns true iff
    /// the local chain was replaced.
    pub async fn resolve_conflicts(&self) -> bool {
        let baseline = self.chain_len();
        let peers = self.peers.snapshot();

        let mut candidates = Vec::with_capacity(peers.len());
        for peer in &peers {
            match self.client.fetch_chain(peer).await {
                Ok(chain) => candidates.push(chain),
                Err(e) => warn!("skipping {peer}: {e}"),
            }
        }

        let Some(best) = select_longest(baseline, candidates, self.config.difficulty) else {
            info!("Resolve conflicts not replaced");
            return false;
        };

        let mut ledger = self.lock_ledger();
        // Our own chain may have grown while peers were being fetched.
        if best.len() <= ledger.chain.len() {
            info!("Resolve conflicts not replaced (local chain grew meanwhile)");
            return false;
        }
        let len = best.len();
        let replaced = ledger.chain.replace(best);
        if replaced {
            info!("Resolve conflicts replaced (new length {len})");
        }
        replaced
    }
}
