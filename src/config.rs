use log::warn;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::blockchain::{
    MAX_DIFFICULTY, MINING_DIFFICULTY, MINING_INTERVAL_SECS, NEIGHBOR_SYNC_SECS,
};
use crate::transaction::BalancePolicy;

/// Node settings, read from the environment (and `.env` via dotenvy in main).
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    /// Host this node is reachable at; used to skip itself during discovery.
    pub advertised_host: String,
    /// Reward recipient. When unset a wallet is generated at startup.
    pub miner_address: Option<String>,
    pub difficulty: usize,
    pub mining_interval: Duration,
    pub neighbor_sync_interval: Duration,
    pub peer_timeout: Duration,
    pub balance_policy: BalancePolicy,
    pub mine_on_start: bool,
    /// Static peer list. `None` means discover by port scan.
    pub peers: Option<Vec<String>>,
    pub port_range: (u16, u16),
    pub ip_range: (u8, u8),
    /// Serve `POST /wallet`, which hands out freshly generated private keys.
    /// Development only.
    pub dev_wallet: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
            advertised_host: "127.0.0.1".to_string(),
            miner_address: None,
            difficulty: MINING_DIFFICULTY,
            mining_interval: Duration::from_secs(MINING_INTERVAL_SECS),
            neighbor_sync_interval: Duration::from_secs(NEIGHBOR_SYNC_SECS),
            peer_timeout: Duration::from_millis(2000),
            balance_policy: BalancePolicy::Enforce,
            mine_on_start: true,
            peers: None,
            port_range: (5001, 5004),
            ip_range: (0, 1),
            dev_wallet: false,
        }
    }
}

impl NodeConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        let host = env::var("HOST").unwrap_or(d.host);
        let advertised_host = env::var("ADVERTISED_HOST").unwrap_or_else(|_| host.clone());
        let enforce = parse_env("ENFORCE_BALANCE", true);

        Self {
            port: parse_env("PORT", d.port),
            miner_address: env::var("MINER_ADDRESS").ok().filter(|a| !a.is_empty()),
            difficulty: bounded_difficulty(parse_env("MINING_DIFFICULTY", d.difficulty)),
            mining_interval: Duration::from_secs(parse_env(
                "MINING_INTERVAL_SECS",
                MINING_INTERVAL_SECS,
            )),
            neighbor_sync_interval: Duration::from_secs(parse_env(
                "NEIGHBOR_SYNC_SECS",
                NEIGHBOR_SYNC_SECS,
            )),
            peer_timeout: Duration::from_millis(parse_env("PEER_TIMEOUT_MS", 2000)),
            balance_policy: if enforce {
                BalancePolicy::Enforce
            } else {
                BalancePolicy::Skip
            },
            mine_on_start: parse_env("MINE_ON_START", d.mine_on_start),
            peers: env::var("PEERS").ok().map(|s| parse_peer_list(&s)),
            port_range: (
                parse_env("PORT_RANGE_START", d.port_range.0),
                parse_env("PORT_RANGE_END", d.port_range.1),
            ),
            ip_range: (
                parse_env("IP_RANGE_START", d.ip_range.0),
                parse_env("IP_RANGE_END", d.ip_range.1),
            ),
            dev_wallet: parse_env("DEV_WALLET", d.dev_wallet),
            host,
            advertised_host,
        }
    }

    /// `host:port` other nodes use to reach this one.
    pub fn self_address(&self) -> String {
        format!("{}:{}", self.advertised_host, self.port)
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring invalid {key}={raw:?}, using default");
            default
        }),
        Err(_) => default,
    }
}

/// Difficulties above the digest width can never be met; fall back like any
/// other invalid value.
fn bounded_difficulty(difficulty: usize) -> usize {
    if difficulty > MAX_DIFFICULTY {
        warn!(
            "ignoring MINING_DIFFICULTY={difficulty} (max {MAX_DIFFICULTY}), using {MINING_DIFFICULTY}"
        );
        return MINING_DIFFICULTY;
    }
    difficulty
}

/// Format: PEERS="host1:port1,host2:port2"
pub fn parse_peer_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peer_list_skips_blanks() {
        assert_eq!(
            parse_peer_list(" 10.0.0.1:5001, ,10.0.0.2:5002,"),
            vec!["10.0.0.1:5001", "10.0.0.2:5002"]
        );
    }

    #[test]
    fn difficulty_beyond_digest_width_falls_back() {
        assert_eq!(bounded_difficulty(65), MINING_DIFFICULTY);
        assert_eq!(bounded_difficulty(usize::MAX), MINING_DIFFICULTY);
        assert_eq!(bounded_difficulty(64), 64);
        assert_eq!(bounded_difficulty(0), 0);
    }

    #[test]
    fn defaults_follow_protocol_constants() {
        let c = NodeConfig::default();
        assert_eq!(c.difficulty, 3);
        assert_eq!(c.mining_interval, Duration::from_secs(10));
        assert_eq!(c.neighbor_sync_interval, Duration::from_secs(20));
        assert_eq!(c.self_address(), "127.0.0.1:5001");
        assert!(!c.dev_wallet);
    }
}
