use log::{debug, info};
use std::future::Future;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Current neighbor list. Guarded by its own lock; readers take a copy and
/// never hold the lock across network I/O.
#[derive(Debug, Default)]
pub struct PeerSet {
    peers: Mutex<Vec<String>>,
}

impl PeerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.peers.lock().expect("mutex poisoned").clone()
    }

    pub fn replace(&self, peers: Vec<String>) {
        *self.peers.lock().expect("mutex poisoned") = peers;
    }

    pub fn len(&self) -> usize {
        self.peers.lock().expect("mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ask `discovery` for the live neighbors and store them.
    pub async fn refresh<D: Discovery>(&self, discovery: &D) {
        let found = discovery.find_neighbors().await;
        info!("NODES: {}", found.len());
        for node in &found {
            info!("> {node}");
        }
        self.replace(found);
    }
}

/// Source of live peer endpoints (`host:port`).
pub trait Discovery: Send + Sync + 'static {
    fn find_neighbors(&self) -> impl Future<Output = Vec<String>> + Send;
}

/// Fixed peer list, e.g. from the `PEERS` variable.
#[derive(Debug, Clone)]
pub struct StaticDiscovery {
    peers: Vec<String>,
}

impl StaticDiscovery {
    pub fn new(peers: Vec<String>, self_address: &str) -> Self {
        Self {
            peers: peers.into_iter().filter(|p| p != self_address).collect(),
        }
    }
}

impl Discovery for StaticDiscovery {
    async fn find_neighbors(&self) -> Vec<String> {
        self.peers.clone()
    }
}

/// Probes nearby hosts and ports for listening nodes: for every port in
/// `port_range` and every offset in `ip_range`, dials
/// `a.b.c.(d + offset):port`, skipping this node's own address.
#[derive(Debug, Clone)]
pub struct PortScanDiscovery {
    host: Ipv4Addr,
    port: u16,
    port_range: (u16, u16),
    ip_range: (u8, u8),
    dial_timeout: Duration,
}

impl PortScanDiscovery {
    pub fn new(
        host: Ipv4Addr,
        port: u16,
        port_range: (u16, u16),
        ip_range: (u8, u8),
        dial_timeout: Duration,
    ) -> Self {
        Self {
            host,
            port,
            port_range,
            ip_range,
            dial_timeout,
        }
    }

    /// Candidate endpoints in scan order, excluding this node.
    pub fn candidates(&self) -> Vec<String> {
        let own = format!("{}:{}", self.host, self.port);
        let [a, b, c, d] = self.host.octets();
        let mut out = Vec::new();
        for port in self.port_range.0..=self.port_range.1 {
            for offset in self.ip_range.0..=self.ip_range.1 {
                let Some(last) = d.checked_add(offset) else {
                    continue;
                };
                let target = format!("{a}.{b}.{c}.{last}:{port}");
                if target != own {
                    out.push(target);
                }
            }
        }
        out
    }
}

impl Discovery for PortScanDiscovery {
    async fn find_neighbors(&self) -> Vec<String> {
        let mut found = Vec::new();
        for target in self.candidates() {
            match tokio::time::timeout(self.dial_timeout, TcpStream::connect(&target)).await {
                Ok(Ok(_)) => found.push(target),
                Ok(Err(e)) => debug!("{target} {e}"),
                Err(_) => debug!("{target} dial timed out"),
            }
        }
        found
    }
}

/// Refresh `peers` every `interval` until `token` is cancelled.
pub fn spawn_refresh<D: Discovery>(
    peers: Arc<PeerSet>,
    discovery: D,
    interval: Duration,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await; // first tick completes immediately; startup already refreshed
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("peer refresh stopped");
                    break;
                }
                _ = ticker.tick() => peers.refresh(&discovery).await,
            }
        }
    })
}
