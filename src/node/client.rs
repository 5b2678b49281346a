use log::debug;
use reqwest::{Client, Response};
use std::time::Duration;

use crate::blockchain::Block;
use crate::codec;
use crate::error::{NodeError, PeerError};
use crate::transaction::TransactionRequest;

/// HTTP client for the peer protocol. Every call is bounded by the timeout
/// given at construction and fails independently of other peers.
#[derive(Clone)]
pub struct PeerClient {
    http: Client,
}

impl PeerClient {
    pub fn new(timeout: Duration) -> Result<Self, NodeError> {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self { http })
    }

    /// `GET {peer}/chain`
    pub async fn fetch_chain(&self, peer: &str) -> Result<Vec<Block>, PeerError> {
        let response = self.checked(peer, self.http.get(url(peer, "chain"))).await?;
        let body = response.bytes().await.map_err(|source| PeerError::Transport {
            peer: peer.to_string(),
            source,
        })?;
        codec::decode_chain(&body).map_err(|e| {
            debug!("undecodable chain from {peer}: {e}");
            PeerError::Decode {
                peer: peer.to_string(),
                source: e,
            }
        })
    }

    /// `PUT {peer}/transactions`
    pub async fn relay_transaction(
        &self,
        peer: &str,
        request: &TransactionRequest,
    ) -> Result<(), PeerError> {
        self.checked(peer, self.http.put(url(peer, "transactions")).json(request))
            .await
            .map(drop)
    }

    /// `DELETE {peer}/transactions`
    pub async fn clear_pool(&self, peer: &str) -> Result<(), PeerError> {
        self.checked(peer, self.http.delete(url(peer, "transactions")))
            .await
            .map(drop)
    }

    /// `PUT {peer}/consensus`
    pub async fn request_consensus(&self, peer: &str) -> Result<(), PeerError> {
        self.checked(peer, self.http.put(url(peer, "consensus")))
            .await
            .map(drop)
    }

    async fn checked(
        &self,
        peer: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Response, PeerError> {
        let response = request
            .send()
            .await
            .map_err(|source| PeerError::Transport {
                peer: peer.to_string(),
                source,
            })?;
        if !response.status().is_success() {
            return Err(PeerError::Status {
                peer: peer.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response)
    }
}

fn url(peer: &str, path: &str) -> String {
    format!("http://{peer}/{path}")
}
