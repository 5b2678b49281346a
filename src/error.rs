use thiserror::Error;

/// Why a transaction was refused by the pool. The pool is never mutated when
/// one of these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdmissionError {
    #[error("signature verification failed")]
    InvalidSignature,
    #[error("missing public key or signature")]
    MissingCredentials,
    #[error("insufficient balance: {sender} has {balance}, needs {value}")]
    InsufficientBalance {
        sender: String,
        balance: f64,
        value: f64,
    },
    #[error("invalid transfer value {0}")]
    InvalidValue(f64),
    #[error("reserved sender identity")]
    ReservedSender,
    #[error("malformed request: {0}")]
    Malformed(String),
}

/// Decoding failures for wire data (hashes, keys, signatures, chains).
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single failed interaction with one peer.
#[derive(Debug, Error)]
pub enum PeerError {
    #[error("request to {peer} failed: {source}")]
    Transport {
        peer: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{peer} answered with status {status}")]
    Status { peer: String, status: u16 },
    #[error("undecodable response from {peer}: {source}")]
    Decode {
        peer: String,
        #[source]
        source: CodecError,
    },
}

#[derive(Debug, Error)]
pub enum MiningError {
    #[error("chain tip changed while searching for a nonce")]
    StaleTip,
    #[error("nonce space exhausted")]
    NonceExhausted,
    #[error("reward transaction refused: {0}")]
    Reward(#[from] AdmissionError),
    #[error("nonce search task failed: {0}")]
    Search(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("failed to build peer http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
