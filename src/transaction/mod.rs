pub mod model;
pub mod pool;
pub mod signature;

pub use model::{Transaction, TransactionRequest};
pub use pool::{BalancePolicy, PoolSnapshot, TransactionPool};
pub use signature::{Credentials, PublicKey, Signature};
