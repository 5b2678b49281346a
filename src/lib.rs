pub mod api;
pub mod blockchain;
pub mod codec;
pub mod config;
pub mod error;
pub mod node;
pub mod transaction;
pub mod wallet;
