//! NEAR access for Roketo streams.
//!
//! Reads go through a [`ChainClient`] (JSON-RPC in production, a fixture
//! table in tests). Writes are described as [`Transaction`]s and handed to a
//! caller-supplied [`TransactionMediator`] for signing.

pub mod api;
pub mod chain;
pub mod config;
pub mod entities;
pub mod error;
pub mod methods;
pub mod rpc;
pub mod transaction;

pub use api::{ListDirection, RoketoApi};
pub use chain::{ChainClient, StaticChainClient};
pub use config::ClientConfig;
pub use entities::{RoketoAccount, RoketoDao, RoketoTokenMeta, StorageBalance, TokenMetadata};
pub use error::{ClientError, ConfigError};
pub use methods::{CreateStreamParams, CreateStreamRequest, StorageRegistration};
pub use rpc::RpcChainClient;
pub use transaction::{FunctionCall, RecordingMediator, Transaction, TransactionMediator};
