//! The chain-client seam.
//!
//! [`ChainClient`] performs read-only contract view calls. The high-level
//! [`crate::RoketoApi`] is written against this trait so that the transport
//! (JSON-RPC over HTTP, a fixture table in tests) stays swappable.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::ClientError;

/// Read-only access to contract view methods.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Call `method` on `contract_id` with JSON `args` and return the
    /// decoded JSON result.
    async fn view(
        &self,
        contract_id: &str,
        method: &str,
        args: serde_json::Value,
    ) -> Result<serde_json::Value, ClientError>;
}

// ──────────────────────────────────────────────
// StaticChainClient
// ──────────────────────────────────────────────

/// A chain client that answers from a fixed table.
///
/// Responses are keyed by `(contract_id, method)`. Calls without an entry
/// fail with [`ClientError::Contract`]. Every call is recorded so tests can
/// assert on the arguments that were sent.
#[derive(Default)]
pub struct StaticChainClient {
    responses: HashMap<(String, String), serde_json::Value>,
    calls: Mutex<Vec<(String, String, serde_json::Value)>>,
}

impl StaticChainClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the response for a contract method.
    pub fn with_response(
        mut self,
        contract_id: &str,
        method: &str,
        response: serde_json::Value,
    ) -> Self {
        self.responses
            .insert((contract_id.to_string(), method.to_string()), response);
        self
    }

    /// All calls made so far, oldest first.
    pub fn calls(&self) -> Vec<(String, String, serde_json::Value)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChainClient for StaticChainClient {
    async fn view(
        &self,
        contract_id: &str,
        method: &str,
        args: serde_json::Value,
    ) -> Result<serde_json::Value, ClientError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((contract_id.to_string(), method.to_string(), args));
        }
        self.responses
            .get(&(contract_id.to_string(), method.to_string()))
            .cloned()
            .ok_or_else(|| ClientError::Contract {
                contract_id: contract_id.to_string(),
                method: method.to_string(),
                message: "no response registered".to_string(),
            })
    }
}
