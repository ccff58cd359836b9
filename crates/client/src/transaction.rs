//! Transaction requests and the signing seam.
//!
//! The SDK only describes what should be sent. Signing, broadcasting and
//! wallet redirects belong to a [`TransactionMediator`] supplied by the
//! caller.

use std::sync::Mutex;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde::Serialize;

use crate::error::ClientError;

/// 200 Tgas, the budget for streaming-contract change calls.
pub const GAS_SIZE: u64 = 200_000_000_000_000;
/// 100 Tgas for `ft_transfer_call` into the streaming contract.
pub const FT_TRANSFER_GAS: u64 = 100_000_000_000_000;
/// 30 Tgas for storage registration and wNEAR wrapping.
pub const STORAGE_DEPOSIT_GAS: u64 = 30_000_000_000_000;
/// Change calls attach exactly one yoctoNEAR to prove a full-access key.
pub const ONE_YOCTO: u64 = 1;

/// A single function-call action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCall {
    pub method_name: String,
    pub args: serde_json::Value,
    pub gas: u64,
    /// Attached deposit in yoctoNEAR.
    #[serde(serialize_with = "roketo_core::amount::serialize")]
    pub deposit: BigDecimal,
}

impl FunctionCall {
    pub fn new(method_name: &str, args: serde_json::Value, gas: u64, deposit: BigDecimal) -> Self {
        FunctionCall {
            method_name: method_name.to_string(),
            args,
            gas,
            deposit,
        }
    }
}

/// An ordered batch of actions addressed to one receiver contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub receiver_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_callback_url: Option<String>,
    pub actions: Vec<FunctionCall>,
}

/// Signs and submits transactions on the caller's behalf.
#[async_trait]
pub trait TransactionMediator: Send + Sync {
    /// Submit `transaction`. The returned value is whatever outcome the
    /// mediator can report (a transaction hash, a wallet redirect, ...).
    async fn sign_and_send(&self, transaction: Transaction)
        -> Result<serde_json::Value, ClientError>;
}

// ──────────────────────────────────────────────
// RecordingMediator
// ──────────────────────────────────────────────

/// A mediator that records transactions instead of sending them.
///
/// Useful for dry runs and tests.
#[derive(Default)]
pub struct RecordingMediator {
    sent: Mutex<Vec<Transaction>>,
}

impl RecordingMediator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transactions recorded so far, oldest first.
    pub fn sent(&self) -> Vec<Transaction> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TransactionMediator for RecordingMediator {
    async fn sign_and_send(
        &self,
        transaction: Transaction,
    ) -> Result<serde_json::Value, ClientError> {
        let summary = serde_json::json!({
            "receiver_id": transaction.receiver_id,
            "actions": transaction.actions.len(),
        });
        self.sent
            .lock()
            .map_err(|e| ClientError::Submit(e.to_string()))?
            .push(transaction);
        Ok(summary)
    }
}
