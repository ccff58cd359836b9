//! Contract-side records other than streams.
//!
//! Amounts are smallest-unit decimal strings on the wire; unknown fields
//! are ignored so newer contract versions keep decoding.

use std::collections::HashMap;

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

/// Per-account stream statistics kept by the streaming contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoketoAccount {
    pub active_incoming_streams: u32,
    pub active_outgoing_streams: u32,
    pub inactive_incoming_streams: u32,
    pub inactive_outgoing_streams: u32,
    #[serde(default)]
    pub total_incoming: HashMap<String, BigDecimal>,
    #[serde(default)]
    pub total_outgoing: HashMap<String, BigDecimal>,
    #[serde(default)]
    pub total_received: HashMap<String, BigDecimal>,
    #[serde(with = "roketo_core::amount")]
    pub deposit: BigDecimal,
    #[serde(with = "roketo_core::amount")]
    pub stake: BigDecimal,
    pub last_created_stream: Option<String>,
    #[serde(default)]
    pub is_cron_allowed: bool,
}

impl RoketoAccount {
    /// The record reported for an account the contract does not know.
    pub fn empty() -> Self {
        RoketoAccount {
            active_incoming_streams: 0,
            active_outgoing_streams: 0,
            inactive_incoming_streams: 0,
            inactive_outgoing_streams: 0,
            total_incoming: HashMap::new(),
            total_outgoing: HashMap::new(),
            total_received: HashMap::new(),
            deposit: BigDecimal::zero(),
            stake: BigDecimal::zero(),
            last_created_stream: None,
            is_cron_allowed: true,
        }
    }
}

/// Streaming-contract settings for one whitelisted token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoketoTokenMeta {
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub is_payment: bool,
    #[serde(default, with = "roketo_core::amount")]
    pub commission_on_create: BigDecimal,
    #[serde(default)]
    pub storage_balance_needed: Option<BigDecimal>,
    #[serde(default)]
    pub gas_for_ft_transfer: Option<String>,
    #[serde(default)]
    pub gas_for_storage_deposit: Option<String>,
}

/// Global streaming-contract configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoketoDao {
    pub dao_id: String,
    #[serde(default)]
    pub tokens: HashMap<String, RoketoTokenMeta>,
    #[serde(default, with = "roketo_core::amount")]
    pub commission_non_payment_ft: BigDecimal,
    #[serde(default)]
    pub utility_token_id: Option<String>,
    #[serde(default)]
    pub utility_token_decimals: Option<u8>,
}

impl RoketoDao {
    /// Commission charged when creating a stream in `token_account_id`.
    ///
    /// Payment tokens carry their own commission; everything else pays the
    /// flat non-payment fee.
    pub fn commission_for(&self, token_account_id: &str) -> BigDecimal {
        match self.tokens.get(token_account_id) {
            Some(meta) if meta.is_payment => meta.commission_on_create.clone(),
            _ => self.commission_non_payment_ft.clone(),
        }
    }
}

/// NEP-148 fungible token metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub spec: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub reference_hash: Option<String>,
    pub decimals: u8,
}

/// NEP-145 storage balance of an account on a token contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageBalance {
    #[serde(with = "roketo_core::amount")]
    pub total: BigDecimal,
    #[serde(with = "roketo_core::amount")]
    pub available: BigDecimal,
}
