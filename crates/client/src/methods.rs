//! Transaction builders for streaming-contract actions.
//!
//! Every function here is pure: it turns parameters (and, for stream
//! creation, already-fetched registration facts) into a [`Transaction`].
//! Submitting it is up to a [`crate::TransactionMediator`].

use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use roketo_core::StreamDescription;
use serde::Serialize;
use serde_json::json;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::transaction::{
    FunctionCall, Transaction, FT_TRANSFER_GAS, GAS_SIZE, ONE_YOCTO, STORAGE_DEPOSIT_GAS,
};

/// 0.0025 NEAR in yocto: the storage fee for registering one account on a
/// fungible-token contract.
pub const STORAGE_DEPOSIT_YOCTO: &str = "2500000000000000000000";

const TRANSFER_MEMO: &str = "Roketo transfer";

pub fn storage_deposit_amount() -> BigDecimal {
    BigDecimal::from_str(STORAGE_DEPOSIT_YOCTO).unwrap_or_default()
}

fn one_yocto() -> BigDecimal {
    BigDecimal::from(ONE_YOCTO)
}

fn is_wnear(config: &ClientConfig, token_account_id: &str) -> bool {
    token_account_id == config.wnear_id
}

// ──────────────────────────────────────────────
// Stream state changes
// ──────────────────────────────────────────────

fn change_call(config: &ClientConfig, method: &str, args: serde_json::Value) -> Transaction {
    Transaction {
        receiver_id: config.roketo_contract_name.clone(),
        wallet_callback_url: None,
        actions: vec![FunctionCall::new(method, args, GAS_SIZE, one_yocto())],
    }
}

pub fn start_stream(config: &ClientConfig, stream_id: &str) -> Transaction {
    change_call(config, "start_stream", json!({ "stream_id": stream_id }))
}

pub fn pause_stream(config: &ClientConfig, stream_id: &str) -> Transaction {
    change_call(config, "pause_stream", json!({ "stream_id": stream_id }))
}

pub fn stop_stream(config: &ClientConfig, stream_id: &str) -> Transaction {
    change_call(config, "stop_stream", json!({ "stream_id": stream_id }))
}

/// Withdraw from several incoming streams in one call.
pub fn withdraw_streams(config: &ClientConfig, stream_ids: &[String]) -> Transaction {
    change_call(config, "withdraw", json!({ "stream_ids": stream_ids }))
}

// ──────────────────────────────────────────────
// Funding
// ──────────────────────────────────────────────

/// Top up an existing stream with `amount` (smallest units).
///
/// For wNEAR the NEAR is wrapped first, in the same transaction.
pub fn add_funds(
    config: &ClientConfig,
    stream_id: &str,
    token_account_id: &str,
    amount: &BigDecimal,
    callback_url: Option<&str>,
) -> Transaction {
    let msg = json!({ "Deposit": { "stream_id": stream_id } }).to_string();
    let mut actions = vec![FunctionCall::new(
        "ft_transfer_call",
        json!({
            "receiver_id": config.roketo_contract_name,
            "amount": roketo_core::amount::format_amount(amount),
            "memo": TRANSFER_MEMO,
            "msg": msg,
        }),
        FT_TRANSFER_GAS,
        one_yocto(),
    )];

    if is_wnear(config, token_account_id) {
        actions.insert(
            0,
            FunctionCall::new("near_deposit", json!({}), STORAGE_DEPOSIT_GAS, amount.clone()),
        );
    }

    Transaction {
        receiver_id: token_account_id.to_string(),
        wallet_callback_url: callback_url.map(str::to_string),
        actions,
    }
}

// ──────────────────────────────────────────────
// Stream creation
// ──────────────────────────────────────────────

/// The `Create` request the streaming contract expects inside the
/// `ft_transfer_call` message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateStreamRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub owner_id: String,
    pub receiver_id: String,
    #[serde(serialize_with = "roketo_core::amount::serialize")]
    pub balance: BigDecimal,
    #[serde(serialize_with = "roketo_core::amount::serialize")]
    pub tokens_per_sec: BigDecimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cliff_period_sec: Option<u64>,
    pub is_auto_start_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_expirable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,
}

/// User-facing parameters of a new stream.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateStreamParams {
    pub owner_id: String,
    pub receiver_id: String,
    pub token_account_id: String,
    /// Amount that will stream, in smallest units.
    pub deposit: BigDecimal,
    /// Contract fee on top of the deposit.
    pub commission_on_create: BigDecimal,
    pub tokens_per_sec: BigDecimal,
    pub comment: String,
    pub color: Option<String>,
    pub cliff_period_sec: Option<u64>,
    /// Create the stream without starting it.
    pub delayed: bool,
    pub is_expirable: Option<bool>,
    pub is_locked: Option<bool>,
    pub callback_url: Option<String>,
}

impl CreateStreamParams {
    /// Contract request plus the total to transfer (deposit + commission).
    pub fn to_request(&self) -> (CreateStreamRequest, BigDecimal) {
        let description =
            StreamDescription::new(Some(self.comment.clone()), self.color.clone()).encode();
        let request = CreateStreamRequest {
            description,
            owner_id: self.owner_id.clone(),
            receiver_id: self.receiver_id.clone(),
            balance: self.deposit.clone(),
            tokens_per_sec: self.tokens_per_sec.clone(),
            cliff_period_sec: self.cliff_period_sec,
            is_auto_start_enabled: !self.delayed,
            is_expirable: self.is_expirable,
            is_locked: self.is_locked,
        };
        (request, &self.deposit + &self.commission_on_create)
    }
}

/// Which accounts still need storage on the token contract, and what that
/// costs.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageRegistration {
    /// `(account_id, is_registered)` for owner, receiver, streaming
    /// contract and finance contract, in that order.
    pub accounts: Vec<(String, bool)>,
    /// Storage fee for one account.
    pub deposit_amount: BigDecimal,
    /// Storage fees for every unregistered account above.
    pub deposit_sum: BigDecimal,
}

impl StorageRegistration {
    /// Tally registrations for `storage_account_ids` followed by the two
    /// contracts.
    pub fn from_flags(accounts: Vec<(String, bool)>) -> Self {
        let deposit_amount = storage_deposit_amount();
        let unregistered = accounts.iter().filter(|(_, registered)| !registered).count();
        let deposit_sum = &deposit_amount * BigDecimal::from(unregistered as u64);
        StorageRegistration {
            accounts,
            deposit_amount,
            deposit_sum,
        }
    }

    pub fn is_registered(&self, account_id: &str) -> bool {
        self.accounts
            .iter()
            .any(|(id, registered)| id == account_id && *registered)
    }
}

/// Fund and create a stream in one token-contract transaction.
///
/// Action order: wNEAR wrapping (if any), storage registration for the
/// receiver then the owner (only those not yet registered), and finally
/// the `ft_transfer_call` carrying the `Create` request.
pub fn transfer(
    config: &ClientConfig,
    request: &CreateStreamRequest,
    amount: &BigDecimal,
    token_account_id: &str,
    registration: &StorageRegistration,
    callback_url: Option<&str>,
) -> Transaction {
    let msg = json!({ "Create": { "request": request } }).to_string();
    let mut actions = vec![FunctionCall::new(
        "ft_transfer_call",
        json!({
            "receiver_id": config.roketo_contract_name,
            "amount": roketo_core::amount::format_amount(&amount.with_scale(0)),
            "memo": TRANSFER_MEMO,
            "msg": msg,
        }),
        FT_TRANSFER_GAS,
        one_yocto(),
    )];

    for account_id in [&request.owner_id, &request.receiver_id] {
        if !registration.is_registered(account_id) {
            actions.insert(
                0,
                FunctionCall::new(
                    "storage_deposit",
                    json!({ "account_id": account_id, "registration_only": true }),
                    STORAGE_DEPOSIT_GAS,
                    registration.deposit_amount.clone(),
                ),
            );
        }
    }

    if is_wnear(config, token_account_id) {
        let wrap = (amount + &registration.deposit_sum).with_scale(0);
        actions.insert(
            0,
            FunctionCall::new("near_deposit", json!({}), STORAGE_DEPOSIT_GAS, wrap),
        );
    }

    Transaction {
        receiver_id: token_account_id.to_string(),
        wallet_callback_url: callback_url.map(str::to_string),
        actions,
    }
}

/// True when `amount` is a positive whole number of smallest units.
pub fn is_valid_transfer_amount(amount: &BigDecimal) -> bool {
    *amount > BigDecimal::zero() && amount.is_integer()
}

/// [`is_valid_transfer_amount`] as a `Result`, for the submit paths.
pub fn check_transfer_amount(amount: &BigDecimal) -> Result<(), ClientError> {
    if is_valid_transfer_amount(amount) {
        Ok(())
    } else {
        Err(ClientError::InvalidTransferAmount {
            amount: roketo_core::amount::format_amount(amount),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClientConfig {
        ClientConfig::default()
    }

    fn params() -> CreateStreamParams {
        CreateStreamParams {
            owner_id: "alice.near".to_string(),
            receiver_id: "bob.near".to_string(),
            token_account_id: "usdt.near".to_string(),
            deposit: BigDecimal::from(1_000_000),
            commission_on_create: BigDecimal::from(100),
            tokens_per_sec: BigDecimal::from(10),
            comment: "rent".to_string(),
            color: None,
            cliff_period_sec: None,
            delayed: false,
            is_expirable: None,
            is_locked: Some(false),
            callback_url: None,
        }
    }

    #[test]
    fn state_changes_target_streaming_contract() {
        let tx = start_stream(&config(), "abc");
        assert_eq!(tx.receiver_id, "streaming.r-v2.near");
        assert_eq!(tx.actions.len(), 1);
        assert_eq!(tx.actions[0].method_name, "start_stream");
        assert_eq!(tx.actions[0].args, json!({"stream_id": "abc"}));
        assert_eq!(tx.actions[0].gas, GAS_SIZE);
        assert_eq!(tx.actions[0].deposit, BigDecimal::from(1));

        assert_eq!(pause_stream(&config(), "abc").actions[0].method_name, "pause_stream");
        assert_eq!(stop_stream(&config(), "abc").actions[0].method_name, "stop_stream");
    }

    #[test]
    fn withdraw_takes_many_ids() {
        let tx = withdraw_streams(&config(), &["a".to_string(), "b".to_string()]);
        assert_eq!(tx.actions[0].args, json!({"stream_ids": ["a", "b"]}));
    }

    #[test]
    fn add_funds_for_plain_token() {
        let tx = add_funds(&config(), "abc", "usdt.near", &BigDecimal::from(500), None);
        assert_eq!(tx.receiver_id, "usdt.near");
        assert_eq!(tx.actions.len(), 1);
        let args = &tx.actions[0].args;
        assert_eq!(args["amount"], "500");
        assert_eq!(args["receiver_id"], "streaming.r-v2.near");
        assert_eq!(args["msg"], r#"{"Deposit":{"stream_id":"abc"}}"#);
    }

    #[test]
    fn add_funds_wraps_near_first() {
        let tx = add_funds(&config(), "abc", "wrap.near", &BigDecimal::from(500), Some("https://app"));
        assert_eq!(tx.actions.len(), 2);
        assert_eq!(tx.actions[0].method_name, "near_deposit");
        assert_eq!(tx.actions[0].deposit, BigDecimal::from(500));
        assert_eq!(tx.actions[1].method_name, "ft_transfer_call");
        assert_eq!(tx.wallet_callback_url.as_deref(), Some("https://app"));
    }

    #[test]
    fn create_request_carries_description_and_total() {
        let (request, total) = params().to_request();
        assert_eq!(request.description.as_deref(), Some(r#"{"c":"rent"}"#));
        assert!(request.is_auto_start_enabled);
        assert_eq!(total, BigDecimal::from(1_000_100));

        let v = serde_json::to_value(&request).unwrap();
        assert_eq!(v["balance"], "1000000");
        assert!(v.get("cliff_period_sec").is_none());
        assert_eq!(v["is_locked"], false);
    }

    #[test]
    fn empty_comment_and_color_leave_no_description() {
        let mut p = params();
        p.comment = String::new();
        p.delayed = true;
        let (request, _) = p.to_request();
        assert_eq!(request.description, None);
        assert!(!request.is_auto_start_enabled);
    }

    #[test]
    fn registration_tally() {
        let reg = StorageRegistration::from_flags(vec![
            ("alice.near".to_string(), true),
            ("bob.near".to_string(), false),
            ("streaming.r-v2.near".to_string(), true),
            ("finance.r-v2.near".to_string(), false),
        ]);
        assert_eq!(
            reg.deposit_sum,
            BigDecimal::from_str("5000000000000000000000").unwrap()
        );
        assert!(reg.is_registered("alice.near"));
        assert!(!reg.is_registered("bob.near"));
    }

    #[test]
    fn transfer_registers_missing_accounts_before_create() {
        let (request, total) = params().to_request();
        let reg = StorageRegistration::from_flags(vec![
            ("alice.near".to_string(), false),
            ("bob.near".to_string(), false),
            ("streaming.r-v2.near".to_string(), true),
            ("finance.r-v2.near".to_string(), true),
        ]);
        let tx = transfer(&config(), &request, &total, "usdt.near", &reg, None);
        let methods: Vec<&str> = tx.actions.iter().map(|a| a.method_name.as_str()).collect();
        assert_eq!(methods, ["storage_deposit", "storage_deposit", "ft_transfer_call"]);
        assert_eq!(tx.actions[0].args["account_id"], "bob.near");
        assert_eq!(tx.actions[1].args["account_id"], "alice.near");
        assert_eq!(tx.actions[0].args["registration_only"], true);

        let msg: serde_json::Value =
            serde_json::from_str(tx.actions[2].args["msg"].as_str().unwrap()).unwrap();
        assert_eq!(msg["Create"]["request"]["receiver_id"], "bob.near");
        assert_eq!(tx.actions[2].args["amount"], "1000100");
    }

    #[test]
    fn transfer_in_wnear_wraps_amount_plus_storage() {
        let (request, total) = params().to_request();
        let reg = StorageRegistration::from_flags(vec![
            ("alice.near".to_string(), true),
            ("bob.near".to_string(), true),
            ("streaming.r-v2.near".to_string(), true),
            ("finance.r-v2.near".to_string(), false),
        ]);
        let tx = transfer(&config(), &request, &total, "wrap.near", &reg, None);
        let methods: Vec<&str> = tx.actions.iter().map(|a| a.method_name.as_str()).collect();
        assert_eq!(methods, ["near_deposit", "ft_transfer_call"]);
        assert_eq!(
            tx.actions[0].deposit,
            BigDecimal::from(1_000_100) + storage_deposit_amount()
        );
    }

    #[test]
    fn transfer_amount_validation() {
        assert!(is_valid_transfer_amount(&BigDecimal::from(1)));
        assert!(!is_valid_transfer_amount(&BigDecimal::from(0)));
        assert!(!is_valid_transfer_amount(&BigDecimal::from_str("1.5").unwrap()));
    }

    #[test]
    fn check_transfer_amount_names_the_amount() {
        assert!(check_transfer_amount(&BigDecimal::from(10)).is_ok());
        match check_transfer_amount(&BigDecimal::from(0)) {
            Err(ClientError::InvalidTransferAmount { amount }) => assert_eq!(amount, "0"),
            other => panic!("expected InvalidTransferAmount, got {:?}", other),
        }
    }
}
