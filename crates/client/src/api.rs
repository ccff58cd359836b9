//! High-level access to the streaming contract and token contracts.
//!
//! [`RoketoApi`] pairs a [`ChainClient`] for reads with a
//! [`TransactionMediator`] for writes. Stream snapshots coming back from
//! the chain are validated before they reach the caller.

use bigdecimal::{BigDecimal, Zero};
use log::{info, warn};
use roketo_core::StreamSnapshot;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::chain::ChainClient;
use crate::config::ClientConfig;
use crate::entities::{RoketoAccount, RoketoDao, StorageBalance, TokenMetadata};
use crate::error::ClientError;
use crate::methods::{self, CreateStreamParams, StorageRegistration};
use crate::transaction::{Transaction, TransactionMediator};

/// Which side of a stream an account listing is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListDirection {
    Incoming,
    Outgoing,
}

impl ListDirection {
    fn method(self) -> &'static str {
        match self {
            ListDirection::Incoming => "get_account_incoming_streams",
            ListDirection::Outgoing => "get_account_outgoing_streams",
        }
    }
}

pub struct RoketoApi {
    chain: Box<dyn ChainClient>,
    config: ClientConfig,
}

impl RoketoApi {
    pub fn new(chain: Box<dyn ChainClient>, config: ClientConfig) -> Self {
        RoketoApi { chain, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The configured account, or [`ClientError::MissingAccount`].
    pub fn account_id(&self) -> Result<&str, ClientError> {
        self.config
            .account_id
            .as_deref()
            .ok_or(ClientError::MissingAccount)
    }

    async fn view_as<T: DeserializeOwned>(
        &self,
        contract_id: &str,
        method: &str,
        args: serde_json::Value,
    ) -> Result<T, ClientError> {
        let value = self.chain.view(contract_id, method, args).await?;
        serde_json::from_value(value).map_err(|e| ClientError::Decode {
            what: format!("{} result", method),
            message: e.to_string(),
        })
    }

    // ──────────────────────────────────────────────
    // Streaming contract reads
    // ──────────────────────────────────────────────

    pub async fn get_stream(&self, stream_id: &str) -> Result<StreamSnapshot, ClientError> {
        let value = self
            .chain
            .view(
                &self.config.roketo_contract_name,
                "get_stream",
                json!({ "stream_id": stream_id }),
            )
            .await?;
        Ok(StreamSnapshot::from_json_value(value)?)
    }

    /// Streams of `account_id` on one side, paginated by `from`/`limit`.
    ///
    /// A failed call yields an empty page. Snapshots that do arrive but
    /// break invariants are still an error.
    pub async fn get_streams(
        &self,
        direction: ListDirection,
        account_id: &str,
        from: u32,
        limit: u32,
    ) -> Result<Vec<StreamSnapshot>, ClientError> {
        let method = direction.method();
        let value = match self
            .chain
            .view(
                &self.config.roketo_contract_name,
                method,
                json!({ "account_id": account_id, "from": from, "limit": limit }),
            )
            .await
        {
            Ok(value) => value,
            Err(e) => {
                warn!("{} for {} failed, returning no streams: {}", method, account_id, e);
                return Ok(Vec::new());
            }
        };

        let items = match value {
            serde_json::Value::Array(items) => items,
            other => {
                warn!("{} returned a non-list value: {}", method, other);
                return Ok(Vec::new());
            }
        };
        items
            .into_iter()
            .map(|item| StreamSnapshot::from_json_value(item).map_err(ClientError::from))
            .collect()
    }

    pub async fn get_incoming_streams(
        &self,
        account_id: &str,
        from: u32,
        limit: u32,
    ) -> Result<Vec<StreamSnapshot>, ClientError> {
        self.get_streams(ListDirection::Incoming, account_id, from, limit)
            .await
    }

    pub async fn get_outgoing_streams(
        &self,
        account_id: &str,
        from: u32,
        limit: u32,
    ) -> Result<Vec<StreamSnapshot>, ClientError> {
        self.get_streams(ListDirection::Outgoing, account_id, from, limit)
            .await
    }

    /// Contract-side statistics for `account_id`. Unknown accounts, a
    /// missing id and failed calls all give [`RoketoAccount::empty`].
    pub async fn get_account(&self, account_id: Option<&str>) -> RoketoAccount {
        let Some(account_id) = account_id else {
            return RoketoAccount::empty();
        };
        match self
            .view_as(
                &self.config.roketo_contract_name,
                "get_account",
                json!({ "account_id": account_id }),
            )
            .await
        {
            Ok(account) => account,
            Err(e) => {
                warn!("get_account for {} failed: {}", account_id, e);
                RoketoAccount::empty()
            }
        }
    }

    pub async fn get_dao(&self) -> Result<RoketoDao, ClientError> {
        self.view_as(&self.config.roketo_contract_name, "get_dao", json!({}))
            .await
    }

    // ──────────────────────────────────────────────
    // Token contract reads
    // ──────────────────────────────────────────────

    pub async fn get_token_metadata(
        &self,
        token_account_id: &str,
    ) -> Result<TokenMetadata, ClientError> {
        self.view_as(token_account_id, "ft_metadata", json!({})).await
    }

    /// Token balance in smallest units; zero when no account is given.
    pub async fn get_balance(
        &self,
        token_account_id: &str,
        account_id: Option<&str>,
    ) -> Result<BigDecimal, ClientError> {
        let Some(account_id) = account_id else {
            return Ok(BigDecimal::zero());
        };
        let raw: String = self
            .view_as(
                token_account_id,
                "ft_balance_of",
                json!({ "account_id": account_id }),
            )
            .await?;
        roketo_core::amount::parse_amount("ft_balance_of", &raw).map_err(ClientError::from)
    }

    /// Whether `account_id` holds a non-zero storage deposit on the token.
    pub async fn is_registered(
        &self,
        token_account_id: &str,
        account_id: &str,
    ) -> Result<bool, ClientError> {
        let balance: Option<StorageBalance> = self
            .view_as(
                token_account_id,
                "storage_balance_of",
                json!({ "account_id": account_id }),
            )
            .await?;
        Ok(balance.is_some_and(|b| !b.total.is_zero()))
    }

    /// Storage registration state of owner, receiver and both contracts.
    pub async fn count_storage_deposit(
        &self,
        token_account_id: &str,
        owner_id: &str,
        receiver_id: &str,
    ) -> Result<StorageRegistration, ClientError> {
        let mut accounts = Vec::with_capacity(4);
        for account_id in [
            owner_id,
            receiver_id,
            self.config.roketo_contract_name.as_str(),
            self.config.finance_contract_name.as_str(),
        ] {
            let registered = self.is_registered(token_account_id, account_id).await?;
            accounts.push((account_id.to_string(), registered));
        }
        Ok(StorageRegistration::from_flags(accounts))
    }

    // ──────────────────────────────────────────────
    // Writes
    // ──────────────────────────────────────────────

    async fn submit(
        &self,
        mediator: &dyn TransactionMediator,
        transaction: Transaction,
    ) -> Result<serde_json::Value, ClientError> {
        info!(
            "submitting {} action(s) to {}",
            transaction.actions.len(),
            transaction.receiver_id
        );
        mediator.sign_and_send(transaction).await
    }

    pub async fn start_stream(
        &self,
        mediator: &dyn TransactionMediator,
        stream_id: &str,
    ) -> Result<serde_json::Value, ClientError> {
        self.submit(mediator, methods::start_stream(&self.config, stream_id))
            .await
    }

    pub async fn pause_stream(
        &self,
        mediator: &dyn TransactionMediator,
        stream_id: &str,
    ) -> Result<serde_json::Value, ClientError> {
        self.submit(mediator, methods::pause_stream(&self.config, stream_id))
            .await
    }

    pub async fn stop_stream(
        &self,
        mediator: &dyn TransactionMediator,
        stream_id: &str,
    ) -> Result<serde_json::Value, ClientError> {
        self.submit(mediator, methods::stop_stream(&self.config, stream_id))
            .await
    }

    pub async fn withdraw_streams(
        &self,
        mediator: &dyn TransactionMediator,
        stream_ids: &[String],
    ) -> Result<serde_json::Value, ClientError> {
        self.submit(mediator, methods::withdraw_streams(&self.config, stream_ids))
            .await
    }

    pub async fn add_funds(
        &self,
        mediator: &dyn TransactionMediator,
        stream_id: &str,
        token_account_id: &str,
        amount: &BigDecimal,
        callback_url: Option<&str>,
    ) -> Result<serde_json::Value, ClientError> {
        methods::check_transfer_amount(amount)?;
        let tx = methods::add_funds(
            &self.config,
            stream_id,
            token_account_id,
            amount,
            callback_url,
        );
        self.submit(mediator, tx).await
    }

    /// Create and fund a stream, registering storage where needed.
    ///
    /// The deposit must be a positive whole number of units.
    pub async fn create_stream(
        &self,
        mediator: &dyn TransactionMediator,
        params: &CreateStreamParams,
    ) -> Result<serde_json::Value, ClientError> {
        let (request, amount) = params.to_request();
        methods::check_transfer_amount(&params.deposit)?;
        let registration = self
            .count_storage_deposit(
                &params.token_account_id,
                &params.owner_id,
                &params.receiver_id,
            )
            .await?;
        let tx = methods::transfer(
            &self.config,
            &request,
            &amount,
            &params.token_account_id,
            &registration,
            params.callback_url.as_deref(),
        );
        self.submit(mediator, tx).await
    }
}
