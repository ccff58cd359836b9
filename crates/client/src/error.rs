use roketo_core::SnapshotError;

/// All errors that can be returned while talking to the chain.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request never produced a usable response.
    #[error("transport error calling {url}: {message}")]
    Transport { url: String, message: String },

    /// The RPC node answered with a JSON-RPC error object.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The contract view call itself failed (panic, missing method, bad args).
    #[error("contract call {contract_id}.{method} failed: {message}")]
    Contract {
        contract_id: String,
        method: String,
        message: String,
    },

    /// The response could not be decoded into the expected shape.
    #[error("could not decode {what}: {message}")]
    Decode { what: String, message: String },

    /// The contract returned a stream that breaks snapshot invariants.
    #[error("invalid stream snapshot: {0}")]
    Snapshot(#[from] SnapshotError),

    /// A transfer amount that is zero or not a whole number of units.
    #[error("invalid transfer amount '{amount}': must be a positive whole number of units")]
    InvalidTransferAmount { amount: String },

    /// No account is configured but the call needs one.
    #[error("no account id configured")]
    MissingAccount,

    /// The transaction mediator refused or failed to submit.
    #[error("transaction submission failed: {0}")]
    Submit(String),

    /// A blocking task panicked or was cancelled.
    #[error("task join error: {0}")]
    Join(String),
}

/// Errors raised while loading [`crate::ClientConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("error reading config file '{path}': {message}")]
    Read { path: String, message: String },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for '{key}': {message}")]
    Invalid { key: String, message: String },
}
