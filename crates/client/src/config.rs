//! Client configuration.
//!
//! Values come from three layers, later ones winning:
//! 1. built-in mainnet defaults
//! 2. a TOML file (`rpc_url = "..."`, `roketo_contract_name = "..."`, ...)
//! 3. `ROKETO_*` environment variables

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_RPC_URL: &str = "https://rpc.mainnet.near.org";
pub const DEFAULT_ROKETO_CONTRACT: &str = "streaming.r-v2.near";
pub const DEFAULT_FINANCE_CONTRACT: &str = "finance.r-v2.near";
pub const DEFAULT_WNEAR_ID: &str = "wrap.near";

/// Environment variable names, paired with the config key they override.
pub const ENV_OVERRIDES: [(&str, &str); 5] = [
    ("ROKETO_RPC_URL", "rpc_url"),
    ("ROKETO_CONTRACT_NAME", "roketo_contract_name"),
    ("ROKETO_FINANCE_CONTRACT_NAME", "finance_contract_name"),
    ("ROKETO_WNEAR_ID", "wnear_id"),
    ("ROKETO_ACCOUNT_ID", "account_id"),
];

/// Where to find the chain and the contracts on it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub rpc_url: String,
    pub roketo_contract_name: String,
    pub finance_contract_name: String,
    pub wnear_id: String,
    /// Account whose streams are listed and on whose behalf transactions are
    /// built.
    pub account_id: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            roketo_contract_name: DEFAULT_ROKETO_CONTRACT.to_string(),
            finance_contract_name: DEFAULT_FINANCE_CONTRACT.to_string(),
            wnear_id: DEFAULT_WNEAR_ID.to_string(),
            account_id: None,
        }
    }
}

impl ClientConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&source)
    }

    /// Full resolution: defaults, then `path` if given, then the process
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        base.with_env(|key| std::env::var(key).ok())
    }

    /// Apply `ROKETO_*` overrides using `lookup` to read variables.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for (var, key) in ENV_OVERRIDES {
            let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) else {
                continue;
            };
            match key {
                "rpc_url" => self.rpc_url = value,
                "roketo_contract_name" => self.roketo_contract_name = value,
                "finance_contract_name" => self.finance_contract_name = value,
                "wnear_id" => self.wnear_id = value,
                "account_id" => self.account_id = Some(value),
                _ => {}
            }
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.rpc_url.starts_with("http://") || self.rpc_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "rpc_url".to_string(),
                message: format!("'{}' is not an http(s) URL", self.rpc_url),
            });
        }
        for (key, value) in [
            ("roketo_contract_name", &self.roketo_contract_name),
            ("finance_contract_name", &self.finance_contract_name),
            ("wnear_id", &self.wnear_id),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    key: key.to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}
