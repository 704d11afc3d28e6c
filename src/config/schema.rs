//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::ledger::types::GasInfo;

/// Root configuration for the ledger client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// REST endpoint of the ledger (e.g., "http://localhost:1317").
    pub endpoint: String,

    /// Chain ID included in every signed document.
    pub chain_id: String,

    /// Database namespace the CRUD operations act on.
    pub uuid: String,

    /// Signer account address.
    pub address: String,

    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Broadcast and retry settings.
    pub broadcast: BroadcastConfig,

    /// Fee denomination and block timing.
    pub fee: FeeConfig,

    /// Default gas policy for callers that don't supply their own.
    pub gas: GasInfo,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:1317".to_string(),
            chain_id: "bluzelle".to_string(),
            uuid: String::new(),
            address: String::new(),
            request_timeout_secs: 30,
            broadcast: BroadcastConfig::default(),
            fee: FeeConfig::default(),
            gas: GasInfo::with_gas_price(10),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Broadcast configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BroadcastConfig {
    /// Maximum number of broadcast attempts on sequence conflicts.
    pub max_retries: u32,

    /// Fixed delay before resyncing and retrying, in milliseconds.
    pub retry_interval_ms: u64,

    /// Broadcast mode ("block" waits for inclusion).
    pub mode: String,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            max_retries: 10,
            retry_interval_ms: 1000,
            mode: "block".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeeConfig {
    /// Fee token denomination.
    pub denom: String,

    /// Ledger block time used for lease conversion.
    pub block_time_secs: u64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            denom: "ubnt".to_string(),
            block_time_secs: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.broadcast.max_retries, 10);
        assert_eq!(config.broadcast.retry_interval_ms, 1000);
        assert_eq!(config.broadcast.mode, "block");
        assert_eq!(config.fee.block_time_secs, 5);
        assert_eq!(config.fee.denom, "ubnt");
    }

    #[test]
    fn test_partial_toml() {
        let config: ClientConfig = toml::from_str(
            r#"
            endpoint = "http://ledger:1317"
            uuid = "mydb"

            [broadcast]
            max_retries = 3

            [gas]
            max_fee = 4000001
            "#,
        )
        .unwrap();
        assert_eq!(config.endpoint, "http://ledger:1317");
        assert_eq!(config.broadcast.max_retries, 3);
        assert_eq!(config.broadcast.retry_interval_ms, 1000);
        assert_eq!(config.gas.max_fee, 4000001);
        assert_eq!(config.gas.gas_price, 0);
    }
}
