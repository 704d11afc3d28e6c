//! Ledger wire types and error definitions.
//!
//! JSON struct fields are declared in alphabetical order. The ledger re-derives
//! sign bytes from sorted JSON, so declaration order is part of the contract.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Errors that can occur while talking to the ledger.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or HTTP failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// Response body was not the JSON we expected.
    #[error("decode error: {0}")]
    Decode(String),

    /// The ledger reported an error. The message is passed through verbatim.
    #[error("{0}")]
    Remote(String),

    /// Missing or invalid client-side configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Caller passed an argument the ledger would reject.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Private key unusable or signing failed.
    #[error("signing error: {0}")]
    Signing(String),

    /// Sequence conflicts persisted through every broadcast attempt.
    #[error("transaction failed after {attempts} broadcast attempts")]
    RetryExhausted { attempts: u32 },

    /// The transaction worker stopped or dropped a completion signal.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

impl From<hex::FromHexError> for ClientError {
    fn from(e: hex::FromHexError) -> Self {
        ClientError::Decode(format!("invalid hex payload: {}", e))
    }
}

/// Result type for ledger operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Caller-supplied gas policy. Zero means unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GasInfo {
    pub max_gas: u64,
    pub max_fee: u64,
    pub gas_price: u64,
}

impl GasInfo {
    pub fn with_gas_price(gas_price: u64) -> Self {
        Self {
            gas_price,
            ..Self::default()
        }
    }
}

/// Human lease duration, converted to a block count before it goes on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LeaseInfo {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl LeaseInfo {
    pub fn days(days: i64) -> Self {
        Self {
            days,
            ..Self::default()
        }
    }

    /// Saturates at the `i64` bounds instead of overflowing.
    pub fn total_seconds(&self) -> i64 {
        self.days
            .saturating_mul(24 * 60 * 60)
            .saturating_add(self.hours.saturating_mul(60 * 60))
            .saturating_add(self.minutes.saturating_mul(60))
            .saturating_add(self.seconds)
    }

    /// Truncating conversion to ledger blocks.
    pub fn to_blocks(&self, block_time_secs: u64) -> i64 {
        let block_time = i64::try_from(block_time_secs.max(1)).unwrap_or(i64::MAX);
        self.total_seconds() / block_time
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct KeyValue {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct KeyLease {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(default, deserialize_with = "u64_from_str_or_num")]
    pub lease: u64,
}

/// Error envelope embedded by the ledger REST layer in otherwise 200 responses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<String>,
}

// Fee

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeeAmount {
    pub amount: String,
    pub denom: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Fee {
    #[serde(default)]
    pub amount: Vec<FeeAmount>,
    pub gas: String,
}

// Signatures

/// Amino-style public key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PubKey {
    #[serde(rename = "type")]
    pub key_type: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TxSignature {
    pub account_number: String,
    pub pub_key: PubKey,
    pub sequence: String,
    pub signature: String,
}

// Messages & payloads

/// A ledger message as shaped by the validate endpoint. The value stays untyped
/// so server-side fields survive the round trip; its maps serialize sorted.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TxMsg {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub value: serde_json::Value,
}

/// The transaction envelope: template from validate, completed before broadcast.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BroadcastPayload {
    pub fee: Fee,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub msg: Vec<TxMsg>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub signatures: Vec<TxSignature>,
}

/// Canonical sign document. Field order is fixed.
#[derive(Debug, Serialize)]
pub struct SignPayload<'a> {
    pub account_number: String,
    pub chain_id: &'a str,
    pub fee: &'a Fee,
    pub memo: &'a str,
    pub msgs: &'a [TxMsg],
    pub sequence: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateBaseReq<'a> {
    pub from: &'a str,
    pub chain_id: &'a str,
}

/// Body POSTed to an operation endpoint to obtain a broadcast template.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ValidateRequest<'a> {
    pub base_req: ValidateBaseReq<'a>,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub key: &'a str,
    #[serde(skip_serializing_if = "<[KeyValue]>::is_empty")]
    pub key_values: &'a [KeyValue],
    pub lease: String,
    #[serde(rename = "N")]
    pub n: String,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub new_key: &'a str,
    pub owner: &'a str,
    #[serde(rename = "UUID")]
    pub uuid: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub value: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ValidateResponse {
    #[serde(rename = "type", default)]
    pub payload_type: String,
    pub value: BroadcastPayload,
}

#[derive(Debug, Serialize)]
pub struct BroadcastRequest<'a> {
    pub tx: &'a BroadcastPayload,
    pub mode: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BroadcastResponse {
    pub height: String,
    pub txhash: String,
    pub data: String,
    pub codespace: String,
    pub code: i64,
    pub raw_log: String,
    pub gas_wanted: String,
}

/// Accepts `"42"` or `42`; the ledger REST layer encodes integers as strings.
pub(crate) fn u64_from_str_or_num<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u64),
        Str(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Str(s) if s.is_empty() => Ok(0),
        Raw::Str(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
