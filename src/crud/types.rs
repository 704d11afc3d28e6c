//! Response shapes of the CRUD endpoints.
//!
//! Queries wrap their payload in `{"height": .., "result": ..}`; transaction
//! results carry the bare payload as hex in the broadcast response.

use serde::Deserialize;

use crate::ledger::types::{null_as_default, u64_from_str_or_num, KeyLease, KeyValue};

#[derive(Debug, Deserialize)]
pub struct QueryResponse<T> {
    pub result: T,
}

#[derive(Debug, Default, Deserialize)]
pub struct ValueResult {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct HasResult {
    #[serde(default)]
    pub has: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct KeysResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub keys: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct KeyValuesResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub keyvalues: Vec<KeyValue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CountResult {
    #[serde(default, deserialize_with = "u64_from_str_or_num")]
    pub count: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct LeaseResult {
    #[serde(default, deserialize_with = "u64_from_str_or_num")]
    pub lease: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct KeyLeasesResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub keyleases: Vec<KeyLease>,
}
