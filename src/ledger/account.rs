//! Signer account state: account number and sequence.
//!
//! The transaction worker is the only writer. It increments the sequence after
//! each committed transaction and re-fetches it from the ledger on conflicts.

use serde::{Deserialize, Serialize};

use crate::ledger::transport::Transport;
use crate::ledger::types::{u64_from_str_or_num, ClientResult};

/// Path of the account lookup endpoint.
pub const ACCOUNT_PATH: &str = "/auth/accounts";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccountState {
    #[serde(default)]
    pub address: String,
    #[serde(default, deserialize_with = "u64_from_str_or_num")]
    pub account_number: u64,
    #[serde(default, deserialize_with = "u64_from_str_or_num")]
    pub sequence: u64,
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    result: AccountResult,
}

#[derive(Debug, Deserialize)]
struct AccountResult {
    value: AccountState,
}

/// Fetch the authoritative account state from the ledger.
pub async fn fetch_account(transport: &dyn Transport, address: &str) -> ClientResult<AccountState> {
    let body = transport.get(&format!("{}/{}", ACCOUNT_PATH, address)).await?;
    let res: AccountResponse = serde_json::from_slice(&body)?;
    let mut account = res.result.value;
    if account.address.is_empty() {
        // Unfunded accounts come back with an empty value.
        account.address = address.to_string();
    }

    tracing::debug!(
        address = %account.address,
        account_number = account.account_number,
        sequence = account.sequence,
        "Account state fetched"
    );
    Ok(account)
}
