//! Broadcast with sequence-conflict retry.
//!
//! # State Machine
//! ```text
//! Prepare (fresh memo, fee, pub key)
//!     → Sign (current account number + sequence)
//!     → Send (POST /txs, mode "block")
//!     → Success:  sequence += 1, decode result
//!     → Conflict: attempts += 1; at max → RetryExhausted;
//!                 else sleep, resync account from the ledger, back to Prepare
//!     → Fatal:    RemoteError with the ledger's raw log
//! ```
//!
//! This is the only retry loop in the client. Resyncing before every retry is
//! what lets it recover from sequence drift caused by other writers.

use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::Method;
use std::time::Duration;

use crate::ledger::account::{fetch_account, AccountState};
use crate::ledger::fee::resolve_fee;
use crate::ledger::transport::Transport;
use crate::ledger::types::{
    BroadcastPayload, BroadcastRequest, BroadcastResponse, ClientError, ClientResult, GasInfo,
    PubKey, TxSignature,
};
use crate::ledger::wallet::{Wallet, PUB_KEY_TYPE};
use crate::observability::metrics;

/// Path of the broadcast endpoint.
pub const TX_PATH: &str = "/txs";

/// Raw-log marker the ledger emits when the signature does not verify,
/// which in practice means our sequence is stale.
pub const SIGNATURE_FAILURE_MARKER: &str = "signature verification failed";

const MEMO_LENGTH: usize = 32;

/// Classified broadcast response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastOutcome {
    /// Committed. Carries the hex-encoded result payload, possibly empty.
    Success(String),
    /// Sequence/signature mismatch; retryable after a resync.
    Conflict(String),
    /// Any other ledger rejection.
    Fatal(String),
}

/// The single place that decides whether a rejection is a sequence conflict.
pub fn is_sequence_conflict(raw_log: &str) -> bool {
    raw_log.contains(SIGNATURE_FAILURE_MARKER)
}

pub fn classify(res: BroadcastResponse) -> BroadcastOutcome {
    if res.code == 0 {
        BroadcastOutcome::Success(res.data)
    } else if is_sequence_conflict(&res.raw_log) {
        BroadcastOutcome::Conflict(res.raw_log)
    } else {
        BroadcastOutcome::Fatal(res.raw_log)
    }
}

/// Random memo, fresh for every attempt so retries never collide on hash.
pub fn random_memo() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(MEMO_LENGTH)
        .map(char::from)
        .collect()
}

/// Drives one broadcast template to a terminal state.
pub struct Broadcaster<'a> {
    pub transport: &'a dyn Transport,
    pub wallet: &'a Wallet,
    pub chain_id: &'a str,
    pub denom: &'a str,
    pub mode: &'a str,
    pub max_attempts: u32,
    pub retry_interval: Duration,
}

impl Broadcaster<'_> {
    /// Broadcast `template`, mutating `account` as the ledger confirms or
    /// corrects it. Returns the decoded result bytes.
    pub async fn broadcast(
        &self,
        template: &BroadcastPayload,
        gas: Option<&GasInfo>,
        account: &mut AccountState,
    ) -> ClientResult<Vec<u8>> {
        let fee = resolve_fee(&template.fee, gas)?.into_fee(self.denom);
        let mut attempts: u32 = 0;

        loop {
            // Prepare
            let mut payload = template.clone();
            payload.memo = random_memo();
            payload.fee = fee.clone();

            // Sign
            let signature = self.wallet.sign_payload(&payload, account, self.chain_id)?;
            payload.signatures = vec![TxSignature {
                account_number: account.account_number.to_string(),
                pub_key: PubKey {
                    key_type: PUB_KEY_TYPE.to_string(),
                    value: self.wallet.public_key_base64().to_string(),
                },
                sequence: account.sequence.to_string(),
                signature,
            }];

            // Send
            let res = self.send(&payload).await?;
            tracing::debug!(
                txhash = %res.txhash,
                height = %res.height,
                code = res.code,
                "txn broadcast response"
            );

            match classify(res) {
                BroadcastOutcome::Success(data) => {
                    account.sequence += 1;
                    if data.is_empty() {
                        return Ok(Vec::new());
                    }
                    return Ok(hex::decode(data)?);
                }
                BroadcastOutcome::Conflict(raw_log) => {
                    attempts += 1;
                    metrics::record_conflict();
                    tracing::warn!(
                        attempt = attempts,
                        sequence = account.sequence,
                        raw_log = %raw_log,
                        "txn failed ... retrying"
                    );
                    if attempts >= self.max_attempts {
                        return Err(ClientError::RetryExhausted { attempts });
                    }
                    tokio::time::sleep(self.retry_interval).await;
                    *account = fetch_account(self.transport, &account.address).await?;
                }
                BroadcastOutcome::Fatal(raw_log) => {
                    return Err(ClientError::Remote(raw_log));
                }
            }
        }
    }

    async fn send(&self, payload: &BroadcastPayload) -> ClientResult<BroadcastResponse> {
        let req = BroadcastRequest {
            tx: payload,
            mode: self.mode,
        };
        let body = serde_json::to_vec(&req)?;

        metrics::record_broadcast_attempt();
        let res = self.transport.mutate(Method::POST, TX_PATH, body).await?;
        Ok(serde_json::from_slice(&res)?)
    }
}
