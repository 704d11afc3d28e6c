//! Single-flight transaction queue.
//!
//! # Responsibilities
//! - Accept submissions from any number of callers
//! - Process exactly one record at a time on a dedicated task
//! - Deliver exactly one terminal outcome per record
//!
//! # Design Decisions
//! - The worker owns `AccountState`; nothing else writes it, so no locks
//! - Snapshots of the account are published over a watch channel
//! - No cancellation: a dequeued record always runs to a terminal state

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::Instrument;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::ledger::account::AccountState;
use crate::ledger::broadcast::Broadcaster;
use crate::ledger::transaction::{validate, TransactionRecord};
use crate::ledger::transport::Transport;
use crate::ledger::types::{ClientError, ClientResult};
use crate::ledger::wallet::Wallet;
use crate::observability::metrics;

struct Job {
    id: Uuid,
    record: TransactionRecord,
    done: oneshot::Sender<ClientResult<Vec<u8>>>,
}

/// Handle for submitting records to the worker. Cheap to clone.
#[derive(Clone)]
pub struct TxQueue {
    sender: mpsc::UnboundedSender<Job>,
}

impl TxQueue {
    /// Spawn the worker on the current runtime and return its queue.
    pub fn spawn(worker: TxWorker) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(worker.run(receiver));
        Self { sender }
    }

    /// Submit a record and wait for the worker to finish it.
    pub async fn submit(&self, record: TransactionRecord) -> ClientResult<Vec<u8>> {
        let id = Uuid::new_v4();
        let (done, completion) = oneshot::channel();

        metrics::record_submission(record.endpoint());
        self.sender
            .send(Job { id, record, done })
            .map_err(|_| ClientError::Internal("transaction worker stopped".to_string()))?;

        let result = match completion.await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(tx_id = %id, "txn did not complete");
                Err(ClientError::Internal(
                    "transaction completion signal dropped".to_string(),
                ))
            }
        };

        if let Err(e) = &result {
            tracing::error!(tx_id = %id, error = %e, "transaction failed");
        }
        result
    }
}

/// State owned by the worker task.
pub struct TxWorker {
    transport: Arc<dyn Transport>,
    wallet: Wallet,
    config: Arc<ClientConfig>,
    account: AccountState,
    snapshots: watch::Sender<AccountState>,
}

impl TxWorker {
    pub fn new(
        transport: Arc<dyn Transport>,
        wallet: Wallet,
        config: Arc<ClientConfig>,
        account: AccountState,
    ) -> (Self, watch::Receiver<AccountState>) {
        let (snapshots, receiver) = watch::channel(account.clone());
        let worker = Self {
            transport,
            wallet,
            config,
            account,
            snapshots,
        };
        (worker, receiver)
    }

    async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<Job>) {
        tracing::debug!("Transaction worker started");

        while let Some(job) = receiver.recv().await {
            let span =
                tracing::info_span!("txn", tx_id = %job.id, endpoint = job.record.endpoint());
            let result = self.process(&job.record).instrument(span).await;

            metrics::record_completion(if result.is_ok() { "ok" } else { "error" });
            metrics::record_sequence(self.account.sequence);
            self.snapshots.send_replace(self.account.clone());

            if job.done.send(result).is_err() {
                tracing::warn!(tx_id = %job.id, "Submitter went away before completion");
            }
        }

        tracing::debug!("Transaction worker stopped");
    }

    async fn process(&mut self, record: &TransactionRecord) -> ClientResult<Vec<u8>> {
        // Fee cannot be determined without a policy; fail before any network call.
        let gas = record
            .gas
            .ok_or_else(|| ClientError::Config("gas_info is required".to_string()))?;

        let template = validate(
            self.transport.as_ref(),
            record,
            &self.account,
            &self.config.chain_id,
            &self.config.uuid,
        )
        .await?;

        let broadcaster = Broadcaster {
            transport: self.transport.as_ref(),
            wallet: &self.wallet,
            chain_id: &self.config.chain_id,
            denom: &self.config.fee.denom,
            mode: &self.config.broadcast.mode,
            max_attempts: self.config.broadcast.max_retries,
            retry_interval: Duration::from_millis(self.config.broadcast.retry_interval_ms),
        };
        let result = broadcaster
            .broadcast(&template, Some(&gas), &mut self.account)
            .await?;

        tracing::info!(
            sequence = self.account.sequence,
            result_len = result.len(),
            "txn committed"
        );
        Ok(result)
    }
}
