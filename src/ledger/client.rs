//! Ledger client facade.
//!
//! # Responsibilities
//! - Load the signer account and start the transaction worker
//! - Route writes through the single-flight queue
//! - Serve read-only queries directly, concurrently with the worker

use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::config::ClientConfig;
use crate::ledger::account::{fetch_account, AccountState};
use crate::ledger::transaction::TransactionRecord;
use crate::ledger::transport::{HttpTransport, Transport};
use crate::ledger::types::ClientResult;
use crate::ledger::wallet::Wallet;
use crate::ledger::worker::{TxQueue, TxWorker};

/// Client for one signer account on one ledger.
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    queue: TxQueue,
    account: watch::Receiver<AccountState>,
}

impl Client {
    /// Connect over HTTP using the configured endpoint.
    ///
    /// Must be called from within a Tokio runtime; the worker is spawned on it.
    pub async fn connect(config: ClientConfig, wallet: Wallet) -> ClientResult<Self> {
        let transport = HttpTransport::new(
            &config.endpoint,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Self::with_transport(config, wallet, Arc::new(transport)).await
    }

    /// Build a client over an arbitrary transport.
    pub async fn with_transport(
        config: ClientConfig,
        wallet: Wallet,
        transport: Arc<dyn Transport>,
    ) -> ClientResult<Self> {
        let config = Arc::new(config);
        let account = fetch_account(transport.as_ref(), &config.address).await?;

        tracing::info!(
            endpoint = %config.endpoint,
            chain_id = %config.chain_id,
            address = %account.address,
            account_number = account.account_number,
            sequence = account.sequence,
            "Ledger client initialized"
        );

        let (worker, account) =
            TxWorker::new(transport.clone(), wallet, config.clone(), account);
        let queue = TxQueue::spawn(worker);

        Ok(Self {
            config,
            transport,
            queue,
            account,
        })
    }

    /// Submit a write and wait for its terminal outcome.
    pub async fn submit(&self, record: TransactionRecord) -> ClientResult<Vec<u8>> {
        self.queue.submit(record).await
    }

    /// Unsigned GET against the ledger. Returns the raw body.
    pub async fn query_raw(&self, path: &str) -> ClientResult<Vec<u8>> {
        self.transport.get(path).await
    }

    /// Unsigned GET decoded into `T`.
    pub async fn query<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let body = self.query_raw(path).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fresh account state straight from the ledger. The worker's copy is
    /// left alone.
    pub async fn fetch_account(&self) -> ClientResult<AccountState> {
        fetch_account(self.transport.as_ref(), &self.config.address).await
    }

    /// Latest account state published by the worker.
    pub fn account(&self) -> AccountState {
        self.account.borrow().clone()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.config.endpoint)
            .field("chain_id", &self.config.chain_id)
            .field("address", &self.config.address)
            .finish()
    }
}
