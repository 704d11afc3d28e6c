//! Key/value API on top of the transaction pipeline.
//!
//! Writes and `tx_*` reads build a `TransactionRecord` and go through the
//! worker, so they are ordered with every other write and cost gas. Plain
//! reads are unsigned GETs and never touch the worker.

pub mod types;

use serde::de::DeserializeOwned;

use crate::crud::types::{
    CountResult, HasResult, KeyLeasesResult, KeyValuesResult, KeysResult, LeaseResult,
    QueryResponse, ValueResult,
};
use crate::ledger::client::Client;
use crate::ledger::transaction::{TransactionRecord, TxOperation};
use crate::ledger::types::{ClientError, ClientResult, GasInfo, KeyLease, KeyValue, LeaseInfo};

fn validate_key(key: &str) -> ClientResult<()> {
    if key.is_empty() {
        return Err(ClientError::InvalidArgument("key must not be empty".to_string()));
    }
    if key.contains('/') {
        return Err(ClientError::InvalidArgument(
            "key cannot contain a slash".to_string(),
        ));
    }
    Ok(())
}

fn decode_tx_result<T: DeserializeOwned>(body: &[u8]) -> ClientResult<T> {
    if body.is_empty() {
        return Err(ClientError::Decode("empty transaction result".to_string()));
    }
    Ok(serde_json::from_slice(body)?)
}

impl Client {
    fn lease_blocks(&self, lease: Option<LeaseInfo>) -> i64 {
        lease
            .map(|l| l.to_blocks(self.config().fee.block_time_secs))
            .unwrap_or(0)
    }

    fn blocks_to_seconds(&self, blocks: u64) -> u64 {
        blocks.saturating_mul(self.config().fee.block_time_secs)
    }

    fn record(&self, operation: TxOperation, gas: GasInfo) -> TransactionRecord {
        TransactionRecord::new(operation).gas(gas)
    }

    async fn submit_for<T: DeserializeOwned>(
        &self,
        record: TransactionRecord,
    ) -> ClientResult<T> {
        let body = self.submit(record).await?;
        decode_tx_result(&body)
    }

    async fn query_result<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let res: QueryResponse<T> = self.query(path).await?;
        Ok(res.result)
    }

    // Transactions

    pub async fn create(
        &self,
        key: &str,
        value: &str,
        lease: Option<LeaseInfo>,
        gas: GasInfo,
    ) -> ClientResult<()> {
        validate_key(key)?;
        let record = self
            .record(TxOperation::Create, gas)
            .key(key)
            .value(value)
            .lease_blocks(self.lease_blocks(lease));
        self.submit(record).await.map(|_| ())
    }

    pub async fn update(
        &self,
        key: &str,
        value: &str,
        lease: Option<LeaseInfo>,
        gas: GasInfo,
    ) -> ClientResult<()> {
        validate_key(key)?;
        let record = self
            .record(TxOperation::Update, gas)
            .key(key)
            .value(value)
            .lease_blocks(self.lease_blocks(lease));
        self.submit(record).await.map(|_| ())
    }

    pub async fn delete(&self, key: &str, gas: GasInfo) -> ClientResult<()> {
        validate_key(key)?;
        let record = self.record(TxOperation::Delete, gas).key(key);
        self.submit(record).await.map(|_| ())
    }

    pub async fn rename(&self, key: &str, new_key: &str, gas: GasInfo) -> ClientResult<()> {
        validate_key(key)?;
        validate_key(new_key)?;
        let record = self.record(TxOperation::Rename, gas).key(key).new_key(new_key);
        self.submit(record).await.map(|_| ())
    }

    pub async fn delete_all(&self, gas: GasInfo) -> ClientResult<()> {
        let record = self.record(TxOperation::DeleteAll, gas);
        self.submit(record).await.map(|_| ())
    }

    pub async fn multi_update(&self, key_values: Vec<KeyValue>, gas: GasInfo) -> ClientResult<()> {
        for kv in &key_values {
            validate_key(&kv.key)?;
        }
        let record = self.record(TxOperation::MultiUpdate, gas).key_values(key_values);
        self.submit(record).await.map(|_| ())
    }

    pub async fn renew_lease(
        &self,
        key: &str,
        lease: Option<LeaseInfo>,
        gas: GasInfo,
    ) -> ClientResult<()> {
        validate_key(key)?;
        let record = self
            .record(TxOperation::RenewLease, gas)
            .key(key)
            .lease_blocks(self.lease_blocks(lease));
        self.submit(record).await.map(|_| ())
    }

    pub async fn renew_lease_all(
        &self,
        lease: Option<LeaseInfo>,
        gas: GasInfo,
    ) -> ClientResult<()> {
        let record = self
            .record(TxOperation::RenewLeaseAll, gas)
            .lease_blocks(self.lease_blocks(lease));
        self.submit(record).await.map(|_| ())
    }

    pub async fn tx_read(&self, key: &str, gas: GasInfo) -> ClientResult<String> {
        validate_key(key)?;
        let res: ValueResult = self
            .submit_for(self.record(TxOperation::Read, gas).key(key))
            .await?;
        Ok(res.value)
    }

    pub async fn tx_has(&self, key: &str, gas: GasInfo) -> ClientResult<bool> {
        validate_key(key)?;
        let res: HasResult = self
            .submit_for(self.record(TxOperation::Has, gas).key(key))
            .await?;
        Ok(res.has)
    }

    pub async fn tx_keys(&self, gas: GasInfo) -> ClientResult<Vec<String>> {
        let res: KeysResult = self.submit_for(self.record(TxOperation::Keys, gas)).await?;
        Ok(res.keys)
    }

    pub async fn tx_key_values(&self, gas: GasInfo) -> ClientResult<Vec<KeyValue>> {
        let res: KeyValuesResult = self
            .submit_for(self.record(TxOperation::KeyValues, gas))
            .await?;
        Ok(res.keyvalues)
    }

    pub async fn tx_count(&self, gas: GasInfo) -> ClientResult<u64> {
        let res: CountResult = self.submit_for(self.record(TxOperation::Count, gas)).await?;
        Ok(res.count)
    }

    /// Remaining lease of `key`, in seconds.
    pub async fn tx_get_lease(&self, key: &str, gas: GasInfo) -> ClientResult<u64> {
        validate_key(key)?;
        let res: LeaseResult = self
            .submit_for(self.record(TxOperation::GetLease, gas).key(key))
            .await?;
        Ok(self.blocks_to_seconds(res.lease))
    }

    /// The `n` keys closest to expiry, leases in seconds.
    pub async fn tx_get_n_shortest_leases(
        &self,
        n: u64,
        gas: GasInfo,
    ) -> ClientResult<Vec<KeyLease>> {
        let res: KeyLeasesResult = self
            .submit_for(self.record(TxOperation::GetNShortestLeases, gas).n(n))
            .await?;
        Ok(self.leases_to_seconds(res.keyleases))
    }

    // Queries

    pub async fn read(&self, key: &str) -> ClientResult<String> {
        validate_key(key)?;
        let res: ValueResult = self
            .query_result(&format!("/crud/read/{}/{}", self.config().uuid, key))
            .await?;
        Ok(res.value)
    }

    pub async fn has(&self, key: &str) -> ClientResult<bool> {
        validate_key(key)?;
        let res: HasResult = self
            .query_result(&format!("/crud/has/{}/{}", self.config().uuid, key))
            .await?;
        Ok(res.has)
    }

    pub async fn keys(&self) -> ClientResult<Vec<String>> {
        let res: KeysResult = self
            .query_result(&format!("/crud/keys/{}", self.config().uuid))
            .await?;
        Ok(res.keys)
    }

    pub async fn key_values(&self) -> ClientResult<Vec<KeyValue>> {
        let res: KeyValuesResult = self
            .query_result(&format!("/crud/keyvalues/{}", self.config().uuid))
            .await?;
        Ok(res.keyvalues)
    }

    pub async fn count(&self) -> ClientResult<u64> {
        let res: CountResult = self
            .query_result(&format!("/crud/count/{}", self.config().uuid))
            .await?;
        Ok(res.count)
    }

    /// Remaining lease of `key`, in seconds.
    pub async fn get_lease(&self, key: &str) -> ClientResult<u64> {
        validate_key(key)?;
        let res: LeaseResult = self
            .query_result(&format!("/crud/getlease/{}/{}", self.config().uuid, key))
            .await?;
        Ok(self.blocks_to_seconds(res.lease))
    }

    pub async fn get_n_shortest_leases(&self, n: u64) -> ClientResult<Vec<KeyLease>> {
        let res: KeyLeasesResult = self
            .query_result(&format!("/crud/getnshortestleases/{}/{}", self.config().uuid, n))
            .await?;
        Ok(self.leases_to_seconds(res.keyleases))
    }

    fn leases_to_seconds(&self, leases: Vec<KeyLease>) -> Vec<KeyLease> {
        leases
            .into_iter()
            .map(|kl| KeyLease {
                lease: self.blocks_to_seconds(kl.lease),
                key: kl.key,
            })
            .collect()
    }
}
