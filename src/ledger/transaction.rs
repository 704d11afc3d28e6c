//! Transaction records and remote validation.
//!
//! # Responsibilities
//! - Describe one pending write (operation, key material, lease, gas policy)
//! - POST it to the operation endpoint so the ledger computes the message
//!   shape and fee/gas defaults server-side
//! - Decode the returned broadcast template

use reqwest::Method;

use crate::ledger::account::AccountState;
use crate::ledger::transport::Transport;
use crate::ledger::types::{
    BroadcastPayload, ClientResult, GasInfo, KeyValue, ValidateBaseReq, ValidateRequest,
    ValidateResponse,
};

/// Write operations understood by the ledger's CRUD module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxOperation {
    Create,
    Update,
    Delete,
    Rename,
    DeleteAll,
    MultiUpdate,
    RenewLease,
    RenewLeaseAll,
    Read,
    Has,
    Keys,
    KeyValues,
    Count,
    GetLease,
    GetNShortestLeases,
}

impl TxOperation {
    pub fn endpoint(&self) -> &'static str {
        match self {
            TxOperation::Create => "/crud/create",
            TxOperation::Update => "/crud/update",
            TxOperation::Delete => "/crud/delete",
            TxOperation::Rename => "/crud/rename",
            TxOperation::DeleteAll => "/crud/deleteall",
            TxOperation::MultiUpdate => "/crud/multiupdate",
            TxOperation::RenewLease => "/crud/renewlease",
            TxOperation::RenewLeaseAll => "/crud/renewleaseall",
            TxOperation::Read => "/crud/read",
            TxOperation::Has => "/crud/has",
            TxOperation::Keys => "/crud/keys",
            TxOperation::KeyValues => "/crud/keyvalues",
            TxOperation::Count => "/crud/count",
            TxOperation::GetLease => "/crud/getlease",
            TxOperation::GetNShortestLeases => "/crud/getnshortestleases",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            TxOperation::Delete => Method::DELETE,
            _ => Method::POST,
        }
    }
}

/// One pending write. Owned by the worker once submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub operation: TxOperation,
    pub key: String,
    pub new_key: String,
    pub key_values: Vec<KeyValue>,
    /// Lease in blocks.
    pub lease: i64,
    pub n: u64,
    pub value: String,
    pub gas: Option<GasInfo>,
}

impl TransactionRecord {
    pub fn new(operation: TxOperation) -> Self {
        Self {
            operation,
            key: String::new(),
            new_key: String::new(),
            key_values: Vec::new(),
            lease: 0,
            n: 0,
            value: String::new(),
            gas: None,
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn new_key(mut self, new_key: impl Into<String>) -> Self {
        self.new_key = new_key.into();
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn key_values(mut self, key_values: Vec<KeyValue>) -> Self {
        self.key_values = key_values;
        self
    }

    pub fn lease_blocks(mut self, blocks: i64) -> Self {
        self.lease = blocks;
        self
    }

    pub fn n(mut self, n: u64) -> Self {
        self.n = n;
        self
    }

    pub fn gas(mut self, gas: GasInfo) -> Self {
        self.gas = Some(gas);
        self
    }

    pub fn endpoint(&self) -> &'static str {
        self.operation.endpoint()
    }

    pub fn method(&self) -> Method {
        self.operation.method()
    }
}

/// Ask the ledger for the broadcast template of a record.
pub async fn validate(
    transport: &dyn Transport,
    record: &TransactionRecord,
    account: &AccountState,
    chain_id: &str,
    uuid: &str,
) -> ClientResult<BroadcastPayload> {
    let req = ValidateRequest {
        base_req: ValidateBaseReq {
            from: &account.address,
            chain_id,
        },
        key: &record.key,
        key_values: &record.key_values,
        lease: record.lease.to_string(),
        n: record.n.to_string(),
        new_key: &record.new_key,
        owner: &account.address,
        uuid,
        value: &record.value,
    };
    let body = serde_json::to_vec(&req)?;

    let res = transport
        .mutate(record.method(), record.endpoint(), body)
        .await?;
    let res: ValidateResponse = serde_json::from_slice(&res)?;

    tracing::debug!(
        endpoint = record.endpoint(),
        payload_type = %res.payload_type,
        gas = %res.value.fee.gas,
        "txn template received"
    );
    Ok(res.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::testing::ScriptedTransport;
    use crate::ledger::types::ClientError;

    const TEMPLATE: &str = r#"{"type":"cosmos-sdk/StdTx","value":{"fee":{"amount":[],"gas":"200000"},"memo":"","msg":[{"type":"crud/create","value":{"Key":"k","Lease":"0","Owner":"bluzelle1abc","UUID":"db","Value":"v"}}],"signatures":null}}"#;

    fn account() -> AccountState {
        AccountState {
            address: "bluzelle1abc".into(),
            account_number: 1,
            sequence: 0,
        }
    }

    #[test]
    fn test_operation_routes() {
        assert_eq!(TxOperation::Create.endpoint(), "/crud/create");
        assert_eq!(TxOperation::Delete.method(), Method::DELETE);
        assert_eq!(TxOperation::GetLease.method(), Method::POST);
    }

    #[tokio::test]
    async fn test_validate_posts_request_and_decodes_template() {
        let transport = ScriptedTransport::new();
        transport.on(Method::POST, "/crud/create", TEMPLATE);

        let record = TransactionRecord::new(TxOperation::Create)
            .key("k")
            .value("v")
            .gas(GasInfo::with_gas_price(10));
        let payload = validate(&transport, &record, &account(), "bluzelle", "db")
            .await
            .unwrap();

        assert_eq!(payload.fee.gas, "200000");
        assert_eq!(payload.msg[0].msg_type, "crud/create");

        let calls = transport.calls_to(Method::POST, "/crud/create");
        assert_eq!(calls.len(), 1);
        let sent: serde_json::Value = serde_json::from_slice(&calls[0].1).unwrap();
        assert_eq!(sent["BaseReq"]["from"], "bluzelle1abc");
        assert_eq!(sent["BaseReq"]["chain_id"], "bluzelle");
        assert_eq!(sent["Owner"], "bluzelle1abc");
        assert_eq!(sent["UUID"], "db");
        assert_eq!(sent["Value"], "v");
        assert!(sent.get("NewKey").is_none());
    }

    #[tokio::test]
    async fn test_validate_uses_delete_method() {
        let transport = ScriptedTransport::new();
        transport.on(Method::DELETE, "/crud/delete", TEMPLATE);

        let record = TransactionRecord::new(TxOperation::Delete).key("k");
        validate(&transport, &record, &account(), "bluzelle", "db")
            .await
            .unwrap();
        assert_eq!(transport.calls_to(Method::DELETE, "/crud/delete").len(), 1);
    }

    #[tokio::test]
    async fn test_validate_remote_error() {
        let transport = ScriptedTransport::new();
        transport.on(Method::POST, "/crud/create", r#"{"error":"key already exists"}"#);

        let record = TransactionRecord::new(TxOperation::Create).key("k");
        let err = validate(&transport, &record, &account(), "bluzelle", "db")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Remote(ref m) if m == "key already exists"));
    }

    #[tokio::test]
    async fn test_validate_malformed_template() {
        let transport = ScriptedTransport::new();
        transport.on(Method::POST, "/crud/create", r#"{"type":"x","value":"nope"}"#);

        let record = TransactionRecord::new(TxOperation::Create).key("k");
        let err = validate(&transport, &record, &account(), "bluzelle", "db")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
