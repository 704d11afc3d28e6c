//! Client for a key/value ledger exposed over an HTTP/JSON REST interface.
//!
//! Writes are signed transactions driven through a single-flight worker
//! (validate → fee → sign → broadcast, with sequence-conflict retry); reads
//! are plain unsigned queries.

pub mod config;
pub mod crud;
pub mod ledger;
pub mod observability;

pub use config::ClientConfig;
pub use ledger::{
    AccountState, Client, ClientError, ClientResult, GasInfo, KeyValue, LeaseInfo,
    TransactionRecord, TxOperation, Wallet,
};
