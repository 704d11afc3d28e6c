//! Ledger transaction pipeline.
//!
//! # Data Flow
//! ```text
//! caller → Client::submit
//!     → worker.rs (single-flight queue, owns AccountState)
//!     → transaction.rs (validate: server-side fee/gas template)
//!     → fee.rs (apply the caller's gas policy)
//!     → wallet.rs (canonical sign bytes, SHA-256, secp256k1)
//!     → broadcast.rs (POST /txs; on sequence conflict resync via account.rs and retry)
//!     → result bytes → caller
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables or explicit input
//! - Never log private keys
//! - All HTTP calls are bounded by the transport timeout

pub mod account;
pub mod broadcast;
pub mod client;
pub mod fee;
pub mod transaction;
pub mod transport;
pub mod types;
pub mod wallet;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use account::AccountState;
pub use client::Client;
pub use transaction::{TransactionRecord, TxOperation};
pub use transport::{HttpTransport, Transport};
pub use types::{ClientError, ClientResult, GasInfo, KeyValue, LeaseInfo};
pub use wallet::Wallet;
