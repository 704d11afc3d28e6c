//! Metrics collection.
//!
//! # Metrics
//! - `blz_tx_submitted_total` (counter): records handed to the worker, by operation
//! - `blz_tx_completed_total` (counter): terminal outcomes, by result
//! - `blz_broadcast_attempts_total` (counter): every POST to the broadcast endpoint
//! - `blz_broadcast_conflicts_total` (counter): sequence conflicts that triggered a resync
//! - `blz_account_sequence` (gauge): last known signer sequence
//!
//! The library only records through the `metrics` facade; installing an
//! exporter is left to the embedding application.

use metrics::{counter, gauge};

pub fn record_submission(operation: &str) {
    counter!("blz_tx_submitted_total", "operation" => operation.to_string()).increment(1);
}

pub fn record_completion(result: &'static str) {
    counter!("blz_tx_completed_total", "result" => result).increment(1);
}

pub fn record_broadcast_attempt() {
    counter!("blz_broadcast_attempts_total").increment(1);
}

pub fn record_conflict() {
    counter!("blz_broadcast_conflicts_total").increment(1);
}

pub fn record_sequence(sequence: u64) {
    gauge!("blz_account_sequence").set(sequence as f64);
}
