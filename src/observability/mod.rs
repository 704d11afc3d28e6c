//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Client & worker produce:
//!     → logging.rs (structured log events, submission id on every span)
//!     → metrics.rs (counters and gauges through the metrics facade)
//! ```

pub mod logging;
pub mod metrics;
