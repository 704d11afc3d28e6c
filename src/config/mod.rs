//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, BLZ_* env overrides)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → shared via Arc with the client and its worker
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - The private key never lives in the config file (see `ledger::wallet`)
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{BroadcastConfig, ClientConfig, FeeConfig, ObservabilityConfig};
