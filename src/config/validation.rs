//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (retries > 0, block time > 0)
//! - Check the endpoint is a usable URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>

use crate::config::schema::ClientConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut fail = |field: &'static str, message: &str| {
        errors.push(ValidationError {
            field,
            message: message.to_string(),
        })
    };

    if config.endpoint.is_empty() {
        fail("endpoint", "must not be empty");
    } else if let Err(e) = config.endpoint.parse::<url::Url>() {
        fail("endpoint", &format!("invalid URL: {}", e));
    }
    if config.chain_id.is_empty() {
        fail("chain_id", "must not be empty");
    }
    if config.uuid.is_empty() {
        fail("uuid", "must not be empty");
    }
    if config.address.is_empty() {
        fail("address", "must not be empty");
    }
    if config.request_timeout_secs == 0 {
        fail("request_timeout_secs", "must be greater than 0");
    }
    if config.broadcast.max_retries == 0 {
        fail("broadcast.max_retries", "must be greater than 0");
    }
    if config.broadcast.mode.is_empty() {
        fail("broadcast.mode", "must not be empty");
    }
    if config.fee.block_time_secs == 0 {
        fail("fee.block_time_secs", "must be greater than 0");
    }
    if config.fee.denom.is_empty() {
        fail("fee.denom", "must not be empty");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
