//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ClientConfig;
use crate::config::validation::{validate_config, ValidationError};

pub const ENDPOINT_ENV_VAR: &str = "BLZ_ENDPOINT";
pub const CHAIN_ID_ENV_VAR: &str = "BLZ_CHAIN_ID";
pub const UUID_ENV_VAR: &str = "BLZ_UUID";
pub const ADDRESS_ENV_VAR: &str = "BLZ_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration: TOML file if given, then environment overrides, then
/// validation.
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    load_config_with(path, |name| std::env::var(name).ok())
}

/// [`load_config`] with an explicit environment lookup.
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<ClientConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => ClientConfig::default(),
    };

    apply_env_overrides(&mut config, lookup);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay `BLZ_*` variables on top of the loaded file.
pub fn apply_env_overrides<F>(config: &mut ClientConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let overrides: [(&str, &mut String); 4] = [
        (ENDPOINT_ENV_VAR, &mut config.endpoint),
        (CHAIN_ID_ENV_VAR, &mut config.chain_id),
        (UUID_ENV_VAR, &mut config.uuid),
        (ADDRESS_ENV_VAR, &mut config.address),
    ];
    for (name, field) in overrides {
        if let Some(value) = lookup(name).filter(|v| !v.is_empty()) {
            *field = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            endpoint = "http://ledger:1317"
            chain_id = "bluzelle"
            uuid = "db"
            address = "bluzelle1abc"

            [broadcast]
            retry_interval_ms = 250
            "#
        )
        .unwrap();

        let config = load_config_with(Some(file.path()), |_| None).unwrap();
        assert_eq!(config.uuid, "db");
        assert_eq!(config.broadcast.retry_interval_ms, 250);
    }

    #[test]
    fn test_invalid_file_is_validation_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "endpoint = \"http://ledger:1317\"").unwrap();

        match load_config_with(Some(file.path()), |_| None) {
            Err(ConfigError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.field == "uuid"));
                assert!(errors.iter().any(|e| e.field == "address"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        let config = load_config_with(Some(file.path()), |name| match name {
            UUID_ENV_VAR => Some("db".to_string()),
            ADDRESS_ENV_VAR => Some("bluzelle1abc".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.endpoint, "http://ledger:1317");
    }

    #[test]
    fn test_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "endpoint = ").unwrap();
        assert!(matches!(
            load_config_with(Some(file.path()), |_| None),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ClientConfig::default();
        apply_env_overrides(&mut config, |name| match name {
            UUID_ENV_VAR => Some("envdb".to_string()),
            ADDRESS_ENV_VAR => Some("bluzelle1env".to_string()),
            ENDPOINT_ENV_VAR => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.uuid, "envdb");
        assert_eq!(config.address, "bluzelle1env");
        assert_eq!(config.endpoint, "http://localhost:1317");
    }
}
