use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;

use blz_client::config::load_config;
use blz_client::observability::logging;
use blz_client::{Client, GasInfo, LeaseInfo, Wallet};

#[derive(Parser)]
#[command(name = "blz-cli")]
#[command(about = "Command-line client for the key/value ledger", long_about = None)]
struct Cli {
    /// TOML config file. BLZ_* environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset.
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GasArgs {
    #[arg(long)]
    max_gas: Option<u64>,
    #[arg(long)]
    max_fee: Option<u64>,
    #[arg(long)]
    gas_price: Option<u64>,
}

impl GasArgs {
    /// Flags replace the configured policy as a whole when any is given.
    fn resolve(&self, default: GasInfo) -> GasInfo {
        if self.max_gas.is_none() && self.max_fee.is_none() && self.gas_price.is_none() {
            return default;
        }
        GasInfo {
            max_gas: self.max_gas.unwrap_or(0),
            max_fee: self.max_fee.unwrap_or(0),
            gas_price: self.gas_price.unwrap_or(0),
        }
    }
}

#[derive(Args)]
struct LeaseArgs {
    #[arg(long, default_value_t = 0)]
    days: i64,
    #[arg(long, default_value_t = 0)]
    hours: i64,
    #[arg(long, default_value_t = 0)]
    minutes: i64,
    #[arg(long, default_value_t = 0)]
    seconds: i64,
}

impl LeaseArgs {
    fn lease(&self) -> Option<LeaseInfo> {
        let lease = LeaseInfo {
            days: self.days,
            hours: self.hours,
            minutes: self.minutes,
            seconds: self.seconds,
        };
        (lease != LeaseInfo::default()).then_some(lease)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create a key
    Create {
        key: String,
        value: String,
        #[command(flatten)]
        lease: LeaseArgs,
        #[command(flatten)]
        gas: GasArgs,
    },
    /// Update a key
    Update {
        key: String,
        value: String,
        #[command(flatten)]
        lease: LeaseArgs,
        #[command(flatten)]
        gas: GasArgs,
    },
    /// Delete a key
    Delete {
        key: String,
        #[command(flatten)]
        gas: GasArgs,
    },
    /// Rename a key
    Rename {
        key: String,
        new_key: String,
        #[command(flatten)]
        gas: GasArgs,
    },
    /// Read a key (unsigned query)
    Read { key: String },
    /// Check whether a key exists (unsigned query)
    Has { key: String },
    /// List keys (unsigned query)
    Keys,
    /// List keys and values (unsigned query)
    KeyValues,
    /// Count keys (unsigned query)
    Count,
    /// Remaining lease of a key in seconds (unsigned query)
    GetLease { key: String },
    /// Read a key through a transaction
    TxRead {
        key: String,
        #[command(flatten)]
        gas: GasArgs,
    },
    /// List keys through a transaction
    TxKeys {
        #[command(flatten)]
        gas: GasArgs,
    },
    /// List keys and values through a transaction
    TxKeyValues {
        #[command(flatten)]
        gas: GasArgs,
    },
    /// Count keys through a transaction
    TxCount {
        #[command(flatten)]
        gas: GasArgs,
    },
    /// Remaining lease of a key through a transaction
    TxGetLease {
        key: String,
        #[command(flatten)]
        gas: GasArgs,
    },
    /// Show the signer account
    Account,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.observability.log_level.clone());
    logging::init(&level);

    let default_gas = config.gas;
    let wallet = Wallet::from_env()?;
    let client = Client::connect(config, wallet).await?;

    let output: Value = match cli.command {
        Commands::Create { key, value, lease, gas } => {
            client
                .create(&key, &value, lease.lease(), gas.resolve(default_gas))
                .await?;
            json!({ "created": key })
        }
        Commands::Update { key, value, lease, gas } => {
            client
                .update(&key, &value, lease.lease(), gas.resolve(default_gas))
                .await?;
            json!({ "updated": key })
        }
        Commands::Delete { key, gas } => {
            client.delete(&key, gas.resolve(default_gas)).await?;
            json!({ "deleted": key })
        }
        Commands::Rename { key, new_key, gas } => {
            client.rename(&key, &new_key, gas.resolve(default_gas)).await?;
            json!({ "renamed": key, "to": new_key })
        }
        Commands::Read { key } => json!({ "key": key, "value": client.read(&key).await? }),
        Commands::Has { key } => json!({ "key": key, "has": client.has(&key).await? }),
        Commands::Keys => json!({ "keys": client.keys().await? }),
        Commands::KeyValues => json!({ "keyvalues": client.key_values().await? }),
        Commands::Count => json!({ "count": client.count().await? }),
        Commands::GetLease { key } => {
            json!({ "key": key, "lease_secs": client.get_lease(&key).await? })
        }
        Commands::TxRead { key, gas } => {
            let value = client.tx_read(&key, gas.resolve(default_gas)).await?;
            json!({ "key": key, "value": value })
        }
        Commands::TxKeys { gas } => {
            json!({ "keys": client.tx_keys(gas.resolve(default_gas)).await? })
        }
        Commands::TxKeyValues { gas } => {
            json!({ "keyvalues": client.tx_key_values(gas.resolve(default_gas)).await? })
        }
        Commands::TxCount { gas } => {
            json!({ "count": client.tx_count(gas.resolve(default_gas)).await? })
        }
        Commands::TxGetLease { key, gas } => {
            let lease = client.tx_get_lease(&key, gas.resolve(default_gas)).await?;
            json!({ "key": key, "lease_secs": lease })
        }
        Commands::Account => serde_json::to_value(client.fetch_account().await?)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
