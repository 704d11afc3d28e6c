//! Fee resolution from the server-suggested template and the caller's gas policy.
//!
//! Precedence: `max_fee` over `gas_price` over the server default amount.
//! `max_gas` only clamps the gas limit.

use crate::ledger::types::{ClientError, ClientResult, Fee, FeeAmount, GasInfo};

/// Resolved gas limit and fee amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedFee {
    pub gas: u64,
    pub amount: u64,
}

impl ResolvedFee {
    pub fn into_fee(self, denom: &str) -> Fee {
        Fee {
            amount: vec![FeeAmount {
                amount: self.amount.to_string(),
                denom: denom.to_string(),
            }],
            gas: self.gas.to_string(),
        }
    }
}

pub fn resolve_fee(template: &Fee, gas_info: Option<&GasInfo>) -> ClientResult<ResolvedFee> {
    let gas_info =
        gas_info.ok_or_else(|| ClientError::Config("gas_info is required".to_string()))?;

    let mut gas: u64 = template
        .gas
        .trim()
        .parse()
        .map_err(|_| ClientError::Decode(format!("invalid template gas '{}'", template.gas)))?;

    let mut amount: u64 = template
        .amount
        .first()
        .and_then(|a| a.amount.trim().parse().ok())
        .unwrap_or(0);

    if gas_info.max_gas != 0 && gas > gas_info.max_gas {
        gas = gas_info.max_gas;
    }

    if gas_info.max_fee != 0 {
        amount = gas_info.max_fee;
    } else if gas_info.gas_price != 0 {
        amount = gas.saturating_mul(gas_info.gas_price);
    }

    Ok(ResolvedFee { gas, amount })
}
