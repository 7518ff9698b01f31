//! Conversion between human-readable amounts and base units
//!
//! Chain amounts are integers in the asset's smallest unit (`1 OSMO =
//! 1_000_000 uosmo`). Human amounts are decimal strings. Crossing that
//! boundary multiplies by `10^decimals` and truncates toward zero, exactly
//! once; callers that already hold base units should not convert again.
//!
//! ## Critical Rules
//!
//! 1. **NO FLOATING POINT**: amounts go through [`Dec`] only
//! 2. **Truncate once**: digits below the base unit are dropped at conversion
//! 3. **Explicit decimals**: the asset's decimal count travels with the amount

use crate::common::errors::FixedPointError;
use crate::common::fixed_point::{Dec, PRECISION};
use num_bigint::BigInt;
use std::str::FromStr;

/// Largest decimal count a base-unit conversion accepts
///
/// Any more would push significant digits past the 18-digit scale.
pub const MAX_ASSET_DECIMALS: u32 = PRECISION;

/// Convert a human amount string into base units, truncating toward zero
///
/// `to_base_units("1.5", 6)` is `1_500_000`; `to_base_units("0.0000001", 6)` is `0`.
pub fn to_base_units(amount: &str, decimals: u32) -> Result<BigInt, FixedPointError> {
    let human = Dec::from_str(amount)?;
    dec_to_base_units(&human, decimals)
}

/// Same as [`to_base_units`] for an already parsed amount
pub fn dec_to_base_units(amount: &Dec, decimals: u32) -> Result<BigInt, FixedPointError> {
    check_decimals(decimals)?;
    Ok(amount.mul_int(&BigInt::from(10u8).pow(decimals)).truncate())
}

/// Convert base units into a human-scale decimal (display only)
pub fn from_base_units(amount: &BigInt, decimals: u32) -> Result<Dec, FixedPointError> {
    check_decimals(decimals)?;
    Dec::from_int(amount.clone()).quo_int(&BigInt::from(10u8).pow(decimals))
}

fn check_decimals(decimals: u32) -> Result<(), FixedPointError> {
    if decimals > MAX_ASSET_DECIMALS {
        return Err(FixedPointError::Overflow {
            value: decimals.to_string(),
            target: "asset decimals (max 18)",
        });
    }
    Ok(())
}
