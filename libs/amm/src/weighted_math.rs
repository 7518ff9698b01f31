//! Weighted constant-mean pool math with chain-exact truncation
//!
//! Every intermediate value is a [`Dec`]; the operation order matches the
//! chain's own evaluation so truncation happens at the same digits.

use crate::error::{AmmError, Result};
use gamm_types::{Dec, FixedPointError};

/// Weighted pool math functions
pub struct WeightedMath;

impl WeightedMath {
    /// Output amount for an exact input
    ///
    /// `out = balance_out * (1 - (balance_in / (balance_in + token_in * (1 - fee))) ^ (weight_in / weight_out))`
    ///
    /// The result is not truncated; callers take the integer part.
    ///
    /// # Arguments
    /// * `balance_in` / `balance_out` - reserves in base units
    /// * `weight_in` / `weight_out` - pool weights (only their ratio matters)
    /// * `token_in` - input in base units, before the fee
    /// * `swap_fee` - fee fraction in [0, 1)
    pub fn calc_out_given_in(
        balance_in: &Dec,
        weight_in: &Dec,
        balance_out: &Dec,
        weight_out: &Dec,
        token_in: &Dec,
        swap_fee: &Dec,
    ) -> Result<Dec> {
        let weight_ratio = weight_in.checked_quo(weight_out)?;
        let adjusted_in = token_in * &(&Dec::one() - swap_fee);
        let y = balance_in.checked_quo(&(balance_in + &adjusted_in))?;
        if y.is_zero() {
            return Err(AmmError::invalid_amount(
                "input dwarfs the pool reserve; power base truncates to zero",
            ));
        }

        // A base near zero with a small fractional exponent stalls the series
        let y_pow = y.pow(&weight_ratio).map_err(|e| match e {
            FixedPointError::PowBaseOutOfRange { .. }
            | FixedPointError::SeriesDidNotConverge { .. } => AmmError::invalid_amount(format!(
                "input drains the pool; power base {} has no usable power: {}",
                y, e
            )),
            other => AmmError::FixedPoint(other),
        })?;
        let multiplier = &Dec::one() - &y_pow;
        Ok(balance_out * &multiplier)
    }

    /// Spot price `(balance_in / weight_in) / (balance_out / weight_out)`
    ///
    /// Units of the input asset per unit of the output asset. No fee factor.
    pub fn calc_spot_price(
        balance_in: &Dec,
        weight_in: &Dec,
        balance_out: &Dec,
        weight_out: &Dec,
    ) -> Result<Dec> {
        let numerator = balance_in.checked_quo(weight_in)?;
        let denominator = balance_out.checked_quo(weight_out)?;
        Ok(numerator.checked_quo(&denominator)?)
    }
}
