//! Exact-amount-in swap estimation
//!
//! Pure and synchronous: a pool snapshot and an input amount go in, a fresh
//! [`SwapEstimate`] comes out. Identical inputs always give bit-identical
//! estimates.

use crate::error::{AmmError, Result};
use crate::pool::Pool;
use crate::weighted_math::WeightedMath;
use gamm_types::precision::to_base_units;
use gamm_types::{BigInt, Dec, FixedPointError};
use num_bigint::Sign;
use num_traits::{One, Signed};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result of estimating a single-hop exact-in swap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapEstimate {
    /// Input in base units, after the one-time human-to-base conversion
    pub token_in_amount: BigInt,
    /// Output in base units, truncated
    pub token_out_amount: BigInt,
    pub spot_price_before: Dec,
    pub spot_price_after: Dec,
    /// `token_in_amount / token_out_amount`
    pub effective_price: Dec,
    /// `(effective_price - spot_price_before) / spot_price_before`, never negative
    pub slippage: Dec,
}

impl SwapEstimate {
    /// Relative move of the spot price caused by the swap (display only)
    pub fn price_impact(&self) -> Result<Dec> {
        let ratio = self.spot_price_after.checked_quo(&self.spot_price_before)?;
        Ok(&ratio - &Dec::one())
    }

    /// Minimum output the chain enforces for this swap
    ///
    /// `1` without a bound (or with a zero bound); otherwise
    /// `truncate(token_in / (spot_price_before * (1 + max_slippage)))`, clamped
    /// to `[1, token_out_amount]`. The clamp matters at the exact bound: the
    /// effective price and slippage are both truncated, so the unclamped
    /// quotient can land a few base units above the estimated output.
    pub fn token_out_min_amount(&self, max_slippage: Option<&Dec>) -> Result<BigInt> {
        let max_slippage = match max_slippage {
            Some(max) if !max.is_zero() => max,
            _ => return Ok(BigInt::one()),
        };

        let bounded_price = &self.spot_price_before * &(&Dec::one() + max_slippage);
        let min_out = Dec::from_int(self.token_in_amount.clone())
            .checked_quo(&bounded_price)?
            .truncate();

        Ok(min_out.max(BigInt::one()).min(self.token_out_amount.clone()))
    }
}

/// Estimate a swap from a human-readable input amount
///
/// The amount is converted to base units exactly once
/// (`truncate(amount * 10^decimals)`) and then handed to
/// [`estimate_swap_exact_amount_in_base`].
pub fn estimate_swap_exact_amount_in(
    pool: &Pool,
    token_in_amount: &str,
    token_in_decimals: u32,
) -> Result<SwapEstimate> {
    let token_in_base = to_base_units(token_in_amount, token_in_decimals).map_err(|e| match e {
        FixedPointError::InvalidDecimal { .. } | FixedPointError::TooMuchPrecision { .. } => {
            AmmError::invalid_amount(e.to_string())
        }
        other => AmmError::FixedPoint(other),
    })?;

    estimate_swap_exact_amount_in_base(pool, &token_in_base)
}

/// Estimate a swap from an input already in base units
pub fn estimate_swap_exact_amount_in_base(
    pool: &Pool,
    token_in_base: &BigInt,
) -> Result<SwapEstimate> {
    if token_in_base.sign() != Sign::Plus {
        return Err(AmmError::invalid_amount(format!(
            "token in amount must be positive, got {}",
            token_in_base
        )));
    }

    let balance_in = pool.in_asset.balance_dec();
    let balance_out = pool.out_asset.balance_dec();
    let token_in = Dec::from_int(token_in_base.clone());

    let out = WeightedMath::calc_out_given_in(
        &balance_in,
        &pool.in_asset.weight,
        &balance_out,
        &pool.out_asset.weight,
        &token_in,
        &pool.swap_fee,
    )?;
    let token_out_amount = out.truncate();

    if !token_out_amount.is_positive() {
        return Err(AmmError::invalid_amount(format!(
            "{} {} is too small to produce any {}",
            token_in_base, pool.in_asset.denom, pool.out_asset.denom
        )));
    }
    if token_out_amount >= pool.out_asset.balance {
        return Err(AmmError::invalid_amount(format!(
            "output {} would drain the {} reserve of {}",
            token_out_amount, pool.out_asset.denom, pool.out_asset.balance
        )));
    }

    let spot_price_before = pool.spot_price()?;
    let spot_price_after = WeightedMath::calc_spot_price(
        &(&balance_in + &token_in),
        &pool.in_asset.weight,
        &Dec::from_int(&pool.out_asset.balance - &token_out_amount),
        &pool.out_asset.weight,
    )?;
    if spot_price_after < spot_price_before {
        return Err(AmmError::invalid_amount(
            "spot price cannot decrease after swap",
        ));
    }

    let effective_price = token_in.checked_quo(&Dec::from_int(token_out_amount.clone()))?;
    let slippage = (&effective_price - &spot_price_before)
        .checked_quo(&spot_price_before)?
        .max(Dec::zero());

    debug!(
        pool_id = %pool.pool_id,
        token_in = %token_in_base,
        token_out = %token_out_amount,
        spot_before = %spot_price_before,
        effective = %effective_price,
        slippage = %slippage,
        "Estimated exact-in swap"
    );

    Ok(SwapEstimate {
        token_in_amount: token_in_base.clone(),
        token_out_amount,
        spot_price_before,
        spot_price_after,
        effective_price,
        slippage,
    })
}
