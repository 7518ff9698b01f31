//! Validated two-asset view of a weighted pool

use crate::error::{AmmError, Result};
use crate::weighted_math::WeightedMath;
use gamm_types::{BigInt, Dec, Denom, PoolId};
use num_traits::Signed;
use serde::{Deserialize, Serialize};

/// One side of a weighted pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolAsset {
    pub denom: Denom,
    /// Reserve in base units
    pub balance: BigInt,
    pub weight: Dec,
}

impl PoolAsset {
    pub fn new(denom: Denom, balance: impl Into<BigInt>, weight: Dec) -> Self {
        Self {
            denom,
            balance: balance.into(),
            weight,
        }
    }

    /// Balance as a decimal, for the weighted formula
    pub fn balance_dec(&self) -> Dec {
        Dec::from_int(self.balance.clone())
    }
}

/// Pool snapshot reduced to the two assets of a single-hop swap
///
/// Built once per estimate from freshly queried state and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub pool_id: PoolId,
    pub in_asset: PoolAsset,
    pub out_asset: PoolAsset,
    /// Fraction of the input kept by the pool, in [0, 1)
    pub swap_fee: Dec,
}

impl Pool {
    /// Validate and build a pool snapshot
    ///
    /// Rejects identical denoms, non-positive balances or weights, and a swap
    /// fee outside [0, 1).
    pub fn new(
        pool_id: PoolId,
        in_asset: PoolAsset,
        out_asset: PoolAsset,
        swap_fee: Dec,
    ) -> Result<Self> {
        if in_asset.denom == out_asset.denom {
            return Err(AmmError::invalid_pool(format!(
                "input and output denom are both {}",
                in_asset.denom
            )));
        }
        for asset in [&in_asset, &out_asset] {
            if !asset.balance.is_positive() {
                return Err(AmmError::invalid_pool(format!(
                    "{} balance must be positive, got {}",
                    asset.denom, asset.balance
                )));
            }
            if !asset.weight.is_positive() {
                return Err(AmmError::invalid_pool(format!(
                    "{} weight must be positive, got {}",
                    asset.denom, asset.weight
                )));
            }
        }
        if swap_fee.is_negative() || swap_fee >= Dec::one() {
            return Err(AmmError::invalid_pool(format!(
                "swap fee {} outside [0, 1)",
                swap_fee
            )));
        }

        Ok(Self {
            pool_id,
            in_asset,
            out_asset,
            swap_fee,
        })
    }

    /// Spot price of the output asset in units of the input asset
    pub fn spot_price(&self) -> Result<Dec> {
        WeightedMath::calc_spot_price(
            &self.in_asset.balance_dec(),
            &self.in_asset.weight,
            &self.out_asset.balance_dec(),
            &self.out_asset.weight,
        )
    }
}
