//! Swap intents as submitted by callers

use crate::error::SwapError;
use gamm_types::{Dec, Denom, PoolId};
use serde::{Deserialize, Serialize};

/// Asset metadata needed to move between human and base units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// Display symbol, e.g. `OSMO`
    pub symbol: String,
    /// On-chain denom, e.g. `uosmo`
    pub denom: Denom,
    pub decimals: u32,
}

impl Currency {
    pub fn new(symbol: impl Into<String>, denom: Denom, decimals: u32) -> Self {
        Self {
            symbol: symbol.into(),
            denom,
            decimals,
        }
    }
}

/// Human-scale input amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenIn {
    pub currency: Currency,
    /// Decimal string, e.g. `"1.5"`
    pub amount: String,
}

/// Single-hop exact-amount-in swap request
///
/// Consumed by [`crate::SwapExecutor::execute`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapIntent {
    pub pool_id: PoolId,
    pub token_in: TokenIn,
    pub token_out_currency: Currency,
    /// Largest acceptable slippage as a fraction (`0.01` is 1%); `None` disables the check
    pub max_slippage: Option<Dec>,
}

impl SwapIntent {
    pub fn new(
        pool_id: PoolId,
        token_in_currency: Currency,
        token_in_amount: impl Into<String>,
        token_out_currency: Currency,
    ) -> Self {
        Self {
            pool_id,
            token_in: TokenIn {
                currency: token_in_currency,
                amount: token_in_amount.into(),
            },
            token_out_currency,
            max_slippage: None,
        }
    }

    pub fn with_max_slippage(mut self, max_slippage: Dec) -> Self {
        self.max_slippage = Some(max_slippage);
        self
    }

    pub fn token_in_denom(&self) -> &Denom {
        &self.token_in.currency.denom
    }

    pub fn token_out_denom(&self) -> &Denom {
        &self.token_out_currency.denom
    }

    /// Structural checks that need no pool state
    pub fn validate(&self) -> Result<(), SwapError> {
        if self.token_in_denom() == self.token_out_denom() {
            return Err(SwapError::invalid_intent(format!(
                "cannot swap {} for itself",
                self.token_in_denom()
            )));
        }
        if let Some(max) = &self.max_slippage {
            if max.is_negative() {
                return Err(SwapError::invalid_intent(format!(
                    "max slippage must be >= 0, got {}",
                    max
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn currency(symbol: &str, denom: &str) -> Currency {
        Currency::new(symbol, Denom::new(denom).unwrap(), 6)
    }

    #[test]
    fn test_valid_intent() {
        let intent = SwapIntent::new(
            PoolId::new(1),
            currency("ATOM", "uatom"),
            "1",
            currency("OSMO", "uosmo"),
        )
        .with_max_slippage(Dec::from_str("0.01").unwrap());

        assert!(intent.validate().is_ok());
        assert_eq!(intent.token_in_denom().as_str(), "uatom");
        assert_eq!(intent.token_out_denom().as_str(), "uosmo");
    }

    #[test]
    fn test_rejects_same_denom() {
        let intent = SwapIntent::new(
            PoolId::new(1),
            currency("OSMO", "uosmo"),
            "1",
            currency("OSMO", "uosmo"),
        );
        assert!(matches!(
            intent.validate(),
            Err(SwapError::InvalidIntent { .. })
        ));
    }

    #[test]
    fn test_rejects_negative_slippage() {
        let intent = SwapIntent::new(
            PoolId::new(1),
            currency("ATOM", "uatom"),
            "1",
            currency("OSMO", "uosmo"),
        )
        .with_max_slippage(Dec::from_str("-0.01").unwrap());
        assert!(matches!(
            intent.validate(),
            Err(SwapError::InvalidIntent { .. })
        ));

        // Zero is a valid bound
        let intent = intent.with_max_slippage(Dec::zero());
        assert!(intent.validate().is_ok());
    }
}
