//! Swap message handed to the transaction broadcaster

use gamm_config::protocol::MSG_SWAP_EXACT_AMOUNT_IN;
use gamm_math::SwapEstimate;
use gamm_types::{BigInt, Dec, Denom, PoolId};
use serde::{Deserialize, Serialize};

/// Amount and denom as the chain encodes them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

/// One hop of a swap route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapAmountInRoute {
    /// Decimal string, as the chain's JSON encodes uint64
    pub pool_id: String,
    pub token_out_denom: String,
}

/// Exact-amount-in swap in the chain's JSON shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSwapExactAmountIn {
    pub sender: String,
    pub routes: Vec<SwapAmountInRoute>,
    pub token_in: Coin,
    /// Smallest output the chain accepts; below it the transaction fails
    pub token_out_min_amount: String,
    /// Bound the local pre-check enforced; not part of the chain message
    #[serde(skip)]
    pub max_slippage: Option<Dec>,
}

impl MsgSwapExactAmountIn {
    pub const TYPE_URL: &'static str = MSG_SWAP_EXACT_AMOUNT_IN;

    /// Build the single-hop message for an accepted estimate
    pub fn single_hop(
        sender: impl Into<String>,
        pool_id: PoolId,
        token_in_denom: &Denom,
        token_out_denom: &Denom,
        estimate: &SwapEstimate,
        token_out_min_amount: &BigInt,
        max_slippage: Option<Dec>,
    ) -> Self {
        Self {
            sender: sender.into(),
            routes: vec![SwapAmountInRoute {
                pool_id: pool_id.inner().to_string(),
                token_out_denom: token_out_denom.to_string(),
            }],
            token_in: Coin {
                denom: token_in_denom.to_string(),
                amount: estimate.token_in_amount.to_string(),
            },
            token_out_min_amount: token_out_min_amount.to_string(),
            max_slippage,
        }
    }

    pub fn pool_id(&self) -> Option<u64> {
        self.routes.first().and_then(|route| route.pool_id.parse().ok())
    }

    /// Denom received at the end of the route
    pub fn token_out_denom(&self) -> Option<&str> {
        self.routes.last().map(|route| route.token_out_denom.as_str())
    }

    /// `{"@type": ..., ...}` encoding used by JSON signing and LCD broadcast
    pub fn to_any_json(&self) -> serde_json::Result<serde_json::Value> {
        let mut value = serde_json::to_value(self)?;
        if let serde_json::Value::Object(map) = &mut value {
            map.insert(
                "@type".to_string(),
                serde_json::Value::String(Self::TYPE_URL.to_string()),
            );
        }
        Ok(value)
    }
}
