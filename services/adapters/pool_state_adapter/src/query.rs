//! Pool query interface and the chain's raw pool representation

use async_trait::async_trait;
use gamm_types::PoolId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Whether a query may be answered from a cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Cached,
    /// Bypass any cache and read current chain state
    ForceRefresh,
}

/// Errors reported by a [`PoolQuery`] implementation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PoolQueryError {
    #[error("Pool {pool_id} not found")]
    NotFound { pool_id: u64 },

    /// Connection or node error; worth retrying
    #[error("Pool query transport error: {message}")]
    Transport { message: String },

    #[error("Failed to decode pool response: {message}")]
    Decode { message: String },
}

impl PoolQueryError {
    /// Whether the same query may succeed if repeated
    pub fn is_transient(&self) -> bool {
        matches!(self, PoolQueryError::Transport { .. })
    }
}

/// Source of pool state
///
/// Implementations wrap an LCD/gRPC client, an indexer, or an in-memory
/// chain in tests.
#[async_trait]
pub trait PoolQuery: Send + Sync {
    async fn get_pool(&self, pool_id: PoolId, freshness: Freshness) -> Result<RawPool, PoolQueryError>;
}

/// Pool as returned by the chain's gamm query endpoint
///
/// Numbers stay strings until [`crate::PoolStateAdapter::select_assets`]
/// validates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPool {
    pub id: String,
    pub pool_params: RawPoolParams,
    pub pool_assets: Vec<RawPoolAsset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPoolParams {
    pub swap_fee: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_fee: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPoolAsset {
    pub token: RawCoin,
    pub weight: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCoin {
    pub denom: String,
    pub amount: String,
}

impl RawPool {
    /// Decode the JSON body of a pool query
    pub fn from_json(json: &str) -> Result<Self, PoolQueryError> {
        serde_json::from_str(json).map_err(|e| PoolQueryError::Decode {
            message: e.to_string(),
        })
    }

    pub fn asset(&self, denom: &str) -> Option<&RawPoolAsset> {
        self.pool_assets.iter().find(|asset| asset.token.denom == denom)
    }
}
