//! Pool state adapter errors

use crate::query::PoolQueryError;
use gamm_math::AmmError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PoolStateError {
    /// Requested denom is not one of the pool's assets
    #[error("Asset {denom} is not registered in pool {pool_id}")]
    UnregisteredAsset { pool_id: u64, denom: String },

    /// Raw pool data could not be parsed
    #[error("Malformed pool {pool_id}: {reason}")]
    MalformedPool { pool_id: u64, reason: String },

    /// Parsed pool violates a structural invariant
    #[error(transparent)]
    InvalidPool(#[from] AmmError),

    #[error("Pool query failed after {attempts} attempt(s): {source}")]
    Query {
        attempts: u32,
        #[source]
        source: PoolQueryError,
    },

    #[error("Pool query timed out after {attempts} attempt(s) of {timeout_ms}ms")]
    QueryTimeout { attempts: u32, timeout_ms: u64 },
}
