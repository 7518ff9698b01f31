//! Swap execution errors
//!
//! Three classes matter to callers deciding whether to retry:
//! - local, pre-submission errors never reached the network
//! - [`SwapError::BroadcastFailure`] is a definite chain rejection
//! - [`SwapError::Timeout`] leaves the outcome unknown

use gamm_math::AmmError;
use gamm_types::Dec;
use pool_state_adapter::PoolStateError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SwapError {
    /// Intent failed validation before any pool query
    #[error("Invalid swap intent: {reason}")]
    InvalidIntent { reason: String },

    #[error("Asset {denom} is not registered in pool {pool_id}")]
    UnregisteredAsset { pool_id: u64, denom: String },

    /// Pool could not be fetched or parsed
    #[error("Pool state unavailable: {0}")]
    PoolState(#[source] PoolStateError),

    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    #[error("Estimation failed: {0}")]
    Estimation(#[source] AmmError),

    #[error("Slippage {slippage} exceeds maximum {max_slippage}")]
    SlippageExceeded { slippage: Dec, max_slippage: Dec },

    /// Chain rejected the transaction; not retried automatically
    #[error("Broadcast failed (code {code}): {reason}")]
    BroadcastFailure {
        code: u32,
        reason: String,
        tx_hash: Option<String>,
    },

    /// No terminal result within the confirmation window
    #[error("No confirmation within {timeout_ms}ms; transaction outcome unknown")]
    Timeout { timeout_ms: u64 },

    /// Confirmed transaction lacks the expected swap events
    #[error("Unexpected events in tx {tx_hash}: {reason}")]
    UnexpectedEvents { tx_hash: String, reason: String },

    /// Confirmed transfer differs from the local estimate
    #[error("Estimate mismatch in tx {tx_hash}: expected {expected}, observed {observed}")]
    EstimateMismatch {
        tx_hash: String,
        expected: String,
        observed: String,
    },
}

impl SwapError {
    /// Error raised locally with no network round trip for the swap itself
    pub fn is_pre_submission(&self) -> bool {
        matches!(
            self,
            SwapError::InvalidIntent { .. }
                | SwapError::UnregisteredAsset { .. }
                | SwapError::PoolState(_)
                | SwapError::InvalidAmount { .. }
                | SwapError::Estimation(_)
                | SwapError::SlippageExceeded { .. }
        )
    }

    /// Caller must look the transaction up before retrying
    pub fn requires_status_inquiry(&self) -> bool {
        matches!(self, SwapError::Timeout { .. })
    }

    pub(crate) fn invalid_intent(reason: impl Into<String>) -> Self {
        SwapError::InvalidIntent {
            reason: reason.into(),
        }
    }
}

impl From<AmmError> for SwapError {
    fn from(err: AmmError) -> Self {
        match err {
            AmmError::InvalidAmount { reason } => SwapError::InvalidAmount { reason },
            other => SwapError::Estimation(other),
        }
    }
}

impl From<PoolStateError> for SwapError {
    fn from(err: PoolStateError) -> Self {
        match err {
            PoolStateError::UnregisteredAsset { pool_id, denom } => {
                SwapError::UnregisteredAsset { pool_id, denom }
            }
            other => SwapError::PoolState(other),
        }
    }
}
