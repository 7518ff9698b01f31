//! Estimator error types

use gamm_types::FixedPointError;
use thiserror::Error;

/// Errors produced while validating a pool or estimating a swap
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AmmError {
    /// Input amount is non-positive, unparsable, or yields no usable output
    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// Pool snapshot violates a structural invariant
    #[error("Invalid pool: {reason}")]
    InvalidPool { reason: String },

    #[error("Fixed-point arithmetic failed: {0}")]
    FixedPoint(#[from] FixedPointError),
}

impl AmmError {
    pub(crate) fn invalid_amount(reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_pool(reason: impl Into<String>) -> Self {
        Self::InvalidPool {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AmmError>;
