//! # GAMM Math - Weighted Pool Swap Estimation
//!
//! ## Purpose
//!
//! Off-chain reproduction of the chain's weighted constant-mean pool math for
//! single-hop "exact amount in" swaps. Estimated outputs match chain-confirmed
//! transfer amounts exactly because every step uses the same 18-digit
//! truncating decimal arithmetic and the same fractional power series.
//!
//! ## Integration Points
//!
//! - **Input Sources**: validated [`Pool`] snapshots from the pool state adapter
//! - **Output Destinations**: the swap executor's slippage check and message builder
//! - **Precision**: base-unit integers and [`Dec`] only; no floating point
//!
//! ## Example
//!
//! ```rust
//! use gamm_math::{estimate_swap_exact_amount_in, Pool, PoolAsset};
//! use gamm_types::{Dec, Denom, PoolId};
//!
//! let pool = Pool::new(
//!     PoolId::new(1),
//!     PoolAsset::new(Denom::new("uatom")?, 100_000_000u64, Dec::from_int(100)),
//!     PoolAsset::new(Denom::new("uosmo")?, 100_000_000u64, Dec::from_int(200)),
//!     Dec::zero(),
//! )?;
//!
//! let estimate = estimate_swap_exact_amount_in(&pool, "1", 6)?;
//! assert_eq!(estimate.token_out_amount.to_string(), "496280");
//! assert_eq!(estimate.slippage.to_string(), "0.007495768517772225");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod estimator;
pub mod pool;
pub mod weighted_math;

pub use error::AmmError;
pub use estimator::{
    estimate_swap_exact_amount_in, estimate_swap_exact_amount_in_base, SwapEstimate,
};
pub use pool::{Pool, PoolAsset};
pub use weighted_math::WeightedMath;

/// Common types for swap calculations
pub use gamm_types::{BigInt, Dec};
