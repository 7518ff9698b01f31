//! # GAMM Types Library
//!
//! Exact decimal arithmetic and typed identifiers for weighted-pool swap math.
//!
//! ## Design Philosophy
//!
//! - **No Precision Loss**: every amount is a scaled big integer, never a float
//! - **Chain Parity**: 18 fractional digits, truncation toward zero, the same
//!   fractional power series the chain evaluates
//! - **Type Safety**: `PoolId` and `Denom` cannot be confused with bare numbers or strings
//! - **Clear Boundaries**: base-unit conversion happens in one place, [`precision`]
//!
//! ## Quick Start
//!
//! ```rust
//! use gamm_types::{Dec, precision::to_base_units};
//! use std::str::FromStr;
//!
//! let fee = Dec::from_str("0.003")?;
//! let keep = &Dec::one() - &fee;
//! assert_eq!(keep.to_string(), "0.997000000000000000");
//!
//! let base = to_base_units("1.5", 6)?;
//! assert_eq!(base.to_string(), "1500000");
//! # Ok::<(), gamm_types::FixedPointError>(())
//! ```

pub mod common;

// Conversion between human amounts and base units
pub mod precision;

pub use common::errors::{FixedPointError, ValidationError};
pub use common::fixed_point::{Dec, POW_PRECISION, PRECISION};
pub use common::identifiers::{Denom, PoolId};

// Big integers appear in public signatures
pub use num_bigint::BigInt;
