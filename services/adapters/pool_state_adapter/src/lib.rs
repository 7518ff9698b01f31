//! Pool State Adapter
//!
//! Provides a clean interface for reading weighted pool state and turning it
//! into validated swap snapshots. Only this adapter talks to the pool query
//! collaborator, maintaining the boundary between chain I/O and swap math.
//!
//! Features:
//! - Forced-refresh pool queries bounded by a timeout
//! - Retry with exponential backoff for transient query failures
//! - Denom selection with an unregistered-asset guard ahead of any arithmetic
//! - Query metrics

pub mod adapter;
pub mod error;
pub mod query;

pub use adapter::{Metrics, PoolStateAdapter};
pub use error::PoolStateError;
pub use query::{
    Freshness, PoolQuery, PoolQueryError, RawCoin, RawPool, RawPoolAsset, RawPoolParams,
};

#[cfg(test)]
mod tests;
