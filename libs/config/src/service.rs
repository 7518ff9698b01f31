//! Default configuration values
//!
//! Used by the `Default` impls in [`crate::service_config`] and by services
//! that build settings programmatically.

/// Pool query defaults
pub mod pool_query {
    /// Per-query timeout (milliseconds)
    pub const QUERY_TIMEOUT_MS: u64 = 10_000;

    /// Retries after the first failed query
    pub const MAX_RETRIES: u32 = 3;

    /// First retry backoff (milliseconds); doubles on each retry
    pub const INITIAL_BACKOFF_MS: u64 = 200;

    /// Backoff ceiling (milliseconds)
    pub const MAX_BACKOFF_MS: u64 = 5_000;
}

/// Swap executor defaults
pub mod executor {
    /// Time allowed between broadcast and a terminal chain result (milliseconds)
    pub const CONFIRMATION_TIMEOUT_MS: u64 = 30_000;
}
