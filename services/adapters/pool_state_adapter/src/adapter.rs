//! Pool State Adapter Implementation
//!
//! Turns queried pool state into a validated [`Pool`] snapshot. All pool
//! queries go through this adapter so the executor never sees raw chain data.

use crate::error::PoolStateError;
use crate::query::{Freshness, PoolQuery, RawPool, RawPoolAsset};
use gamm_config::PoolQuerySettings;
use gamm_math::{Pool, PoolAsset};
use gamm_types::{BigInt, Dec, Denom, PoolId};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

/// Pool State Adapter
pub struct PoolStateAdapter {
    query: Arc<dyn PoolQuery>,
    settings: PoolQuerySettings,
    metrics: Arc<RwLock<Metrics>>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Metrics {
    /// Queries that returned a pool
    pub queries: u64,
    pub retries: u64,
    /// Lookups that gave up after retries or on a permanent error
    pub failures: u64,
    pub unregistered_lookups: u64,
}

impl PoolStateAdapter {
    pub fn new(query: Arc<dyn PoolQuery>, settings: PoolQuerySettings) -> Self {
        info!(
            "Pool State Adapter initialized (timeout {}ms, {} retries)",
            settings.query_timeout_ms, settings.max_retries
        );
        Self {
            query,
            settings,
            metrics: Arc::new(RwLock::new(Metrics::default())),
        }
    }

    /// Query current pool state and select the two swap assets
    ///
    /// Always bypasses caches. Transport errors and timeouts are retried with
    /// exponential backoff up to `max_retries`; every other error returns
    /// immediately.
    pub async fn fresh_pool(
        &self,
        pool_id: PoolId,
        in_denom: &Denom,
        out_denom: &Denom,
    ) -> Result<Pool, PoolStateError> {
        let raw = self.query_with_retry(pool_id).await?;

        match Self::select_assets(pool_id, &raw, in_denom, out_denom) {
            Err(err @ PoolStateError::UnregisteredAsset { .. }) => {
                self.metrics.write().await.unregistered_lookups += 1;
                warn!("{}", err);
                Err(err)
            }
            other => other,
        }
    }

    async fn query_with_retry(&self, pool_id: PoolId) -> Result<RawPool, PoolStateError> {
        let max_attempts = self.settings.max_retries + 1;
        let mut attempts = 0;
        let mut backoff = self.settings.initial_backoff();

        loop {
            attempts += 1;

            let last_error = match timeout(
                self.settings.query_timeout(),
                self.query.get_pool(pool_id, Freshness::ForceRefresh),
            )
            .await
            {
                Ok(Ok(raw)) => {
                    self.metrics.write().await.queries += 1;
                    debug!("Fetched {} ({} assets)", pool_id, raw.pool_assets.len());
                    return Ok(raw);
                }
                Ok(Err(e)) if !e.is_transient() => {
                    self.metrics.write().await.failures += 1;
                    return Err(PoolStateError::Query {
                        attempts,
                        source: e,
                    });
                }
                Ok(Err(e)) => PoolStateError::Query {
                    attempts,
                    source: e,
                },
                Err(_) => PoolStateError::QueryTimeout {
                    attempts,
                    timeout_ms: self.settings.query_timeout_ms,
                },
            };

            warn!(
                "Pool query for {} failed (attempt {}/{}): {}",
                pool_id, attempts, max_attempts, last_error
            );

            if attempts >= max_attempts {
                self.metrics.write().await.failures += 1;
                return Err(last_error);
            }

            self.metrics.write().await.retries += 1;
            sleep(backoff).await;
            backoff = (backoff * 2).min(self.settings.max_backoff());
        }
    }

    /// Build a validated two-asset pool from raw state, without I/O
    ///
    /// Denom presence is checked before any number is parsed, so an
    /// unregistered asset is reported as such even in an otherwise malformed
    /// pool.
    pub fn select_assets(
        pool_id: PoolId,
        raw: &RawPool,
        in_denom: &Denom,
        out_denom: &Denom,
    ) -> Result<Pool, PoolStateError> {
        let unregistered = |denom: &Denom| PoolStateError::UnregisteredAsset {
            pool_id: pool_id.inner(),
            denom: denom.to_string(),
        };
        let raw_in = raw.asset(in_denom.as_str()).ok_or_else(|| unregistered(in_denom))?;
        let raw_out = raw.asset(out_denom.as_str()).ok_or_else(|| unregistered(out_denom))?;

        let malformed = |reason: String| PoolStateError::MalformedPool {
            pool_id: pool_id.inner(),
            reason,
        };

        let raw_id = raw
            .id
            .parse::<u64>()
            .map_err(|_| malformed(format!("pool id '{}' is not an integer", raw.id)))?;
        if raw_id != pool_id.inner() {
            return Err(malformed(format!("response is for pool {}", raw_id)));
        }

        let swap_fee = Dec::from_str(&raw.pool_params.swap_fee)
            .map_err(|e| malformed(format!("swap fee: {}", e)))?;

        let in_asset = parse_asset(in_denom, raw_in).map_err(malformed)?;
        let out_asset = parse_asset(out_denom, raw_out).map_err(malformed)?;

        Ok(Pool::new(pool_id, in_asset, out_asset, swap_fee)?)
    }

    /// Get current metrics
    pub async fn get_metrics(&self) -> Metrics {
        self.metrics.read().await.clone()
    }

    pub fn settings(&self) -> &PoolQuerySettings {
        &self.settings
    }
}

fn parse_asset(denom: &Denom, raw: &RawPoolAsset) -> Result<PoolAsset, String> {
    if raw.token.amount.is_empty() || !raw.token.amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("{} amount '{}' is not an integer", denom, raw.token.amount));
    }
    let balance = BigInt::from_str(&raw.token.amount)
        .map_err(|e| format!("{} amount '{}': {}", denom, raw.token.amount, e))?;
    let weight =
        Dec::from_str(&raw.weight).map_err(|e| format!("{} weight: {}", denom, e))?;

    Ok(PoolAsset::new(denom.clone(), balance, weight))
}
