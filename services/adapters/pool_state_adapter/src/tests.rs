//! Tests for PoolStateAdapter

use super::*;
use async_trait::async_trait;
use gamm_config::PoolQuerySettings;
use gamm_math::AmmError;
use gamm_types::{Dec, Denom, PoolId};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

enum Scripted {
    Respond(Result<RawPool, PoolQueryError>),
    Hang,
}

/// Pool query that replays scripted responses and records each call
struct ScriptedQuery {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<Freshness>>,
}

impl ScriptedQuery {
    fn new(script: Vec<Scripted>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<Freshness> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl PoolQuery for ScriptedQuery {
    async fn get_pool(&self, pool_id: PoolId, freshness: Freshness) -> Result<RawPool, PoolQueryError> {
        self.calls.lock().push(freshness);
        let next = self.script.lock().pop_front();
        match next {
            Some(Scripted::Respond(result)) => result,
            Some(Scripted::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(PoolQueryError::NotFound { pool_id: pool_id.inner() })
            }
            None => Err(PoolQueryError::NotFound { pool_id: pool_id.inner() }),
        }
    }
}

fn fast_settings(max_retries: u32) -> PoolQuerySettings {
    PoolQuerySettings {
        query_timeout_ms: 50,
        max_retries,
        initial_backoff_ms: 1,
        max_backoff_ms: 4,
    }
}

fn raw_pool() -> RawPool {
    RawPool {
        id: "1".to_string(),
        pool_params: RawPoolParams {
            swap_fee: "0.000000000000000000".to_string(),
            exit_fee: None,
        },
        pool_assets: vec![
            RawPoolAsset {
                token: RawCoin {
                    denom: "uatom".to_string(),
                    amount: "100000000".to_string(),
                },
                weight: "100".to_string(),
            },
            RawPoolAsset {
                token: RawCoin {
                    denom: "uosmo".to_string(),
                    amount: "100000000".to_string(),
                },
                weight: "200".to_string(),
            },
        ],
    }
}

fn denom(s: &str) -> Denom {
    Denom::new(s).unwrap()
}

fn transport_error() -> PoolQueryError {
    PoolQueryError::Transport {
        message: "connection reset".to_string(),
    }
}

#[test]
fn test_select_assets_orients_pool() {
    let pool =
        PoolStateAdapter::select_assets(PoolId::new(1), &raw_pool(), &denom("uosmo"), &denom("uatom"))
            .unwrap();

    assert_eq!(pool.in_asset.denom.as_str(), "uosmo");
    assert_eq!(pool.in_asset.weight, Dec::from_int(200));
    assert_eq!(pool.out_asset.denom.as_str(), "uatom");
    assert_eq!(pool.swap_fee, Dec::zero());
    assert_eq!(pool.spot_price().unwrap(), Dec::from_ratio(1, 2).unwrap());
}

#[test]
fn test_select_assets_unregistered_denom() {
    for (in_denom, out_denom, missing) in [("uion", "uosmo", "uion"), ("uatom", "uion", "uion")] {
        let err = PoolStateAdapter::select_assets(
            PoolId::new(1),
            &raw_pool(),
            &denom(in_denom),
            &denom(out_denom),
        )
        .unwrap_err();
        assert_eq!(
            err,
            PoolStateError::UnregisteredAsset {
                pool_id: 1,
                denom: missing.to_string()
            }
        );
    }
}

#[test]
fn test_unregistered_reported_before_parsing() {
    let mut raw = raw_pool();
    raw.pool_params.swap_fee = "not-a-number".to_string();

    let err =
        PoolStateAdapter::select_assets(PoolId::new(1), &raw, &denom("uion"), &denom("uosmo"))
            .unwrap_err();
    assert!(matches!(err, PoolStateError::UnregisteredAsset { .. }));
}

#[test]
fn test_select_assets_malformed_numbers() {
    let cases: Vec<Box<dyn Fn(&mut RawPool)>> = vec![
        Box::new(|raw| raw.pool_params.swap_fee = "0.3%".to_string()),
        Box::new(|raw| raw.pool_assets[0].token.amount = "1e8".to_string()),
        Box::new(|raw| raw.pool_assets[0].token.amount = "-5".to_string()),
        Box::new(|raw| raw.pool_assets[1].weight = "heavy".to_string()),
        Box::new(|raw| raw.id = "one".to_string()),
        Box::new(|raw| raw.id = "2".to_string()),
    ];

    for mutate in cases {
        let mut raw = raw_pool();
        mutate(&mut raw);
        let err =
            PoolStateAdapter::select_assets(PoolId::new(1), &raw, &denom("uatom"), &denom("uosmo"))
                .unwrap_err();
        assert!(matches!(err, PoolStateError::MalformedPool { pool_id: 1, .. }), "{err:?}");
    }
}

#[test]
fn test_select_assets_invalid_pool() {
    let mut raw = raw_pool();
    raw.pool_assets[1].token.amount = "0".to_string();

    let err =
        PoolStateAdapter::select_assets(PoolId::new(1), &raw, &denom("uatom"), &denom("uosmo"))
            .unwrap_err();
    assert!(matches!(
        err,
        PoolStateError::InvalidPool(AmmError::InvalidPool { .. })
    ));
}

#[tokio::test]
async fn test_fresh_pool_forces_refresh() {
    let query = ScriptedQuery::new(vec![Scripted::Respond(Ok(raw_pool()))]);
    let adapter = PoolStateAdapter::new(query.clone(), fast_settings(3));

    let pool = adapter
        .fresh_pool(PoolId::new(1), &denom("uatom"), &denom("uosmo"))
        .await
        .unwrap();

    assert_eq!(pool.pool_id, PoolId::new(1));
    assert_eq!(query.calls(), vec![Freshness::ForceRefresh]);

    let metrics = adapter.get_metrics().await;
    assert_eq!(metrics.queries, 1);
    assert_eq!(metrics.retries, 0);
}

#[tokio::test]
async fn test_transient_errors_are_retried() {
    let query = ScriptedQuery::new(vec![
        Scripted::Respond(Err(transport_error())),
        Scripted::Hang,
        Scripted::Respond(Ok(raw_pool())),
    ]);
    let adapter = PoolStateAdapter::new(query.clone(), fast_settings(3));

    let pool = adapter
        .fresh_pool(PoolId::new(1), &denom("uatom"), &denom("uosmo"))
        .await;

    assert!(pool.is_ok());
    assert_eq!(query.calls().len(), 3);
    let metrics = adapter.get_metrics().await;
    assert_eq!(metrics.retries, 2);
    assert_eq!(metrics.failures, 0);
}

#[tokio::test]
async fn test_retries_exhausted() {
    let query = ScriptedQuery::new(vec![
        Scripted::Respond(Err(transport_error())),
        Scripted::Respond(Err(transport_error())),
        Scripted::Respond(Err(transport_error())),
    ]);
    let adapter = PoolStateAdapter::new(query.clone(), fast_settings(2));

    let err = adapter
        .fresh_pool(PoolId::new(1), &denom("uatom"), &denom("uosmo"))
        .await
        .unwrap_err();

    assert!(matches!(err, PoolStateError::Query { attempts: 3, .. }));
    assert_eq!(adapter.get_metrics().await.failures, 1);
}

#[tokio::test]
async fn test_timeout_on_last_attempt() {
    let query = ScriptedQuery::new(vec![Scripted::Hang]);
    let adapter = PoolStateAdapter::new(query, fast_settings(0));

    let err = adapter
        .fresh_pool(PoolId::new(1), &denom("uatom"), &denom("uosmo"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        PoolStateError::QueryTimeout {
            attempts: 1,
            timeout_ms: 50
        }
    );
}

#[tokio::test]
async fn test_permanent_error_not_retried() {
    let query = ScriptedQuery::new(vec![Scripted::Respond(Err(PoolQueryError::NotFound {
        pool_id: 9,
    }))]);
    let adapter = PoolStateAdapter::new(query.clone(), fast_settings(3));

    let err = adapter
        .fresh_pool(PoolId::new(9), &denom("uatom"), &denom("uosmo"))
        .await
        .unwrap_err();

    assert!(matches!(err, PoolStateError::Query { attempts: 1, .. }));
    assert_eq!(query.calls().len(), 1);
}

#[tokio::test]
async fn test_unregistered_lookup_metric() {
    let query = ScriptedQuery::new(vec![Scripted::Respond(Ok(raw_pool()))]);
    let adapter = PoolStateAdapter::new(query, fast_settings(0));

    let err = adapter
        .fresh_pool(PoolId::new(1), &denom("uion"), &denom("uosmo"))
        .await
        .unwrap_err();

    assert!(matches!(err, PoolStateError::UnregisteredAsset { .. }));
    assert_eq!(adapter.get_metrics().await.unregistered_lookups, 1);
}
