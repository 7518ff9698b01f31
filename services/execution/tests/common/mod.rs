//! In-memory chain for executor integration tests
//!
//! Serves one weighted pool through [`PoolQuery`] and applies swaps submitted
//! through [`TransactionBroadcaster`] with the same math the chain runs,
//! including the minimum-output check and the events a real node emits.

#![allow(dead_code)]

use async_trait::async_trait;
use gamm_config::{ExecutorSettings, GlobalConfig, PoolQuerySettings, ServiceConfig};
use gamm_math::WeightedMath;
use gamm_types::{BigInt, Dec, Denom, PoolId};
use parking_lot::Mutex;
use pool_state_adapter::{
    Freshness, PoolQuery, PoolQueryError, RawCoin, RawPool, RawPoolAsset, RawPoolParams,
};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use swap_executor::{
    ChainRejection, Currency, ExecutionContext, MsgSwapExactAmountIn, SigningIdentity, SwapExecutor,
    SwapIntent, TransactionBroadcaster, TxConfirmation, TxEvent,
};

pub const POOL_ID: u64 = 1;
pub const POOL_ADDRESS: &str = "osmo1pooladdress";

/// How the chain answers the next submissions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainMode {
    Normal,
    /// Never produce a result
    Hang,
    /// Reject every transaction at check time
    Reject { code: u32, reason: String },
    /// Apply the swap but report an output one unit higher in the events
    MisreportOutput,
    /// Apply the swap but emit no swap `message` event
    DropMessageEvent,
}

#[derive(Debug, Clone)]
struct MockAsset {
    denom: String,
    balance: BigInt,
    weight: Dec,
}

#[derive(Debug)]
struct ChainState {
    assets: Vec<MockAsset>,
    swap_fee: Dec,
    height: u64,
    mode: ChainMode,
    delay: Duration,
    /// Reserves are restored after every swap, as if arbitraged back
    hold_reserves: bool,
    submissions: Vec<(String, u64)>,
    in_flight: HashMap<String, usize>,
    max_in_flight_per_signer: usize,
    in_flight_total: usize,
    max_in_flight_total: usize,
}

pub struct MockChain {
    state: Mutex<ChainState>,
    pool_queries: AtomicUsize,
    broadcasts: AtomicUsize,
}

impl MockChain {
    /// Pool 1: uion weight 100, uosmo weight 200, 100 000 000 of each, no fee
    pub fn reference_pool() -> Arc<Self> {
        Self::with_pool(
            &[("uion", 100_000_000, 100), ("uosmo", 100_000_000, 200)],
            Dec::zero(),
        )
    }

    pub fn with_pool(assets: &[(&str, u64, u64)], swap_fee: Dec) -> Arc<Self> {
        let assets = assets
            .iter()
            .map(|(denom, balance, weight)| MockAsset {
                denom: denom.to_string(),
                balance: BigInt::from(*balance),
                weight: Dec::from_int(*weight),
            })
            .collect();
        Self::from_assets(assets, swap_fee)
    }

    /// Pool with reserves given as decimal strings, for 18-decimal tokens
    pub fn with_large_pool(assets: &[(&str, &str, u64)], swap_fee: Dec) -> Arc<Self> {
        let assets = assets
            .iter()
            .map(|(denom, balance, weight)| MockAsset {
                denom: denom.to_string(),
                balance: BigInt::from_str(balance).unwrap(),
                weight: Dec::from_int(*weight),
            })
            .collect();
        Self::from_assets(assets, swap_fee)
    }

    fn from_assets(assets: Vec<MockAsset>, swap_fee: Dec) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ChainState {
                assets,
                swap_fee,
                height: 100,
                mode: ChainMode::Normal,
                delay: Duration::ZERO,
                hold_reserves: false,
                submissions: Vec::new(),
                in_flight: HashMap::new(),
                max_in_flight_per_signer: 0,
                in_flight_total: 0,
                max_in_flight_total: 0,
            }),
            pool_queries: AtomicUsize::new(0),
            broadcasts: AtomicUsize::new(0),
        })
    }

    pub fn set_mode(&self, mode: ChainMode) {
        self.state.lock().mode = mode;
    }

    /// Time between receiving a transaction and its inclusion
    pub fn set_delay(&self, delay: Duration) {
        self.state.lock().delay = delay;
    }

    pub fn set_hold_reserves(&self, hold: bool) {
        self.state.lock().hold_reserves = hold;
    }

    pub fn pool_queries(&self) -> usize {
        self.pool_queries.load(Ordering::SeqCst)
    }

    pub fn broadcasts(&self) -> usize {
        self.broadcasts.load(Ordering::SeqCst)
    }

    /// `(signer, sequence)` of every submission, in arrival order
    pub fn submissions(&self) -> Vec<(String, u64)> {
        self.state.lock().submissions.clone()
    }

    pub fn max_in_flight_per_signer(&self) -> usize {
        self.state.lock().max_in_flight_per_signer
    }

    pub fn max_in_flight_total(&self) -> usize {
        self.state.lock().max_in_flight_total
    }

    pub fn balance(&self, denom: &str) -> BigInt {
        self.state
            .lock()
            .assets
            .iter()
            .find(|asset| asset.denom == denom)
            .map(|asset| asset.balance.clone())
            .unwrap_or_default()
    }

    fn raw_pool(&self) -> RawPool {
        let state = self.state.lock();
        RawPool {
            id: POOL_ID.to_string(),
            pool_params: RawPoolParams {
                swap_fee: state.swap_fee.to_string(),
                exit_fee: Some(Dec::zero().to_string()),
            },
            pool_assets: state
                .assets
                .iter()
                .map(|asset| RawPoolAsset {
                    token: RawCoin {
                        denom: asset.denom.clone(),
                        amount: asset.balance.to_string(),
                    },
                    weight: asset.weight.to_string(),
                })
                .collect(),
        }
    }

    fn begin(&self, signer: &str, sequence: u64) -> (ChainMode, Duration) {
        let mut state = self.state.lock();
        state.submissions.push((signer.to_string(), sequence));

        let count = {
            let count = state.in_flight.entry(signer.to_string()).or_insert(0);
            *count += 1;
            *count
        };
        state.max_in_flight_per_signer = state.max_in_flight_per_signer.max(count);
        state.in_flight_total += 1;
        state.max_in_flight_total = state.max_in_flight_total.max(state.in_flight_total);

        (state.mode.clone(), state.delay)
    }

    fn end(&self, signer: &str) {
        let mut state = self.state.lock();
        if let Some(count) = state.in_flight.get_mut(signer) {
            *count -= 1;
        }
        state.in_flight_total -= 1;
    }

    /// Deliver the swap against current state
    fn deliver(
        &self,
        message: &MsgSwapExactAmountIn,
        signer: &SigningIdentity,
        mode: &ChainMode,
    ) -> Result<TxConfirmation, ChainRejection> {
        let mut state = self.state.lock();
        state.height += 1;
        let height = state.height;
        let tx_hash = format!("TX{:06}", height);

        let fail = |code: u32, reason: String| ChainRejection {
            code,
            codespace: "gamm".to_string(),
            reason,
            tx_hash: Some(tx_hash.clone()),
        };

        let out_denom = message
            .token_out_denom()
            .ok_or_else(|| fail(3, "empty route".to_string()))?
            .to_string();
        let in_denom = message.token_in.denom.clone();
        let token_in = BigInt::from_str(&message.token_in.amount)
            .map_err(|e| fail(3, format!("invalid token in: {}", e)))?;
        let min_out = BigInt::from_str(&message.token_out_min_amount)
            .map_err(|e| fail(3, format!("invalid min out: {}", e)))?;

        let in_index = state.assets.iter().position(|a| a.denom == in_denom);
        let out_index = state.assets.iter().position(|a| a.denom == out_denom);
        let (in_index, out_index) = match (in_index, out_index) {
            (Some(i), Some(o)) => (i, o),
            _ => return Err(fail(5, "denom does not exist in pool".to_string())),
        };

        let asset_in = state.assets[in_index].clone();
        let asset_out = state.assets[out_index].clone();
        let token_out = WeightedMath::calc_out_given_in(
            &Dec::from_int(asset_in.balance.clone()),
            &asset_in.weight,
            &Dec::from_int(asset_out.balance.clone()),
            &asset_out.weight,
            &Dec::from_int(token_in.clone()),
            &state.swap_fee,
        )
        .map_err(|e| fail(6, e.to_string()))?
        .truncate();

        if token_out < min_out {
            return Err(fail(
                7,
                format!(
                    "token is lesser than min amount: {}{} < {}{}",
                    token_out, out_denom, min_out, out_denom
                ),
            ));
        }

        if !state.hold_reserves {
            state.assets[in_index].balance += &token_in;
            state.assets[out_index].balance -= &token_out;
        }

        let reported_out = match mode {
            ChainMode::MisreportOutput => &token_out + BigInt::from(1u32),
            _ => token_out,
        };

        let mut events = Vec::new();
        if *mode != ChainMode::DropMessageEvent {
            events.push(
                TxEvent::new("message")
                    .attribute("action", MsgSwapExactAmountIn::TYPE_URL)
                    .attribute("module", "gamm")
                    .attribute("sender", signer.address()),
            );
        }
        events.push(
            TxEvent::new("transfer")
                .attribute("recipient", POOL_ADDRESS)
                .attribute("sender", signer.address())
                .attribute("amount", format!("{}{}", token_in, in_denom))
                .attribute("recipient", signer.address())
                .attribute("sender", POOL_ADDRESS)
                .attribute("amount", format!("{}{}", reported_out, out_denom)),
        );

        Ok(TxConfirmation {
            tx_hash,
            height,
            events,
        })
    }
}

#[async_trait]
impl PoolQuery for MockChain {
    async fn get_pool(
        &self,
        pool_id: PoolId,
        _freshness: Freshness,
    ) -> Result<RawPool, PoolQueryError> {
        self.pool_queries.fetch_add(1, Ordering::SeqCst);
        if pool_id.inner() != POOL_ID {
            return Err(PoolQueryError::NotFound {
                pool_id: pool_id.inner(),
            });
        }
        Ok(self.raw_pool())
    }
}

#[async_trait]
impl TransactionBroadcaster for MockChain {
    async fn submit(
        &self,
        message: &MsgSwapExactAmountIn,
        signer: &SigningIdentity,
        sequence: u64,
    ) -> Result<TxConfirmation, ChainRejection> {
        self.broadcasts.fetch_add(1, Ordering::SeqCst);
        let (mode, delay) = self.begin(signer.address(), sequence);
        let _guard = InFlight {
            chain: self,
            signer: signer.address(),
        };

        if let ChainMode::Reject { code, reason } = &mode {
            return Err(ChainRejection {
                code: *code,
                codespace: "sdk".to_string(),
                reason: reason.clone(),
                tx_hash: None,
            });
        }
        if mode == ChainMode::Hang {
            std::future::pending::<()>().await;
        }
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.deliver(message, signer, &mode)
    }
}

/// Decrements in-flight counters even when the submit future is dropped
struct InFlight<'a> {
    chain: &'a MockChain,
    signer: &'a str,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.chain.end(self.signer);
    }
}

pub fn test_config(confirmation_timeout_ms: u64) -> ServiceConfig {
    ServiceConfig {
        global: GlobalConfig {
            enable_metrics: false,
            ..GlobalConfig::default()
        },
        pool_query: PoolQuerySettings {
            query_timeout_ms: 1_000,
            max_retries: 1,
            initial_backoff_ms: 1,
            max_backoff_ms: 2,
        },
        executor: ExecutorSettings {
            confirmation_timeout_ms,
            ..ExecutorSettings::default()
        },
    }
}

pub fn executor(chain: &Arc<MockChain>, confirmation_timeout_ms: u64) -> SwapExecutor {
    let context = ExecutionContext::new(chain.clone(), chain.clone());
    SwapExecutor::new(context, &test_config(confirmation_timeout_ms))
}

pub fn currency(symbol: &str, denom: &str) -> Currency {
    Currency::new(symbol, Denom::new(denom).unwrap(), 6)
}

/// Swap `amount` ION (6 decimals) for OSMO in pool 1
pub fn ion_to_osmo(amount: &str) -> SwapIntent {
    SwapIntent::new(
        PoolId::new(POOL_ID),
        currency("ION", "uion"),
        amount,
        currency("OSMO", "uosmo"),
    )
}

pub fn dec(s: &str) -> Dec {
    Dec::from_str(s).unwrap()
}

pub fn signer(address: &str) -> SigningIdentity {
    SigningIdentity::new(address)
}
