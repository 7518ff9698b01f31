//! # Swap Executor - Slippage-Bounded Submission
//!
//! ## Purpose
//!
//! Drives one exact-amount-in swap from intent to a terminal state:
//!
//! ```text
//! Built → Estimated → Rejected
//!                   → Submitted → Confirmed
//!                               → Failed
//! ```
//!
//! Pool state is fetched fresh, estimated locally, checked against the
//! caller's slippage bound and only then handed to the broadcaster. A
//! confirmed transaction is verified against the estimate before the swap
//! counts as confirmed.
//!
//! ## Failure classes
//!
//! Everything up to and including the slippage check is local and never
//! touches the broadcaster. After submission a chain rejection is
//! [`SwapError::BroadcastFailure`] and a missed confirmation window is
//! [`SwapError::Timeout`], whose outcome is unknown.

use crate::broadcaster::{SigningIdentity, TransactionBroadcaster, TxConfirmation};
use crate::error::SwapError;
use crate::intent::SwapIntent;
use crate::message::MsgSwapExactAmountIn;
use crate::sequencer::{SubmissionPermit, SubmissionSequencer};
use crate::verification::verify_swap_events;
use crate::{log_error, log_estimate, log_execution, log_pool, log_rejected, log_success, log_timeout};
use gamm_config::{ExecutorSettings, ServiceConfig};
use gamm_math::{estimate_swap_exact_amount_in, Pool, SwapEstimate};
use gamm_types::BigInt;
use pool_state_adapter::{PoolQuery, PoolStateAdapter};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::info;

/// Collaborators the executor talks to
#[derive(Clone)]
pub struct ExecutionContext {
    pub pool_query: Arc<dyn PoolQuery>,
    pub broadcaster: Arc<dyn TransactionBroadcaster>,
}

impl ExecutionContext {
    pub fn new(
        pool_query: Arc<dyn PoolQuery>,
        broadcaster: Arc<dyn TransactionBroadcaster>,
    ) -> Self {
        Self {
            pool_query,
            broadcaster,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SwapState {
    Built,
    Estimated,
    /// Stopped by the local slippage check; nothing was submitted
    Rejected,
    Submitted,
    Confirmed,
    Failed,
}

impl SwapState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SwapState::Rejected | SwapState::Confirmed | SwapState::Failed
        )
    }
}

impl fmt::Display for SwapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SwapState::Built => "built",
            SwapState::Estimated => "estimated",
            SwapState::Rejected => "rejected",
            SwapState::Submitted => "submitted",
            SwapState::Confirmed => "confirmed",
            SwapState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// State entered and the time spent reaching it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionStep {
    pub state: SwapState,
    pub duration: Duration,
}

/// Swap whose confirmed events matched the estimate
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmedSwap {
    pub tx_hash: String,
    pub height: u64,
    pub token_out_amount: BigInt,
    /// Sequence number the transaction was submitted with
    pub sequence: u64,
    pub confirmation: TxConfirmation,
}

/// Everything known about one swap attempt once it reached a terminal state
#[derive(Debug, Clone)]
pub struct SwapReport {
    pub state: SwapState,
    pub estimate: Option<SwapEstimate>,
    pub message: Option<MsgSwapExactAmountIn>,
    pub tx_hash: Option<String>,
    pub outcome: Result<ConfirmedSwap, SwapError>,
    pub steps: Vec<ExecutionStep>,
    pub elapsed: Duration,
}

impl SwapReport {
    pub fn error(&self) -> Option<&SwapError> {
        self.outcome.as_ref().err()
    }

    pub fn into_result(self) -> Result<ConfirmedSwap, SwapError> {
        self.outcome
    }

    /// States passed through, in order
    pub fn states(&self) -> Vec<SwapState> {
        self.steps.iter().map(|step| step.state).collect()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExecutorMetrics {
    pub confirmed: u64,
    pub rejected: u64,
    pub failed: u64,
    /// Subset of `failed` whose outcome is unknown
    pub timeouts: u64,
    pub broadcasts: u64,
}

/// In-progress record of one swap attempt
struct Run {
    started: Instant,
    last_transition: Instant,
    steps: Vec<ExecutionStep>,
    estimate: Option<SwapEstimate>,
    message: Option<MsgSwapExactAmountIn>,
    tx_hash: Option<String>,
}

impl Run {
    /// Every attempt begins in `Built`, before any validation
    fn start() -> Self {
        let now = Instant::now();
        let mut run = Self {
            started: now,
            last_transition: now,
            steps: Vec::new(),
            estimate: None,
            message: None,
            tx_hash: None,
        };
        run.enter(SwapState::Built);
        run
    }

    fn enter(&mut self, state: SwapState) {
        let now = Instant::now();
        self.steps.push(ExecutionStep {
            state,
            duration: now.duration_since(self.last_transition),
        });
        self.last_transition = now;
    }

    fn finish(mut self, state: SwapState, outcome: Result<ConfirmedSwap, SwapError>) -> SwapReport {
        self.enter(state);
        SwapReport {
            state,
            estimate: self.estimate,
            message: self.message,
            tx_hash: self.tx_hash,
            outcome,
            steps: self.steps,
            elapsed: self.started.elapsed(),
        }
    }
}

/// Slippage-bounded exact-in swap executor
pub struct SwapExecutor {
    adapter: PoolStateAdapter,
    broadcaster: Arc<dyn TransactionBroadcaster>,
    settings: ExecutorSettings,
    sequencer: SubmissionSequencer,
    metrics: Arc<RwLock<ExecutorMetrics>>,
    log_metrics: bool,
}

impl SwapExecutor {
    pub fn new(context: ExecutionContext, config: &ServiceConfig) -> Self {
        info!(
            "{} initialized with {}ms confirmation timeout",
            config.global.service_name, config.executor.confirmation_timeout_ms
        );
        Self {
            adapter: PoolStateAdapter::new(context.pool_query, config.pool_query.clone()),
            broadcaster: context.broadcaster,
            settings: config.executor.clone(),
            sequencer: SubmissionSequencer::new(),
            metrics: Arc::new(RwLock::new(ExecutorMetrics::default())),
            log_metrics: config.global.enable_metrics,
        }
    }

    /// Fetch a fresh pool snapshot and execute the swap against it
    ///
    /// The signer's submission slot is taken before the pool is read, so
    /// swaps from one identity are each estimated against the state left by
    /// the previous one.
    pub async fn execute(&self, intent: &SwapIntent, signer: &SigningIdentity) -> SwapReport {
        let run = Run::start();
        if let Err(err) = intent.validate() {
            return self.fail(run, err).await;
        }

        let permit = self.sequencer.acquire(signer).await;
        let pool = match self
            .adapter
            .fresh_pool(intent.pool_id, intent.token_in_denom(), intent.token_out_denom())
            .await
        {
            Ok(pool) => pool,
            Err(err) => return self.fail(run, err.into()).await,
        };
        log_pool!(
            "Pool {}: {} {} / {} {}, fee {}",
            pool.pool_id,
            pool.in_asset.balance,
            pool.in_asset.denom,
            pool.out_asset.balance,
            pool.out_asset.denom,
            pool.swap_fee
        );

        self.run(run, intent, &pool, signer, Some(permit)).await
    }

    /// Execute the swap against a snapshot the caller already holds
    ///
    /// The snapshot should be fresh; the chain applies the swap to whatever
    /// state it has at inclusion time.
    pub async fn execute_with_pool(
        &self,
        intent: &SwapIntent,
        pool: &Pool,
        signer: &SigningIdentity,
    ) -> SwapReport {
        let run = Run::start();
        if let Err(err) = intent.validate() {
            return self.fail(run, err).await;
        }
        self.run(run, intent, pool, signer, None).await
    }

    async fn run(
        &self,
        mut run: Run,
        intent: &SwapIntent,
        pool: &Pool,
        signer: &SigningIdentity,
        permit: Option<SubmissionPermit>,
    ) -> SwapReport {
        if pool.pool_id != intent.pool_id
            || pool.in_asset.denom != *intent.token_in_denom()
            || pool.out_asset.denom != *intent.token_out_denom()
        {
            let err = SwapError::invalid_intent(format!(
                "pool {} ({} -> {}) does not match intent for pool {} ({} -> {})",
                pool.pool_id,
                pool.in_asset.denom,
                pool.out_asset.denom,
                intent.pool_id,
                intent.token_in_denom(),
                intent.token_out_denom()
            ));
            return self.fail(run, err).await;
        }

        let estimate = match estimate_swap_exact_amount_in(
            pool,
            &intent.token_in.amount,
            intent.token_in.currency.decimals,
        ) {
            Ok(estimate) => estimate,
            Err(err) => return self.fail(run, err.into()).await,
        };
        log_estimate!(
            "{} {} -> {} {} on pool {} (spot {}, effective {}, slippage {})",
            estimate.token_in_amount,
            intent.token_in_denom(),
            estimate.token_out_amount,
            intent.token_out_denom(),
            pool.pool_id,
            estimate.spot_price_before,
            estimate.effective_price,
            estimate.slippage
        );
        run.estimate = Some(estimate.clone());
        run.enter(SwapState::Estimated);

        if let Some(max_slippage) = &intent.max_slippage {
            if estimate.slippage > *max_slippage {
                let err = SwapError::SlippageExceeded {
                    slippage: estimate.slippage.clone(),
                    max_slippage: max_slippage.clone(),
                };
                return self.reject(run, err).await;
            }
        }

        let token_out_min_amount = match estimate.token_out_min_amount(intent.max_slippage.as_ref()) {
            Ok(min) => min,
            Err(err) => return self.fail(run, SwapError::Estimation(err)).await,
        };
        let message = MsgSwapExactAmountIn::single_hop(
            signer.address(),
            pool.pool_id,
            intent.token_in_denom(),
            intent.token_out_denom(),
            &estimate,
            &token_out_min_amount,
            intent.max_slippage.clone(),
        );
        run.message = Some(message.clone());

        let mut permit = match permit {
            Some(permit) => permit,
            None => self.sequencer.acquire(signer).await,
        };
        let sequence = permit.take_sequence();
        self.metrics.write().await.broadcasts += 1;
        log_execution!(
            "Submitting swap for {} (sequence {}, min out {})",
            signer,
            sequence,
            token_out_min_amount
        );

        let outcome = timeout(
            self.settings.confirmation_timeout(),
            self.broadcaster.submit(&message, signer, sequence),
        )
        .await;
        drop(permit);
        run.enter(SwapState::Submitted);

        let confirmation = match outcome {
            Err(_) => {
                let err = SwapError::Timeout {
                    timeout_ms: self.settings.confirmation_timeout_ms,
                };
                return self.fail(run, err).await;
            }
            Ok(Err(rejection)) => {
                run.tx_hash = rejection.tx_hash.clone();
                let err = SwapError::BroadcastFailure {
                    code: rejection.code,
                    reason: rejection.to_string(),
                    tx_hash: rejection.tx_hash,
                };
                return self.fail(run, err).await;
            }
            Ok(Ok(confirmation)) => confirmation,
        };
        run.tx_hash = Some(confirmation.tx_hash.clone());

        if let Err(err) = verify_swap_events(
            &self.settings,
            &confirmation,
            signer,
            &estimate,
            intent.token_out_denom(),
        ) {
            return self.fail(run, err).await;
        }

        log_success!(
            "Swap confirmed in tx {} at height {}: {} {}",
            confirmation.tx_hash,
            confirmation.height,
            estimate.token_out_amount,
            intent.token_out_denom()
        );
        self.metrics.write().await.confirmed += 1;
        let confirmed = ConfirmedSwap {
            tx_hash: confirmation.tx_hash.clone(),
            height: confirmation.height,
            token_out_amount: estimate.token_out_amount.clone(),
            sequence,
            confirmation,
        };
        self.report(run.finish(SwapState::Confirmed, Ok(confirmed))).await
    }

    async fn reject(&self, run: Run, err: SwapError) -> SwapReport {
        log_rejected!("Swap rejected before submission: {}", err);
        self.metrics.write().await.rejected += 1;
        self.report(run.finish(SwapState::Rejected, Err(err))).await
    }

    async fn fail(&self, run: Run, err: SwapError) -> SwapReport {
        {
            let mut metrics = self.metrics.write().await;
            metrics.failed += 1;
            if err.requires_status_inquiry() {
                metrics.timeouts += 1;
            }
        }
        match &err {
            SwapError::Timeout { .. } => log_timeout!("Swap outcome unknown: {}", err),
            _ => log_error!("Swap failed: {}", err),
        }
        self.report(run.finish(SwapState::Failed, Err(err))).await
    }

    async fn report(&self, report: SwapReport) -> SwapReport {
        if self.log_metrics {
            let metrics = self.metrics.read().await;
            info!(
                state = %report.state,
                elapsed_ms = report.elapsed.as_millis() as u64,
                confirmed = metrics.confirmed,
                rejected = metrics.rejected,
                failed = metrics.failed,
                timeouts = metrics.timeouts,
                "Swap finished"
            );
        }
        report
    }

    pub async fn get_metrics(&self) -> ExecutorMetrics {
        self.metrics.read().await.clone()
    }

    pub fn adapter(&self) -> &PoolStateAdapter {
        &self.adapter
    }

    pub fn settings(&self) -> &ExecutorSettings {
        &self.settings
    }
}
