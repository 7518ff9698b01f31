//! Slippage-bounded swap execution for weighted pools
//!
//! [`SwapExecutor`] takes a [`SwapIntent`], fetches a fresh pool snapshot
//! through the pool state adapter, estimates the swap with the same
//! fixed-point math the chain uses, rejects it locally when the estimated
//! slippage exceeds the caller's bound, and otherwise submits it through a
//! [`TransactionBroadcaster`] and verifies the confirmed events.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use swap_executor::*;
//! # async fn run(pools: Arc<dyn pool_state_adapter::PoolQuery>, chain: Arc<dyn TransactionBroadcaster>) -> anyhow::Result<()> {
//! use gamm_types::{Denom, PoolId};
//! use std::str::FromStr;
//!
//! let config = gamm_config::load_config(None)?;
//! init_logging(&config.global)?;
//! let executor = SwapExecutor::new(ExecutionContext::new(pools, chain), &config);
//!
//! let intent = SwapIntent::new(
//!     PoolId::new(1),
//!     Currency::new("ION", Denom::new("uion")?, 6),
//!     "1",
//!     Currency::new("OSMO", Denom::new("uosmo")?, 6),
//! )
//! .with_max_slippage(gamm_types::Dec::from_str("0.01")?);
//!
//! let confirmed = executor
//!     .execute(&intent, &SigningIdentity::new("osmo1..."))
//!     .await
//!     .into_result()?;
//! println!("received {} uosmo in {}", confirmed.token_out_amount, confirmed.tx_hash);
//! # Ok(())
//! # }
//! ```

pub mod broadcaster;
pub mod error;
pub mod executor;
pub mod intent;
pub mod logging;
pub mod message;
pub mod sequencer;
pub mod verification;

pub use broadcaster::{
    ChainRejection, EventAttribute, SigningIdentity, TransactionBroadcaster, TxConfirmation,
    TxEvent,
};
pub use error::SwapError;
pub use executor::{
    ConfirmedSwap, ExecutionContext, ExecutionStep, ExecutorMetrics, SwapExecutor, SwapReport,
    SwapState,
};
pub use intent::{Currency, SwapIntent, TokenIn};
pub use logging::{init_logging, LogEmoji};
pub use message::{Coin, MsgSwapExactAmountIn, SwapAmountInRoute};
pub use sequencer::{SubmissionPermit, SubmissionSequencer};
pub use verification::verify_swap_events;
