//! # GAMM Swap Configuration
//!
//! Configuration loading and protocol constants for the swap services.
//!
//! ## Features
//!
//! - **Protocol Constants**: swap message type URL, event and attribute names
//! - **Service Defaults**: timeouts, retry counts and backoff
//! - **Layered Loading**: TOML base file, environment overlay, `GAMM_` variables
//!
//! ## Usage
//!
//! ```rust
//! use gamm_config::{protocol, ServiceConfig};
//!
//! let config = ServiceConfig::from_toml_str("[executor]\nconfirmation_timeout_ms = 60000\n")?;
//! assert_eq!(config.executor.swap_action, protocol::MSG_SWAP_EXACT_AMOUNT_IN);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod protocol;
pub mod service;
pub mod service_config;

pub use service_config::{
    load_config, ExecutorSettings, GlobalConfig, PoolQuerySettings, ServiceConfig,
};
