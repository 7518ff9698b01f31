//! Service Configuration Module
//!
//! Loads swap service configuration from TOML with an optional
//! environment-specific overlay and `GAMM_`-prefixed environment variables.
//!
//! Precedence, lowest first: built-in defaults, base file, overlay file
//! (`<base dir>/environments/<env>.toml`), environment variables
//! (`GAMM_EXECUTOR__CONFIRMATION_TIMEOUT_MS=60000`).

use crate::protocol::{GAMM_MODULE, MSG_SWAP_EXACT_AMOUNT_IN};
use crate::service;
use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "GAMM";

/// Main service configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    pub global: GlobalConfig,
    pub pool_query: PoolQuerySettings,
    pub executor: ExecutorSettings,
}

/// Global configuration settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct GlobalConfig {
    pub service_name: String,
    /// `EnvFilter` directive, e.g. `info` or `info,gamm_math=debug`
    pub log_level: String,
    pub json_logs: bool,
    pub enable_metrics: bool,
}

/// Pool state query settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PoolQuerySettings {
    pub query_timeout_ms: u64,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

/// Swap executor settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ExecutorSettings {
    pub confirmation_timeout_ms: u64,
    /// Expected `action` attribute of the confirmed swap's message event
    pub swap_action: String,
    /// Expected `module` attribute of the confirmed swap's message event
    pub swap_module: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            service_name: "swap-executor".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            enable_metrics: true,
        }
    }
}

impl Default for PoolQuerySettings {
    fn default() -> Self {
        Self {
            query_timeout_ms: service::pool_query::QUERY_TIMEOUT_MS,
            max_retries: service::pool_query::MAX_RETRIES,
            initial_backoff_ms: service::pool_query::INITIAL_BACKOFF_MS,
            max_backoff_ms: service::pool_query::MAX_BACKOFF_MS,
        }
    }
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            confirmation_timeout_ms: service::executor::CONFIRMATION_TIMEOUT_MS,
            swap_action: MSG_SWAP_EXACT_AMOUNT_IN.to_string(),
            swap_module: GAMM_MODULE.to_string(),
        }
    }
}

impl PoolQuerySettings {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }
}

impl ExecutorSettings {
    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_millis(self.confirmation_timeout_ms)
    }
}

impl ServiceConfig {
    /// Load configuration from files with environment overrides
    pub fn load(base_path: Option<&Path>, environment: Option<&str>) -> Result<Self> {
        let base = base_path.unwrap_or(Path::new("config/swap.toml"));

        let mut builder = Config::builder()
            .add_source(Config::try_from(&ServiceConfig::default())?)
            .add_source(File::from(base).required(true));

        if let Some(env) = environment {
            let env_file = base
                .parent()
                .unwrap_or(Path::new("."))
                .join("environments")
                .join(format!("{}.toml", env));

            if env_file.exists() {
                info!("Loading environment config: {:?}", env_file);
                builder = builder.add_source(File::from(env_file));
            } else {
                warn!("Environment config not found: {:?}", env_file);
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from an embedded TOML string
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(&ServiceConfig::default())?)
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.global.log_level.trim().is_empty() {
            bail!("global.log_level must not be empty");
        }
        if self.pool_query.query_timeout_ms == 0 {
            bail!("pool_query.query_timeout_ms must be positive");
        }
        if self.pool_query.max_backoff_ms < self.pool_query.initial_backoff_ms {
            bail!(
                "pool_query.max_backoff_ms ({}) must be >= initial_backoff_ms ({})",
                self.pool_query.max_backoff_ms,
                self.pool_query.initial_backoff_ms
            );
        }
        if self.executor.confirmation_timeout_ms == 0 {
            bail!("executor.confirmation_timeout_ms must be positive");
        }
        if !self.executor.swap_action.starts_with('/') {
            bail!(
                "executor.swap_action must be a message type URL, got '{}'",
                self.executor.swap_action
            );
        }
        if self.executor.swap_module.is_empty() {
            bail!("executor.swap_module must not be empty");
        }
        Ok(())
    }
}

/// Convenience function to load configuration from the default location
pub fn load_config(environment: Option<&str>) -> Result<ServiceConfig> {
    ServiceConfig::load(None, environment)
}
