//! Shared foundation for the Sevzap aggregators: configuration, error
//! taxonomy, HTTP fetch helpers and the TTL cache.

pub mod cache;
pub mod config;
pub mod error;
pub mod http;

pub use cache::{CacheEntry, Clock, ManualClock, SystemClock, TtlCache};
pub use config::{
    CacheConfig, Config, FeedConfig, GeocodingConfig, HttpConfig, NewsConfig, SourcesConfig,
    ValidationResult,
};
pub use error::{AppError, ConfigError, InputError, ReqwestErrorExt, UpstreamError};

use anyhow::Result;

/// Initialize logging for the process
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::info!("Sevzap core initialized");
    Ok(())
}
