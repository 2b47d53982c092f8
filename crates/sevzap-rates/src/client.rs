//! CBR daily rates client (cbr-xml-daily.ru JSON mirror).

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use sevzap_core::http::{build_client, fetch_json};
use sevzap_core::{Config, UpstreamError};
use tracing::instrument;

pub(crate) const SOURCE_NAME: &str = "cbr";

/// Top-level payload of `daily_json.js`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CbrDaily {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub previous_date: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Currency code to record. A `null` record is skipped downstream.
    #[serde(default)]
    pub valute: BTreeMap<String, Option<CbrRecord>>,
}

/// One currency as published by the bank.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CbrRecord {
    #[serde(default)]
    pub char_code: Option<String>,
    #[serde(default)]
    pub nominal: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub previous: Option<f64>,
}

pub struct CbrClient {
    client: Arc<Client>,
    base_url: String,
}

impl CbrClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, UpstreamError> {
        Ok(Self {
            client: Arc::new(build_client(timeout, user_agent)?),
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        Self::new(
            config.sources.rates_url.clone(),
            Duration::from_secs(config.http.rates_timeout_secs),
            &config.http.user_agent,
        )
    }

    /// Fetch today's full table.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_daily(&self) -> Result<CbrDaily, UpstreamError> {
        let daily: CbrDaily = fetch_json(
            &self.client,
            SOURCE_NAME,
            &self.base_url,
            &[] as &[(&str, &str)],
        )
        .await?;
        tracing::debug!("CBR table has {} currencies", daily.valute.len());
        Ok(daily)
    }
}
