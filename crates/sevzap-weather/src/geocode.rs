//! Forward geocoding: city name prefix to candidate places.
//! Uses the Open-Meteo geocoding search. Results are not cached.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use sevzap_core::http::{build_client, fetch_json};
use sevzap_core::{Config, UpstreamError};
use tracing::instrument;

const SOURCE_NAME: &str = "open-meteo-geocoding";

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<SearchResult>>,
}

/// Every field is optional upstream; entries are checked one by one.
#[derive(Debug, Deserialize)]
struct SearchResult {
    name: Option<String>,
    country: Option<String>,
    admin1: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// One candidate place for a name lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityMatch {
    pub name: String,
    pub country: Option<String>,
    /// First-level administrative area (oblast, republic, state)
    pub region: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl SearchResult {
    /// `None` when the entry lacks a name or coordinates.
    fn into_match(self) -> Option<CityMatch> {
        Some(CityMatch {
            name: self.name?,
            country: self.country,
            region: self.admin1,
            lat: self.latitude?,
            lon: self.longitude?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: Arc<Client>,
    base_url: String,
}

impl GeocodingClient {
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
            config.sources.geocoding_url.clone(),
            Duration::from_secs(config.http.geocoding_timeout_secs),
            &config.http.user_agent,
        )
    }

    /// Look up places whose name starts with `prefix`.
    ///
    /// A blank prefix (or a zero `count`) returns an empty list without
    /// contacting the upstream.
    #[instrument(skip(self), level = "info")]
    pub async fn search_cities(
        &self,
        prefix: &str,
        count: usize,
        language: &str,
    ) -> Result<Vec<CityMatch>, UpstreamError> {
        let prefix = prefix.trim();
        if prefix.is_empty() || count == 0 {
            return Ok(Vec::new());
        }

        let count_param = count.to_string();
        let query = [
            ("name", prefix),
            ("count", count_param.as_str()),
            ("language", language),
            ("format", "json"),
        ];
        let response: SearchResponse =
            fetch_json(&self.client, SOURCE_NAME, &self.base_url, &query).await?;

        let matches: Vec<CityMatch> = response
            .results
            .unwrap_or_default()
            .into_iter()
            .filter_map(SearchResult::into_match)
            .take(count)
            .collect();

        tracing::debug!("Geocoding {:?} matched {} places", prefix, matches.len());
        Ok(matches)
    }
}
