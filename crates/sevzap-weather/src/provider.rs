//! Open-Meteo forecast client.
//!
//! The upstream answers with column-oriented blocks: every requested field
//! is a parallel array indexed like `time`. Everything here is optional;
//! reshaping into rows happens in [`crate::reshape`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use sevzap_core::http::{build_client, fetch_json};
use sevzap_core::{Config, UpstreamError};
use tracing::instrument;

use crate::location::Coordinates;
use crate::types::Horizon;

pub(crate) const SOURCE_NAME: &str = "open-meteo";

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,\
precipitation,weather_code,wind_speed_10m,wind_direction_10m";

const HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,\
precipitation,precipitation_probability,weather_code,wind_speed_10m,wind_direction_10m";

const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,\
precipitation_sum,wind_speed_10m_max,sunrise,sunset";

/// What to ask the upstream for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastRequest {
    /// Current conditions only
    Current,
    /// Current conditions plus today's daily summary
    Today,
    /// Current conditions plus a forecast of the given length
    Forecast(Horizon),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub current: Option<CurrentBlock>,
    #[serde(default)]
    pub hourly: Option<HourlyBlock>,
    #[serde(default)]
    pub daily: Option<DailyBlock>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentBlock {
    pub time: Option<String>,
    pub temperature_2m: Option<f64>,
    pub relative_humidity_2m: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub precipitation: Option<f64>,
    pub weather_code: Option<i32>,
    pub wind_speed_10m: Option<f64>,
    pub wind_direction_10m: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HourlyBlock {
    pub time: Vec<String>,
    pub temperature_2m: Vec<Option<f64>>,
    pub relative_humidity_2m: Vec<Option<f64>>,
    pub apparent_temperature: Vec<Option<f64>>,
    pub precipitation: Vec<Option<f64>>,
    pub precipitation_probability: Vec<Option<f64>>,
    pub weather_code: Vec<Option<i32>>,
    pub wind_speed_10m: Vec<Option<f64>>,
    pub wind_direction_10m: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DailyBlock {
    pub time: Vec<String>,
    pub weather_code: Vec<Option<i32>>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
    pub precipitation_sum: Vec<Option<f64>>,
    pub wind_speed_10m_max: Vec<Option<f64>>,
    pub sunrise: Vec<Option<String>>,
    pub sunset: Vec<Option<String>>,
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
}

impl WeatherProvider {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, UpstreamError> {
        let client = build_client(timeout, user_agent)?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        Self::new(
            config.sources.weather_url.clone(),
            Duration::from_secs(config.http.weather_timeout_secs),
            &config.http.user_agent,
        )
    }

    /// One upstream call for one location.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch(
        &self,
        coords: Coordinates,
        request: ForecastRequest,
    ) -> Result<ForecastResponse, UpstreamError> {
        let query = build_query(coords, request);
        fetch_json(&self.client, SOURCE_NAME, &self.base_url, &query).await
    }
}

fn build_query(coords: Coordinates, request: ForecastRequest) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("latitude", coords.latitude.to_string()),
        ("longitude", coords.longitude.to_string()),
        ("timezone", "auto".to_string()),
    ];
    // The weekly view shows daily rows only.
    if request != ForecastRequest::Forecast(Horizon::Week) {
        query.push(("current", CURRENT_FIELDS.to_string()));
    }

    match request {
        ForecastRequest::Current => {}
        ForecastRequest::Today => {
            query.push(("daily", DAILY_FIELDS.to_string()));
            query.push(("forecast_days", "1".to_string()));
        }
        ForecastRequest::Forecast(Horizon::Day) => {
            query.push(("hourly", HOURLY_FIELDS.to_string()));
            query.push(("daily", DAILY_FIELDS.to_string()));
            query.push(("forecast_days", Horizon::Day.forecast_days().to_string()));
        }
        ForecastRequest::Forecast(Horizon::Week) => {
            query.push(("daily", DAILY_FIELDS.to_string()));
            query.push(("forecast_days", Horizon::Week.forecast_days().to_string()));
        }
    }

    query
}
