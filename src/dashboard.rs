//! Single entry point for the presentation layer.
//!
//! Owns one aggregator per upstream and exposes every read the pages and
//! JSON endpoints need. Errors come back as [`AppError`] so callers can tell
//! bad parameters (`is_input_error`) from upstream trouble.

use serde::{Deserialize, Serialize};
use sevzap_core::{AppError, Config};
use sevzap_news::{Headline, NewsAggregator};
use sevzap_rates::{RateItem, RateTable, RatesAggregator};
use sevzap_weather::{
    City, CityMatch, CitySnapshot, ForecastResult, GeocodingClient, Horizon, Reading,
    WeatherAggregator,
};

/// Currencies shown on the overview.
pub const OVERVIEW_CURRENCIES: [&str; 3] = ["USD", "EUR", "CNY"];

/// Headline count on the overview.
pub const OVERVIEW_HEADLINES: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}

/// Everything the home page shows, fetched in one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub weather: Vec<CitySnapshot>,
    pub rates: RateTable,
    pub headlines: Vec<Headline>,
}

pub struct Dashboard {
    config: Config,
    weather: WeatherAggregator,
    geocoding: GeocodingClient,
    rates: RatesAggregator,
    news: NewsAggregator,
}

impl Dashboard {
    /// Build every aggregator from a validated configuration.
    ///
    /// # Errors
    ///
    /// `AppError::Config` when validation reports errors, `AppError::Upstream`
    /// when an HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let (config, _) = config.validated()?;

        let dashboard = Self {
            weather: WeatherAggregator::from_config(&config)?,
            geocoding: GeocodingClient::from_config(&config)?,
            rates: RatesAggregator::from_config(&config)?,
            news: NewsAggregator::from_config(&config)?,
            config,
        };

        tracing::info!(
            "Dashboard ready: {} cities, {} feeds",
            dashboard.weather.cities().len(),
            dashboard.news.feeds().len()
        );
        Ok(dashboard)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cities(&self) -> &[City] {
        self.weather.cities()
    }

    pub fn health(&self) -> Health {
        Health {
            status: "ok".to_string(),
        }
    }

    /// Current conditions for every registry city. Never fails as a whole.
    pub async fn weather_snapshot(&self) -> Vec<CitySnapshot> {
        self.weather.snapshot().await
    }

    /// Today's hourly forecast for `lat`/`lon` query parameters.
    pub async fn weather_forecast(
        &self,
        lat: Option<&str>,
        lon: Option<&str>,
    ) -> Result<ForecastResult, AppError> {
        Ok(self
            .weather
            .forecast_from_params(lat, lon, Horizon::Day)
            .await?)
    }

    /// Seven-day daily forecast for `lat`/`lon` query parameters.
    pub async fn weather_forecast_weekly(
        &self,
        lat: Option<&str>,
        lon: Option<&str>,
    ) -> Result<ForecastResult, AppError> {
        Ok(self
            .weather
            .forecast_from_params(lat, lon, Horizon::Week)
            .await?)
    }

    pub async fn current_weather(
        &self,
        lat: Option<&str>,
        lon: Option<&str>,
    ) -> Result<Reading, AppError> {
        Ok(self.weather.current_from_params(lat, lon).await?)
    }

    /// Whole table, or just `codes` (unknown codes are left out).
    pub async fn rates(&self, codes: Option<&[String]>) -> Result<RateTable, AppError> {
        Ok(self.rates.rates(codes).await?)
    }

    pub async fn rates_search(&self, query: &str) -> Result<Vec<RateItem>, AppError> {
        Ok(self.rates.search(query).await?)
    }

    /// Headlines; `None` uses the configured default limit.
    pub async fn headlines(&self, limit: Option<usize>) -> Result<Vec<Headline>, AppError> {
        let limit = limit.unwrap_or(self.config.news.default_limit);
        Ok(self.news.headlines(limit).await?)
    }

    pub async fn city_search(&self, prefix: &str) -> Result<Vec<CityMatch>, AppError> {
        let geocoding = &self.config.geocoding;
        Ok(self
            .geocoding
            .search_cities(prefix, geocoding.count, &geocoding.language)
            .await?)
    }

    /// Weather, the main currencies and a few headlines.
    ///
    /// Rates or news failing leaves that section empty instead of failing
    /// the page.
    pub async fn overview(&self) -> Overview {
        let weather = self.weather_snapshot().await;

        let codes: Vec<String> = OVERVIEW_CURRENCIES.iter().map(|c| c.to_string()).collect();
        let rates = match self.rates(Some(codes.as_slice())).await {
            Ok(rates) => rates,
            Err(e) => {
                tracing::warn!("Overview without rates: {}", e);
                RateTable::default()
            }
        };

        let headlines = match self.headlines(Some(OVERVIEW_HEADLINES)).await {
            Ok(headlines) => headlines,
            Err(e) => {
                tracing::warn!("Overview without headlines: {}", e);
                Vec::new()
            }
        };

        Overview {
            weather,
            rates,
            headlines,
        }
    }
}
