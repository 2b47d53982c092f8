//! Regional snapshot and per-location forecasts.

use std::fmt;

use sevzap_core::{Config, TtlCache, UpstreamError};

use crate::cities::{City, CITIES};
use crate::location::Coordinates;
use crate::provider::{ForecastRequest, WeatherProvider};
use crate::reshape::{current_reading, daily_points, hourly_points};
use crate::types::{CityOutcome, CitySnapshot, ForecastResult, Horizon, Reading, WeatherError};

/// Every city in a refresh failed. Carries the error-only snapshot so the
/// caller still gets one entry per city when nothing stale is cached.
#[derive(Debug)]
struct AllCitiesFailed(Vec<CitySnapshot>);

impl fmt::Display for AllCitiesFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "all {} cities failed", self.0.len())
    }
}

pub struct WeatherAggregator {
    provider: WeatherProvider,
    cities: Vec<City>,
    snapshot_cache: TtlCache<Vec<CitySnapshot>>,
}

impl WeatherAggregator {
    pub fn new(provider: WeatherProvider, cache: TtlCache<Vec<CitySnapshot>>) -> Self {
        Self::with_cities(provider, CITIES.to_vec(), cache)
    }

    pub fn with_cities(
        provider: WeatherProvider,
        cities: Vec<City>,
        cache: TtlCache<Vec<CitySnapshot>>,
    ) -> Self {
        Self {
            provider,
            cities,
            snapshot_cache: cache,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        let provider = WeatherProvider::from_config(config)?;
        let cache = TtlCache::new("weather snapshot", config.cache.weather_ttl());
        Ok(Self::new(provider, cache))
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// Current conditions for every registry city, in registry order.
    ///
    /// A city whose fetch fails carries an error marker; the others are
    /// unaffected. The whole list is cached as one entry.
    pub async fn snapshot(&self) -> Vec<CitySnapshot> {
        match self
            .snapshot_cache
            .get_or_refresh(|| self.fetch_all_cities())
            .await
        {
            Ok(snapshot) => snapshot,
            Err(AllCitiesFailed(snapshot)) => snapshot,
        }
    }

    async fn fetch_all_cities(&self) -> Result<Vec<CitySnapshot>, AllCitiesFailed> {
        let mut out = Vec::with_capacity(self.cities.len());
        for city in &self.cities {
            out.push(self.fetch_city(city).await);
        }

        let failed = out.iter().filter(|c| !c.is_ok()).count();
        if failed > 0 {
            tracing::info!("Weather snapshot: {} of {} cities failed", failed, out.len());
        }
        if !out.is_empty() && failed == out.len() {
            return Err(AllCitiesFailed(out));
        }
        Ok(out)
    }

    async fn fetch_city(&self, city: &City) -> CitySnapshot {
        let outcome = match self
            .provider
            .fetch(city.coordinates(), ForecastRequest::Today)
            .await
        {
            Ok(response) => match response.current {
                Some(current) => CityOutcome::Ok {
                    current: current_reading(&current),
                    today: response
                        .daily
                        .as_ref()
                        .and_then(|d| daily_points(d).into_iter().next()),
                },
                None => CityOutcome::Failed {
                    error: "response has no current block".to_string(),
                },
            },
            Err(e) => {
                tracing::warn!("Weather fetch failed for {}: {}", city.name, e);
                CityOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        CitySnapshot {
            city: city.name.to_string(),
            lat: city.lat,
            lon: city.lon,
            outcome,
        }
    }

    /// Forecast for arbitrary coordinates. Not cached.
    pub async fn forecast(
        &self,
        coords: Coordinates,
        horizon: Horizon,
    ) -> Result<ForecastResult, WeatherError> {
        let response = self
            .provider
            .fetch(coords, ForecastRequest::Forecast(horizon))
            .await?;

        let hourly = match horizon {
            Horizon::Day => response
                .hourly
                .as_ref()
                .map(hourly_points)
                .unwrap_or_default(),
            Horizon::Week => Vec::new(),
        };

        Ok(ForecastResult {
            lat: coords.latitude,
            lon: coords.longitude,
            horizon,
            timezone: response.timezone,
            current: response.current.as_ref().map(current_reading),
            hourly,
            daily: response
                .daily
                .as_ref()
                .map(daily_points)
                .unwrap_or_default(),
        })
    }

    /// Forecast from raw `lat`/`lon` parameters.
    pub async fn forecast_from_params(
        &self,
        lat: Option<&str>,
        lon: Option<&str>,
        horizon: Horizon,
    ) -> Result<ForecastResult, WeatherError> {
        let coords = Coordinates::parse(lat, lon)?;
        self.forecast(coords, horizon).await
    }

    /// Current conditions for arbitrary coordinates. Not cached.
    pub async fn current_at(&self, coords: Coordinates) -> Result<Reading, WeatherError> {
        let response = self.provider.fetch(coords, ForecastRequest::Current).await?;
        let current = response.current.ok_or_else(|| {
            UpstreamError::invalid_response(
                crate::provider::SOURCE_NAME,
                "response has no current block",
            )
        })?;
        Ok(current_reading(&current))
    }

    pub async fn current_from_params(
        &self,
        lat: Option<&str>,
        lon: Option<&str>,
    ) -> Result<Reading, WeatherError> {
        let coords = Coordinates::parse(lat, lon)?;
        self.current_at(coords).await
    }
}
