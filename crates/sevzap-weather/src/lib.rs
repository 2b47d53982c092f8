//! Weather aggregation for the North-West region.
//!
//! Current conditions for a fixed city registry, forecasts for arbitrary
//! coordinates and a city name lookup, all backed by Open-Meteo.

pub mod aggregator;
pub mod cities;
pub mod geocode;
pub mod location;
pub mod provider;
pub mod reshape;
pub mod types;

pub use aggregator::WeatherAggregator;
pub use cities::{City, CITIES};
pub use geocode::{CityMatch, GeocodingClient};
pub use location::Coordinates;
pub use provider::{ForecastRequest, WeatherProvider};
pub use types::*;
