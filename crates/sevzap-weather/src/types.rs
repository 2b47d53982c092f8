use serde::{Deserialize, Serialize};
use sevzap_core::{AppError, InputError, UpstreamError};

/// Code used when the upstream omits `weather_code`.
pub const MISSING_CODE: i32 = -1;

/// Weather condition categories mapped from WMO codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    PartlyCloudy,
    Overcast,
    Fog,
    Drizzle,
    FreezingDrizzle,
    Rain,
    FreezingRain,
    Snow,
    Showers,
    HeavySnow,
    Thunderstorm,
    /// No rule matched
    Unknown,
}

/// Ordered classification rules; the first set containing the code wins.
const CONDITION_RULES: &[(&[i32], WeatherCondition)] = &[
    (&[0], WeatherCondition::Clear),
    (&[1, 2], WeatherCondition::PartlyCloudy),
    (&[3], WeatherCondition::Overcast),
    (&[45, 48], WeatherCondition::Fog),
    (&[51, 53, 55], WeatherCondition::Drizzle),
    (&[56, 57], WeatherCondition::FreezingDrizzle),
    (&[61, 63, 65], WeatherCondition::Rain),
    (&[66, 67], WeatherCondition::FreezingRain),
    (&[71, 73, 77], WeatherCondition::Snow),
    (&[80, 81, 82], WeatherCondition::Showers),
    (&[75, 85, 86], WeatherCondition::HeavySnow),
    (&[95, 96, 99], WeatherCondition::Thunderstorm),
];

impl WeatherCondition {
    /// Convert WMO weather code to WeatherCondition
    /// See: https://open-meteo.com/en/docs#weathervariables
    pub fn from_wmo_code(code: i32) -> Self {
        CONDITION_RULES
            .iter()
            .find(|(codes, _)| codes.contains(&code))
            .map(|(_, condition)| *condition)
            .unwrap_or(Self::Unknown)
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Clear => "☀️",
            Self::PartlyCloudy => "🌤️",
            Self::Overcast => "☁️",
            Self::Fog => "🌫️",
            Self::Drizzle => "🌦️",
            Self::FreezingDrizzle => "🌧️",
            Self::Rain => "🌧️",
            Self::FreezingRain => "🧊",
            Self::Snow => "🌨️",
            Self::Showers => "🌦️",
            Self::HeavySnow => "❄️",
            Self::Thunderstorm => "⛈️",
            Self::Unknown => "🌡️",
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear sky",
            Self::PartlyCloudy => "Partly cloudy",
            Self::Overcast => "Overcast",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::FreezingDrizzle => "Freezing drizzle",
            Self::Rain => "Rain",
            Self::FreezingRain => "Freezing rain",
            Self::Snow => "Snow",
            Self::Showers => "Rain showers",
            Self::HeavySnow => "Heavy snow",
            Self::Thunderstorm => "Thunderstorm",
            Self::Unknown => "Weather",
        }
    }

    /// CSS animation class consumed by the presentation layer
    pub fn animation_class(&self) -> &'static str {
        match self {
            Self::Clear => "sunny",
            Self::PartlyCloudy => "partly-cloudy",
            Self::Overcast => "cloudy",
            Self::Fog => "fog",
            Self::Drizzle => "drizzle",
            Self::FreezingDrizzle => "freezing",
            Self::Rain => "rain",
            Self::FreezingRain => "freezing",
            Self::Snow => "snow",
            Self::Showers => "showers",
            Self::HeavySnow => "blizzard",
            Self::Thunderstorm => "storm",
            Self::Unknown => "calm",
        }
    }

    /// `(icon, description, animation_class)`
    pub fn display(&self) -> (&'static str, &'static str, &'static str) {
        (self.icon(), self.description(), self.animation_class())
    }
}

/// Condition code plus the display fields derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionDisplay {
    pub code: Option<i32>,
    pub condition: WeatherCondition,
    pub icon: String,
    pub description: String,
    pub animation_class: String,
}

impl ConditionDisplay {
    pub fn from_code(code: Option<i32>) -> Self {
        let condition = WeatherCondition::from_wmo_code(code.unwrap_or(MISSING_CODE));
        Self {
            code,
            condition,
            icon: condition.icon().to_string(),
            description: condition.description().to_string(),
            animation_class: condition.animation_class().to_string(),
        }
    }
}

/// Point-in-time conditions (current or one hour of a forecast).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub time: Option<String>,
    pub temp: Option<f64>,
    pub feels: Option<f64>,
    pub humidity: Option<f64>,
    pub precip: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precip_probability: Option<f64>,
    pub wind: Option<f64>,
    pub wind_direction: Option<f64>,
    #[serde(flatten)]
    pub display: ConditionDisplay,
}

/// One hour of a forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPoint {
    /// Position in the upstream series
    pub index: usize,
    /// Local hour of day parsed from `time`
    pub hour: Option<u32>,
    #[serde(flatten)]
    pub reading: Reading,
}

/// One day of a forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: Option<String>,
    pub temp_max: Option<f64>,
    pub temp_min: Option<f64>,
    pub precip_sum: Option<f64>,
    pub wind_max: Option<f64>,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    #[serde(flatten)]
    pub display: ConditionDisplay,
}

/// Outcome of fetching one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CityOutcome {
    Ok {
        current: Reading,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        today: Option<DailyPoint>,
    },
    Failed {
        error: String,
    },
}

/// Registry city with its current conditions or the reason they are missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySnapshot {
    pub city: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(flatten)]
    pub outcome: CityOutcome,
}

impl CitySnapshot {
    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, CityOutcome::Ok { .. })
    }

    pub fn current(&self) -> Option<&Reading> {
        match &self.outcome {
            CityOutcome::Ok { current, .. } => Some(current),
            CityOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            CityOutcome::Ok { .. } => None,
            CityOutcome::Failed { error } => Some(error),
        }
    }
}

/// Forecast length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Horizon {
    /// Today, hour by hour
    Day,
    /// Seven days, daily only
    Week,
}

impl Horizon {
    pub fn forecast_days(&self) -> u8 {
        match self {
            Self::Day => 1,
            Self::Week => 7,
        }
    }
}

/// Forecast for arbitrary coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub lat: f64,
    pub lon: f64,
    pub horizon: Horizon,
    pub timezone: Option<String>,
    pub current: Option<Reading>,
    pub hourly: Vec<HourlyPoint>,
    pub daily: Vec<DailyPoint>,
}

/// Weather request errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl From<WeatherError> for AppError {
    fn from(e: WeatherError) -> Self {
        match e {
            WeatherError::Input(e) => AppError::Input(e),
            WeatherError::Upstream(e) => AppError::Upstream(e),
        }
    }
}
