use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::cache::ttl_from_secs;
use crate::error::{AppError, ConfigError};

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream endpoints
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Cache lifetimes
    #[serde(default)]
    pub cache: CacheConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// City autocomplete settings
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Headline settings
    #[serde(default)]
    pub news: NewsConfig,
}

/// A single news feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    pub url: String,
    /// Overrides the feed's own title as the headline source label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FeedConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            label: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Open-Meteo forecast endpoint
    #[serde(default = "default_weather_url")]
    pub weather_url: String,

    /// Open-Meteo geocoding search endpoint
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,

    /// Central bank daily rates JSON
    #[serde(default = "default_rates_url")]
    pub rates_url: String,

    /// News feeds, in display order
    #[serde(default = "default_feeds")]
    pub feeds: Vec<FeedConfig>,
}

fn default_weather_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".to_string()
}

fn default_rates_url() -> String {
    "https://www.cbr-xml-daily.ru/daily_json.js".to_string()
}

fn default_feeds() -> Vec<FeedConfig> {
    vec![
        FeedConfig::new("https://www.interfax.ru/rss.asp"),
        FeedConfig::new("https://tass.ru/rss/v2.xml"),
    ]
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            weather_url: default_weather_url(),
            geocoding_url: default_geocoding_url(),
            rates_url: default_rates_url(),
            feeds: default_feeds(),
        }
    }
}

/// Cache lifetimes in seconds. Zero or negative disables caching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_ttl_secs")]
    pub weather_ttl_secs: i64,
    #[serde(default = "default_ttl_secs")]
    pub rates_ttl_secs: i64,
    #[serde(default = "default_ttl_secs")]
    pub news_ttl_secs: i64,
}

fn default_ttl_secs() -> i64 {
    600
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            weather_ttl_secs: default_ttl_secs(),
            rates_ttl_secs: default_ttl_secs(),
            news_ttl_secs: default_ttl_secs(),
        }
    }
}

impl CacheConfig {
    pub fn weather_ttl(&self) -> Duration {
        ttl_from_secs(self.weather_ttl_secs)
    }

    pub fn rates_ttl(&self) -> Duration {
        ttl_from_secs(self.rates_ttl_secs)
    }

    pub fn news_ttl(&self) -> Duration {
        ttl_from_secs(self.news_ttl_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_weather_timeout")]
    pub weather_timeout_secs: u64,
    #[serde(default = "default_geocoding_timeout")]
    pub geocoding_timeout_secs: u64,
    #[serde(default = "default_rates_timeout")]
    pub rates_timeout_secs: u64,
    #[serde(default = "default_news_timeout")]
    pub news_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_weather_timeout() -> u64 {
    15
}

fn default_geocoding_timeout() -> u64 {
    12
}

fn default_rates_timeout() -> u64 {
    10
}

fn default_news_timeout() -> u64 {
    15
}

fn default_user_agent() -> String {
    format!("Sevzap/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            weather_timeout_secs: default_weather_timeout(),
            geocoding_timeout_secs: default_geocoding_timeout(),
            rates_timeout_secs: default_rates_timeout(),
            news_timeout_secs: default_news_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Maximum suggestions returned
    #[serde(default = "default_geocoding_count")]
    pub count: usize,
    /// Language for place names
    #[serde(default = "default_geocoding_language")]
    pub language: String,
}

fn default_geocoding_count() -> usize {
    7
}

fn default_geocoding_language() -> String {
    "ru".to_string()
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            count: default_geocoding_count(),
            language: default_geocoding_language(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    /// Headline count when the caller gives none
    #[serde(default = "default_news_limit")]
    pub default_limit: usize,
}

fn default_news_limit() -> usize {
    10
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            default_limit: default_news_limit(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        Ok(Self::load_from(&config_path)?)
    }

    /// Load configuration from an explicit file
    ///
    /// # Errors
    ///
    /// `ConfigError::NotFound` for a missing file, `ConfigError::ParseError`
    /// for malformed TOML, `AppError::Io` for any other read failure.
    pub fn load_from(path: &Path) -> Result<Self, AppError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(path.display().to_string()).into());
            }
            Err(e) => return Err(e.into()),
        };

        toml::from_str(&contents).map_err(|e| {
            AppError::from(ConfigError::ParseError(format!(
                "{}: {}",
                path.display(),
                e.message()
            )))
        })
    }

    /// Validate a loaded configuration
    ///
    /// Logs warnings and fails on errors.
    pub fn validated(self) -> Result<(Self, ValidationResult), ConfigError> {
        let validation = self.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((self, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        validate_url(&self.sources.weather_url, "sources.weather_url", &mut result);
        validate_url(
            &self.sources.geocoding_url,
            "sources.geocoding_url",
            &mut result,
        );
        validate_url(&self.sources.rates_url, "sources.rates_url", &mut result);

        if self.sources.feeds.is_empty() {
            result.add_warning("sources.feeds", "No news feeds configured");
        }
        for (i, feed) in self.sources.feeds.iter().enumerate() {
            validate_url(&feed.url, &format!("sources.feeds[{}].url", i), &mut result);
        }

        for (field, secs) in [
            ("cache.weather_ttl_secs", self.cache.weather_ttl_secs),
            ("cache.rates_ttl_secs", self.cache.rates_ttl_secs),
            ("cache.news_ttl_secs", self.cache.news_ttl_secs),
        ] {
            if secs <= 0 {
                result.add_warning(field, "Caching disabled (TTL is not positive)");
            }
        }

        for (field, secs) in [
            ("http.weather_timeout_secs", self.http.weather_timeout_secs),
            ("http.geocoding_timeout_secs", self.http.geocoding_timeout_secs),
            ("http.rates_timeout_secs", self.http.rates_timeout_secs),
            ("http.news_timeout_secs", self.http.news_timeout_secs),
        ] {
            if secs == 0 {
                result.add_error(field, "Timeout must be greater than 0");
            } else if secs > 60 {
                result.add_warning(field, "Timeout is unusually long (>60s)");
            }
        }

        if self.http.user_agent.trim().is_empty() {
            result.add_error("http.user_agent", "User agent must not be empty");
        }

        if self.geocoding.count == 0 {
            result.add_error("geocoding.count", "Suggestion count must be greater than 0");
        }

        if self.news.default_limit == 0 {
            result.add_warning("news.default_limit", "Default headline limit is 0");
        }

        result
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit file
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("sevzap");

        Ok(config_dir.join("config.toml"))
    }
}

/// Validate a URL field
fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.add_error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            }

            if url.host().is_none() {
                result.add_error(field_name, "URL must have a host");
            }
        }
        Err(e) => {
            result.add_error(field_name, format!("Invalid URL: {}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_default_ttls_are_ten_minutes() {
        let config = Config::default();
        assert_eq!(config.cache.weather_ttl(), Duration::from_secs(600));
        assert_eq!(config.cache.rates_ttl(), Duration::from_secs(600));
        assert_eq!(config.cache.news_ttl(), Duration::from_secs(600));
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.sources.rates_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "sources.rates_url"));
    }

    #[test]
    fn test_invalid_feed_url_scheme() {
        let mut config = Config::default();
        config.sources.feeds.push(FeedConfig::new("ftp://example.com/rss"));
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result
            .errors
            .iter()
            .any(|e| e.field == "sources.feeds[2].url" && e.message.contains("http or https")));
    }

    #[test]
    fn test_negative_ttl_is_warning_and_disables_cache() {
        let mut config = Config::default();
        config.cache.news_ttl_secs = -1;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "cache.news_ttl_secs"));
        assert_eq!(config.cache.news_ttl(), Duration::ZERO);
    }

    #[test]
    fn test_zero_timeout_is_error() {
        let mut config = Config::default();
        config.http.weather_timeout_secs = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "http.weather_timeout_secs"));
    }

    #[test]
    fn test_empty_feed_list_is_warning() {
        let mut config = Config::default();
        config.sources.feeds.clear();
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "sources.feeds"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [cache]
            weather_ttl_secs = 60

            [[sources.feeds]]
            url = "https://example.com/rss"
            label = "Example"
            "#,
        )
        .unwrap();

        assert_eq!(config.cache.weather_ttl_secs, 60);
        assert_eq!(config.cache.rates_ttl_secs, 600);
        assert_eq!(config.sources.feeds.len(), 1);
        assert_eq!(config.sources.feeds[0].label.as_deref(), Some("Example"));
        assert_eq!(config.sources.weather_url, default_weather_url());
        assert_eq!(config.geocoding.count, 7);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.news.default_limit = 20;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.news.default_limit, 20);
        assert_eq!(loaded.sources.feeds, config.sources.feeds);
    }

    #[test]
    fn test_validated_rejects_errors() {
        let mut config = Config::default();
        config.geocoding.count = 0;
        let err = config.validated().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("geocoding.count"));
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        match Config::load_from(&path) {
            Err(AppError::Config(ConfigError::NotFound(p))) => assert!(p.ends_with("absent.toml")),
            other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_load_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[cache\nweather_ttl_secs = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::ParseError(_))));
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_load_unreadable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = Config::load_from(dir.path()).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
