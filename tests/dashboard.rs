//! End-to-end checks of the dashboard facade against mock upstreams.

use sevzap::{AppError, Config, Dashboard, OVERVIEW_HEADLINES};
use sevzap_core::FeedConfig;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.sources.weather_url = format!("{}/v1/forecast", server.uri());
    config.sources.geocoding_url = format!("{}/v1/search", server.uri());
    config.sources.rates_url = format!("{}/daily_json.js", server.uri());
    config.sources.feeds = vec![
        FeedConfig::new(format!("{}/rss/interfax", server.uri())),
        FeedConfig::new(format!("{}/rss/tass", server.uri())),
    ];
    config.http.weather_timeout_secs = 5;
    config.http.rates_timeout_secs = 5;
    config.http.news_timeout_secs = 5;
    config.http.geocoding_timeout_secs = 5;
    config
}

fn forecast_body() -> serde_json::Value {
    serde_json::json!({
        "timezone": "Europe/Moscow",
        "current": {
            "time": "2024-05-17T12:00",
            "temperature_2m": 12.0,
            "apparent_temperature": 10.5,
            "precipitation": 0.0,
            "weather_code": 2,
            "wind_speed_10m": 5.5,
            "wind_direction_10m": 200.0
        },
        "daily": {
            "time": ["2024-05-17"],
            "weather_code": [2],
            "temperature_2m_max": [15.0],
            "temperature_2m_min": [6.0]
        }
    })
}

fn rates_body() -> serde_json::Value {
    serde_json::json!({
        "Date": "2024-05-17T11:30:00+03:00",
        "Valute": {
            "USD": {"CharCode": "USD", "Nominal": 1, "Name": "Доллар США", "Value": 92.5, "Previous": 90.0},
            "EUR": {"CharCode": "EUR", "Nominal": 1, "Name": "Евро", "Value": 99.0, "Previous": 99.5},
            "CNY": {"CharCode": "CNY", "Nominal": 1, "Name": "Китайский юань", "Value": 12.7, "Previous": 12.6},
            "GBP": {"CharCode": "GBP", "Nominal": 1, "Name": "Фунт стерлингов", "Value": 115.0, "Previous": 114.0}
        }
    })
}

fn rss(title: &str, items: usize) -> String {
    let mut xml = format!("<rss version=\"2.0\"><channel><title>{}</title>", title);
    for i in 0..items {
        xml.push_str(&format!(
            "<item><title>{title} {i}</title><link>https://news.example/{title}/{i}</link></item>"
        ));
    }
    xml.push_str("</channel></rss>");
    xml
}

async fn mount_forecast(server: &MockServer) {
    // Murmansk fails; mounted first so it wins over the catch-all below.
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "68.973"))
        .respond_with(ResponseTemplate::new(500))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(server)
        .await;
}

async fn mount_rates(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/daily_json.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rates_body()))
        .mount(server)
        .await;
}

async fn mount_feeds(server: &MockServer) {
    for (route, title) in [("/rss/interfax", "Interfax"), ("/rss/tass", "TASS")] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(rss(title, 10)))
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_snapshot_covers_every_city_in_order() {
    let server = MockServer::start().await;
    mount_forecast(&server).await;
    let dashboard = Dashboard::new(config_for(&server)).unwrap();

    let snapshot = dashboard.weather_snapshot().await;

    let names: Vec<_> = snapshot.iter().map(|c| c.city.as_str()).collect();
    let registry: Vec<_> = dashboard.cities().iter().map(|c| c.name).collect();
    assert_eq!(names, registry);
    assert_eq!(snapshot.len(), 6);

    let failed: Vec<_> = snapshot.iter().filter(|c| !c.is_ok()).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].city, "Murmansk");

    let json = serde_json::to_value(&snapshot).unwrap();
    assert!(json[2]["error"].is_string());
    assert_eq!(json[0]["current"]["temp"], 12.0);
    assert_eq!(json[0]["current"]["animation_class"], "partly-cloudy");
}

#[tokio::test]
async fn test_forecast_input_errors_are_flagged() {
    let server = MockServer::start().await;
    let dashboard = Dashboard::new(config_for(&server)).unwrap();

    let err = dashboard
        .weather_forecast(None, Some("30.3"))
        .await
        .unwrap_err();
    assert!(err.is_input_error());
    assert_eq!(err.user_message(), "A required parameter is missing.");
    assert_eq!(err.to_string(), "Invalid request: Missing required parameter: lat");

    let err = dashboard
        .weather_forecast_weekly(Some("59.9"), Some("east"))
        .await
        .unwrap_err();
    assert!(err.is_input_error());

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_weekly_forecast_and_current_weather() {
    let server = MockServer::start().await;
    mount_forecast(&server).await;
    let dashboard = Dashboard::new(config_for(&server)).unwrap();

    let weekly = dashboard
        .weather_forecast_weekly(Some("59.9386"), Some("30.3141"))
        .await
        .unwrap();
    assert!(weekly.hourly.is_empty());
    assert_eq!(weekly.daily[0].temp_max, Some(15.0));

    let current = dashboard
        .current_weather(Some("59.9386"), Some("30.3141"))
        .await
        .unwrap();
    assert_eq!(current.feels, Some(10.5));
}

#[tokio::test]
async fn test_upstream_failure_is_not_an_input_error() {
    let server = MockServer::start().await;
    mount_forecast(&server).await;
    let dashboard = Dashboard::new(config_for(&server)).unwrap();

    let err = dashboard
        .weather_forecast(Some("68.973"), Some("33.0925"))
        .await
        .unwrap_err();

    assert!(!err.is_input_error());
    assert!(matches!(err, AppError::Upstream(_)));
}

#[tokio::test]
async fn test_rates_subset_and_search() {
    let server = MockServer::start().await;
    mount_rates(&server).await;
    let dashboard = Dashboard::new(config_for(&server)).unwrap();

    let codes = vec!["USD".to_string(), "ZZZ".to_string()];
    let table = dashboard.rates(Some(codes.as_slice())).await.unwrap();
    assert_eq!(table.rates.len(), 1);
    assert_eq!(table.updated_at, "17.05.2024 11:30 UTC+03:00");
    let usd = &table.rates["USD"];
    assert!((usd.change.unwrap() - 2.5).abs() < 1e-9);

    let found = dashboard.rates_search("юань").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].code, "CNY");
    assert_eq!(found[0].symbol, "¥");
}

#[tokio::test]
async fn test_headlines_use_default_limit() {
    let server = MockServer::start().await;
    mount_feeds(&server).await;
    let dashboard = Dashboard::new(config_for(&server)).unwrap();

    let headlines = dashboard.headlines(None).await.unwrap();

    assert_eq!(headlines.len(), 10);
    assert!(headlines.iter().any(|h| h.source == "Interfax"));
    assert!(headlines.iter().any(|h| h.source == "TASS"));
}

#[tokio::test]
async fn test_overview_bundles_all_sections() {
    let server = MockServer::start().await;
    mount_forecast(&server).await;
    mount_rates(&server).await;
    mount_feeds(&server).await;
    let dashboard = Dashboard::new(config_for(&server)).unwrap();

    let overview = dashboard.overview().await;

    assert_eq!(overview.weather.len(), 6);
    let codes: Vec<_> = overview.rates.rates.keys().map(String::as_str).collect();
    assert_eq!(codes, vec!["CNY", "EUR", "USD"]);
    assert_eq!(overview.headlines.len(), OVERVIEW_HEADLINES);
}

#[tokio::test]
async fn test_overview_degrades_when_rates_and_news_fail() {
    let server = MockServer::start().await;
    mount_forecast(&server).await;
    Mock::given(method("GET"))
        .and(path("/daily_json.js"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    // Feeds are not mounted and answer 404.
    let dashboard = Dashboard::new(config_for(&server)).unwrap();

    let overview = dashboard.overview().await;

    assert_eq!(overview.weather.len(), 6);
    assert!(overview.rates.rates.is_empty());
    assert!(overview.headlines.is_empty());
}

#[tokio::test]
async fn test_city_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("count", "7"))
        .and(query_param("language", "ru"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{"name": "Мурманск", "country": "Россия", "admin1": "Мурманская область",
                         "latitude": 68.97917, "longitude": 33.09251}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    let dashboard = Dashboard::new(config_for(&server)).unwrap();

    assert!(dashboard.city_search("  ").await.unwrap().is_empty());
    let matches = dashboard.city_search("Мурм").await.unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].region.as_deref(), Some("Мурманская область"));
}

#[tokio::test]
async fn test_health() {
    let server = MockServer::start().await;
    let dashboard = Dashboard::new(config_for(&server)).unwrap();

    let json = serde_json::to_value(dashboard.health()).unwrap();
    assert_eq!(json, serde_json::json!({"status": "ok"}));
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = Config::default();
    config.sources.rates_url = "not a url".to_string();

    match Dashboard::new(config) {
        Err(AppError::Config(e)) => assert!(e.to_string().contains("sources.rates_url")),
        Err(other) => panic!("expected config error, got {}", other),
        Ok(_) => panic!("expected config error"),
    }
}
