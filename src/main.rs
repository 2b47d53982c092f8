//! Command-line front end: runs one dashboard read and prints it as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use sevzap::{Config, Dashboard};

#[derive(Parser, Debug)]
#[command(name = "sevzap")]
#[command(about = "Weather, currency rates and news for the North-West region")]
#[command(version)]
struct Args {
    /// Configuration file (default: <config dir>/sevzap/config.toml)
    #[arg(short, long, env = "SEVZAP_CONFIG")]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Current conditions for every city on the regional board
    Weather,
    /// Forecast for coordinates (hourly today, or daily for a week)
    Forecast {
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<String>,
        /// Seven-day daily forecast instead of today's hours
        #[arg(long)]
        weekly: bool,
    },
    /// Current conditions for coordinates
    Current {
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<String>,
    },
    /// Central bank rates, optionally limited to the given codes
    Rates { codes: Vec<String> },
    /// Search rates by code or currency name
    RatesSearch {
        #[arg(default_value = "")]
        query: String,
    },
    /// Latest headlines
    News {
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Look up places by name prefix
    Cities { prefix: String },
    /// Weather, main currencies and headlines in one document
    Overview,
    /// Liveness probe
    Health,
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    sevzap_core::init()?;

    let config = load_config(args.config.as_ref()).context("Failed to load configuration")?;
    let dashboard = Dashboard::new(config)?;
    let pretty = args.pretty;

    match args.command {
        Command::Weather => print_json(&dashboard.weather_snapshot().await, pretty),
        Command::Forecast { lat, lon, weekly } => {
            let forecast = if weekly {
                dashboard
                    .weather_forecast_weekly(lat.as_deref(), lon.as_deref())
                    .await
            } else {
                dashboard
                    .weather_forecast(lat.as_deref(), lon.as_deref())
                    .await
            };
            print_json(&forecast?, pretty)
        }
        Command::Current { lat, lon } => print_json(
            &dashboard
                .current_weather(lat.as_deref(), lon.as_deref())
                .await?,
            pretty,
        ),
        Command::Rates { codes } => {
            let codes = (!codes.is_empty()).then_some(codes);
            print_json(&dashboard.rates(codes.as_deref()).await?, pretty)
        }
        Command::RatesSearch { query } => {
            print_json(&dashboard.rates_search(&query).await?, pretty)
        }
        Command::News { limit } => print_json(&dashboard.headlines(limit).await?, pretty),
        Command::Cities { prefix } => print_json(&dashboard.city_search(&prefix).await?, pretty),
        Command::Overview => print_json(&dashboard.overview().await, pretty),
        Command::Health => print_json(&dashboard.health(), pretty),
    }
}
