//! Column-to-row reshaping of Open-Meteo series.
//!
//! Rows follow the `time` column. A field column shorter than `time` (or
//! holding `null`) yields `None` for that row instead of failing.

use chrono::{NaiveDateTime, Timelike};

use crate::provider::{CurrentBlock, DailyBlock, HourlyBlock};
use crate::types::{ConditionDisplay, DailyPoint, HourlyPoint, Reading};

fn at<T: Clone>(column: &[Option<T>], index: usize) -> Option<T> {
    column.get(index).cloned().flatten()
}

fn hour_of(time: &str) -> Option<u32> {
    NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M")
        .ok()
        .map(|t| t.hour())
}

pub fn current_reading(block: &CurrentBlock) -> Reading {
    Reading {
        time: block.time.clone(),
        temp: block.temperature_2m,
        feels: block.apparent_temperature,
        humidity: block.relative_humidity_2m,
        precip: block.precipitation,
        precip_probability: None,
        wind: block.wind_speed_10m,
        wind_direction: block.wind_direction_10m,
        display: ConditionDisplay::from_code(block.weather_code),
    }
}

pub fn hourly_points(block: &HourlyBlock) -> Vec<HourlyPoint> {
    block
        .time
        .iter()
        .enumerate()
        .map(|(i, time)| HourlyPoint {
            index: i,
            hour: hour_of(time),
            reading: Reading {
                time: Some(time.clone()),
                temp: at(&block.temperature_2m, i),
                feels: at(&block.apparent_temperature, i),
                humidity: at(&block.relative_humidity_2m, i),
                precip: at(&block.precipitation, i),
                precip_probability: at(&block.precipitation_probability, i),
                wind: at(&block.wind_speed_10m, i),
                wind_direction: at(&block.wind_direction_10m, i),
                display: ConditionDisplay::from_code(at(&block.weather_code, i)),
            },
        })
        .collect()
}

pub fn daily_points(block: &DailyBlock) -> Vec<DailyPoint> {
    block
        .time
        .iter()
        .enumerate()
        .map(|(i, date)| DailyPoint {
            date: Some(date.clone()),
            temp_max: at(&block.temperature_2m_max, i),
            temp_min: at(&block.temperature_2m_min, i),
            precip_sum: at(&block.precipitation_sum, i),
            wind_max: at(&block.wind_speed_10m_max, i),
            sunrise: at(&block.sunrise, i),
            sunset: at(&block.sunset, i),
            display: ConditionDisplay::from_code(at(&block.weather_code, i)),
        })
        .collect()
}
