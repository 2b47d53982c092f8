//! Rate table building: change fields, metadata and the update label.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::client::{CbrDaily, CbrRecord};
use crate::meta::CurrencyMeta;

const LABEL_FORMAT: &str = "%d.%m.%Y %H:%M";

/// One currency row ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateItem {
    pub code: String,
    pub name: Option<String>,
    pub value: Option<f64>,
    pub previous_value: Option<f64>,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    /// Units of currency the quote is for
    pub nominal: u32,
    pub symbol: String,
    pub emoji: Option<String>,
    pub accent: String,
    pub updated_at: String,
}

impl RateItem {
    pub fn from_record(code: &str, record: &CbrRecord, updated_at: &str) -> Self {
        let change = match (record.value, record.previous) {
            (Some(value), Some(prev)) => Some(value - prev),
            _ => None,
        };
        let change_percent = match (change, record.previous) {
            (Some(change), Some(prev)) if prev != 0.0 => Some(change / prev * 100.0),
            _ => None,
        };
        let meta = CurrencyMeta::lookup(code);

        Self {
            code: code.to_string(),
            name: record.name.clone(),
            value: record.value,
            previous_value: record.previous,
            change,
            change_percent,
            nominal: record.nominal.unwrap_or(1),
            symbol: meta.symbol.to_string(),
            emoji: meta.emoji.map(str::to_string),
            accent: meta.accent.to_string(),
            updated_at: updated_at.to_string(),
        }
    }

    /// Case-insensitive substring match on code or name.
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.code.to_lowercase().contains(needle_lower)
            || self
                .name
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(needle_lower))
    }
}

/// Currency code to row, plus one table-wide update label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub updated_at: String,
    pub rates: BTreeMap<String, RateItem>,
}

impl RateTable {
    pub fn from_daily(daily: &CbrDaily) -> Self {
        let updated_at = daily
            .date
            .as_deref()
            .and_then(format_timestamp)
            .or_else(|| daily.timestamp.as_deref().and_then(format_timestamp))
            .unwrap_or_default();

        let rates = daily
            .valute
            .iter()
            .filter_map(|(code, record)| {
                record
                    .as_ref()
                    .map(|r| (code.clone(), RateItem::from_record(code, r, &updated_at)))
            })
            .collect();

        Self { updated_at, rates }
    }

    /// Keep only `codes`; unknown codes are dropped without error.
    pub fn subset(&self, codes: &[String]) -> Self {
        let rates = codes
            .iter()
            .map(|c| c.trim().to_uppercase())
            .filter_map(|c| self.rates.get(&c).map(|item| (c, item.clone())))
            .collect();

        Self {
            updated_at: self.updated_at.clone(),
            rates,
        }
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Reformat an upstream timestamp as `DD.MM.YYYY HH:MM`, appending
/// ` UTC+HH:MM` when the source carries an offset. `None` when unparseable.
pub fn format_timestamp(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(format!(
            "{} UTC{}",
            dt.format(LABEL_FORMAT),
            dt.format("%:z")
        ));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    Some(naive.format(LABEL_FORMAT).to_string())
}
