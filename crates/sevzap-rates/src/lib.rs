//! Central-bank currency rates.
//!
//! Fetches the CBR daily table, derives day-over-day change and decorates
//! each currency with display metadata.

pub mod aggregator;
pub mod client;
pub mod meta;
pub mod table;

pub use aggregator::{RatesAggregator, SEARCH_LIMIT};
pub use client::{CbrClient, CbrDaily, CbrRecord};
pub use meta::{CurrencyMeta, DEFAULT_ACCENT};
pub use table::{format_timestamp, RateItem, RateTable};
