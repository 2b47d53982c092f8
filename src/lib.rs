//! Sevzap: weather, currency rates and news for the North-West region,
//! aggregated behind one cached facade.

pub mod dashboard;

pub use dashboard::{Dashboard, Health, Overview, OVERVIEW_CURRENCIES, OVERVIEW_HEADLINES};
pub use sevzap_core::{AppError, Config};
