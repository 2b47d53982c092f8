//! Cached access to the rate table.

use sevzap_core::{Config, TtlCache, UpstreamError};

use crate::client::CbrClient;
use crate::table::{RateItem, RateTable};

/// Maximum number of rows returned by [`RatesAggregator::search`].
pub const SEARCH_LIMIT: usize = 10;

pub struct RatesAggregator {
    client: CbrClient,
    cache: TtlCache<RateTable>,
}

impl RatesAggregator {
    pub fn new(client: CbrClient, cache: TtlCache<RateTable>) -> Self {
        Self { client, cache }
    }

    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        Ok(Self::new(
            CbrClient::from_config(config)?,
            TtlCache::new("rates", config.cache.rates_ttl()),
        ))
    }

    /// The full table, fetched at most once per TTL.
    ///
    /// # Errors
    ///
    /// Fails when the table cannot be fetched and nothing is cached yet.
    pub async fn all_rates(&self) -> Result<RateTable, UpstreamError> {
        self.cache
            .get_or_refresh(|| async {
                let daily = self.client.fetch_daily().await?;
                let table = RateTable::from_daily(&daily);
                tracing::info!(
                    "Built rate table with {} currencies ({})",
                    table.len(),
                    table.updated_at
                );
                Ok::<_, UpstreamError>(table)
            })
            .await
    }

    /// `codes = None` returns the whole table; otherwise only the known codes.
    pub async fn rates(&self, codes: Option<&[String]>) -> Result<RateTable, UpstreamError> {
        let table = self.all_rates().await?;
        Ok(match codes {
            Some(codes) => table.subset(codes),
            None => table,
        })
    }

    /// Case-insensitive substring search over code and name, sorted by
    /// code and capped at [`SEARCH_LIMIT`]. An empty query matches all.
    pub async fn search(&self, query: &str) -> Result<Vec<RateItem>, UpstreamError> {
        let table = self.all_rates().await?;
        let needle = query.trim().to_lowercase();

        // BTreeMap iteration is already sorted by code.
        Ok(table
            .rates
            .into_values()
            .filter(|item| needle.is_empty() || item.matches(&needle))
            .take(SEARCH_LIMIT)
            .collect())
    }
}
