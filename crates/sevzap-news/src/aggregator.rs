//! Headline list across all configured feeds.

use serde::{Deserialize, Serialize};
use sevzap_core::{Config, FeedConfig, TtlCache, UpstreamError};

use crate::client::FeedClient;
use crate::feed::Feed;

/// Source label when neither the config nor the feed names one.
pub const DEFAULT_SOURCE: &str = "RSS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<String>,
    pub source: String,
}

pub struct NewsAggregator {
    client: FeedClient,
    feeds: Vec<FeedConfig>,
    /// Parsed feeds, index-aligned with `feeds`
    cache: TtlCache<Vec<Feed>>,
}

impl NewsAggregator {
    pub fn new(client: FeedClient, feeds: Vec<FeedConfig>, cache: TtlCache<Vec<Feed>>) -> Self {
        Self {
            client,
            feeds,
            cache,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        Ok(Self::new(
            FeedClient::from_config(config)?,
            config.sources.feeds.clone(),
            TtlCache::new("news", config.cache.news_ttl()),
        ))
    }

    pub fn feeds(&self) -> &[FeedConfig] {
        &self.feeds
    }

    /// Up to `limit` headlines. Each feed contributes at most
    /// `limit / feed_count + 2` entries in its own order; feeds follow
    /// config order and the concatenation is cut to `limit`.
    ///
    /// # Errors
    ///
    /// Any feed failing to download or parse fails the whole call, unless
    /// an earlier result is cached.
    pub async fn headlines(&self, limit: usize) -> Result<Vec<Headline>, UpstreamError> {
        if self.feeds.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let feeds = self.cache.get_or_refresh(|| self.fetch_all()).await?;
        let per_feed = (limit / self.feeds.len()).saturating_add(2);

        let mut out: Vec<Headline> = self
            .feeds
            .iter()
            .zip(&feeds)
            .flat_map(|(config, feed)| {
                let source = config
                    .label
                    .clone()
                    .or_else(|| feed.title.clone())
                    .unwrap_or_else(|| DEFAULT_SOURCE.to_string());
                feed.entries.iter().take(per_feed).map(move |e| Headline {
                    title: e.title.clone(),
                    link: e.link.clone(),
                    published: e.published.clone(),
                    source: source.clone(),
                })
            })
            .collect();

        out.truncate(limit);
        Ok(out)
    }

    async fn fetch_all(&self) -> Result<Vec<Feed>, UpstreamError> {
        let mut feeds = Vec::with_capacity(self.feeds.len());
        for config in &self.feeds {
            feeds.push(self.client.fetch_feed(&config.url).await?);
        }
        Ok(feeds)
    }
}
