//! News headlines from a list of RSS/Atom feeds.

pub mod aggregator;
pub mod client;
pub mod feed;

pub use aggregator::{Headline, NewsAggregator, DEFAULT_SOURCE};
pub use client::FeedClient;
pub use feed::{parse_feed, Feed, FeedEntry, FeedParseError};
