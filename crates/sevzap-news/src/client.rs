//! Feed download.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sevzap_core::http::{build_client, fetch_text};
use sevzap_core::{Config, UpstreamError};
use tracing::instrument;

use crate::feed::{parse_feed, Feed};

const SOURCE_NAME: &str = "rss";

#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Arc<Client>,
}

impl FeedClient {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, UpstreamError> {
        Ok(Self {
            client: Arc::new(build_client(timeout, user_agent)?),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        Self::new(
            Duration::from_secs(config.http.news_timeout_secs),
            &config.http.user_agent,
        )
    }

    /// Download and parse one feed. An unparseable document is an
    /// [`UpstreamError::InvalidResponse`].
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_feed(&self, url: &str) -> Result<Feed, UpstreamError> {
        let body = fetch_text(&self.client, SOURCE_NAME, url).await?;
        let feed = parse_feed(&body).map_err(|e| {
            tracing::debug!("Feed {} did not parse: {}", url, e);
            UpstreamError::invalid_response(SOURCE_NAME, format!("{}: {}", url, e))
        })?;
        tracing::debug!("Feed {} has {} entries", url, feed.entries.len());
        Ok(feed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> FeedClient {
        FeedClient::new(Duration::from_secs(5), "sevzap-test").unwrap()
    }

    #[tokio::test]
    async fn test_fetch_feed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<rss><channel><title>T</title><item><title>a</title></item></channel></rss>",
            ))
            .mount(&server)
            .await;

        let feed = client()
            .fetch_feed(&format!("{}/rss.xml", server.uri()))
            .await
            .unwrap();

        assert_eq!(feed.title.as_deref(), Some("T"));
        assert_eq!(feed.entries.len(), 1);
    }

    #[tokio::test]
    async fn test_non_feed_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let err = client().fetch_feed(&server.uri()).await.unwrap_err();
        assert!(matches!(err, UpstreamError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client().fetch_feed(&server.uri()).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Status { status: 404, .. }));
    }
}
