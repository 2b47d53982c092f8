//! Shared HTTP plumbing for upstream sources.
//!
//! Every aggregator treats "fetch a source" as one opaque call that either
//! yields a decoded body or an [`UpstreamError`] tagged with the source name.
//! No retries happen here.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::error::{ReqwestErrorExt, UpstreamError};

/// Build a client with a bounded per-request timeout.
pub fn build_client(timeout: Duration, user_agent: &str) -> Result<Client, UpstreamError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(|e| UpstreamError::Client(e.to_string()))
}

/// GET `url` with `query` and decode the JSON body.
pub async fn fetch_json<T, Q>(
    client: &Client,
    source_name: &str,
    url: &str,
    query: &Q,
) -> Result<T, UpstreamError>
where
    T: DeserializeOwned,
    Q: serde::Serialize + ?Sized,
{
    let response = send(client, source_name, url, query).await?;
    let body = response
        .text()
        .await
        .map_err(|e| e.into_upstream_error(source_name))?;

    serde_json::from_str(&body).map_err(|e| {
        tracing::debug!("{} returned undecodable JSON: {}", source_name, e);
        UpstreamError::invalid_response(source_name, format!("JSON parse error: {}", e))
    })
}

/// GET `url` and return the body as text.
pub async fn fetch_text(
    client: &Client,
    source_name: &str,
    url: &str,
) -> Result<String, UpstreamError> {
    let response = send(client, source_name, url, &[] as &[(&str, &str)]).await?;
    response
        .text()
        .await
        .map_err(|e| e.into_upstream_error(source_name))
}

async fn send<Q>(
    client: &Client,
    source_name: &str,
    url: &str,
    query: &Q,
) -> Result<Response, UpstreamError>
where
    Q: serde::Serialize + ?Sized,
{
    let response = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| {
            tracing::debug!("{} request failed: {}", source_name, e);
            e.into_upstream_error(source_name)
        })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    tracing::debug!("{} returned status {}", source_name, status);
    let text = response.text().await.unwrap_or_default();
    Err(UpstreamError::Status {
        source_name: source_name.to_string(),
        status: status.as_u16(),
        message: text,
    })
}
