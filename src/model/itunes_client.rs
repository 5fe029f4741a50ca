//! iTunes Search API client

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use super::error::FetchError;
use super::types::{Item, Query};

/// Network access used by the search coordinator and the image registries.
///
/// Both calls race the request against `cancel`. A cancelled token yields
/// `FetchError::Cancelled` in the common case, but a request that finishes
/// at the same moment may still report its real outcome.
#[async_trait]
pub trait FetchClient: Send + Sync {
    async fn search(&self, query: &Query, cancel: &CancellationToken) -> Result<Vec<Item>, FetchError>;

    async fn fetch_image(&self, url: &str, cancel: &CancellationToken) -> Result<Bytes, FetchError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<Item>,
}

#[derive(Clone)]
pub struct ItunesClient {
    http: reqwest::Client,
    base_url: String,
}

impl ItunesClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("itunes-search/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    async fn request_items(&self, query: &Query) -> Result<Vec<Item>, FetchError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&query.params()[..])
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;
        let decoded: SearchResponse = serde_json::from_slice(&body)?;
        Ok(decoded.results)
    }

    async fn request_image(&self, url: &str) -> Result<Bytes, FetchError> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?)
    }
}

#[async_trait]
impl FetchClient for ItunesClient {
    async fn search(&self, query: &Query, cancel: &CancellationToken) -> Result<Vec<Item>, FetchError> {
        crate::log_fetch_request!("search", term = %query.term, media = query.media.query_value());

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = self.request_items(query) => result,
        };

        crate::log_fetch_result!("search", result);
        result
    }

    async fn fetch_image(&self, url: &str, cancel: &CancellationToken) -> Result<Bytes, FetchError> {
        crate::log_fetch_request!("artwork", url);

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = self.request_image(url) => result,
        };

        crate::log_fetch_result!("artwork", result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MediaCategory;

    #[test]
    fn malformed_body_is_a_decode_error() {
        let err: FetchError = serde_json::from_slice::<SearchResponse>(b"<html>busy</html>")
            .unwrap_err()
            .into();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn cancelled_token_wins_over_request() {
        let client = ItunesClient::new("http://127.0.0.1:9/search", Duration::from_secs(1)).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let query = Query::new("Star", MediaCategory::Movie, "en_us", 20);
        assert_eq!(client.search(&query, &cancel).await, Err(FetchError::Cancelled));
        assert_eq!(
            client.fetch_image("http://127.0.0.1:9/a.png", &cancel).await,
            Err(FetchError::Cancelled)
        );
    }
}
