use crate::error::FetchError;
use crate::models::cache::{ResponseCache, CACHE};
use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// An upstream response as received: status plus the unparsed body.
#[derive(Clone, Debug, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RawResponse {
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parses the body. Runs on every read; parsed values are never cached.
    pub fn json(&self) -> Result<Value, FetchError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Issues live GET requests.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<RawResponse, FetchError>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(concat!("portfolio-stats/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<RawResponse, FetchError> {
        debug!("Sending request to {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(RawResponse { status, body })
    }
}

/// Live fetcher fronted by the TTL cache.
#[derive(Clone)]
pub struct UpstreamClient {
    fetcher: Arc<dyn Fetcher>,
    cache: Arc<ResponseCache>,
}

impl UpstreamClient {
    /// Real HTTP fetcher with the process-wide cache.
    pub fn new() -> Self {
        Self::with_parts(Arc::new(HttpFetcher::new()), CACHE.clone())
    }

    pub fn with_parts(fetcher: Arc<dyn Fetcher>, cache: Arc<ResponseCache>) -> Self {
        Self { fetcher, cache }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Serves `url` from cache while fresh, otherwise fetches live and
    /// overwrites the entry. Failed fetches are not cached.
    pub async fn get_with_cache(&self, url: &str) -> Result<RawResponse, FetchError> {
        let now = Instant::now();
        if let Some(response) = self.cache.get_fresh(url, now) {
            debug!("Cache hit for {}", url);
            return Ok(response);
        }

        debug!("Cache miss for {}", url);
        let response = self.fetcher.get(url).await?;
        self.cache.insert(url, response.clone(), now);
        Ok(response)
    }
}

impl Default for UpstreamClient {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::StubFetcher;
    use super::*;
    use std::time::Duration;

    const URL: &str = "https://codeforces.com/api/user.info?handles=x";

    fn client(stub: Arc<StubFetcher>, ttl: Duration) -> UpstreamClient {
        UpstreamClient::with_parts(stub, Arc::new(ResponseCache::new(ttl)))
    }

    #[tokio::test]
    async fn test_second_fetch_within_ttl_is_cached() {
        let stub = Arc::new(StubFetcher::new().respond(URL, 200, r#"{"status":"OK"}"#));
        let client = client(stub.clone(), Duration::from_secs(300));

        let first = client.get_with_cache(URL).await.unwrap();
        let second = client.get_with_cache(URL).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_after_ttl_goes_live() {
        let stub = Arc::new(StubFetcher::new().respond(URL, 200, "{}"));
        let client = client(stub.clone(), Duration::ZERO);

        client.get_with_cache(URL).await.unwrap();
        client.get_with_cache(URL).await.unwrap();

        assert_eq!(stub.calls(), 2);
        assert_eq!(client.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let stub = Arc::new(StubFetcher::new().fail(URL, FetchError::Network("reset".into())));
        let client = client(stub.clone(), Duration::from_secs(300));

        assert!(client.get_with_cache(URL).await.is_err());
        assert!(client.get_with_cache(URL).await.is_err());

        assert_eq!(stub.calls(), 2);
        assert!(client.cache().is_empty());
    }

    #[tokio::test]
    async fn test_error_status_is_cached_as_response() {
        let stub = Arc::new(StubFetcher::new().respond(URL, 503, "busy"));
        let client = client(stub.clone(), Duration::from_secs(300));

        let response = client.get_with_cache(URL).await.unwrap();
        client.get_with_cache(URL).await.unwrap();

        assert!(!response.is_ok());
        assert_eq!(stub.calls(), 1);
    }

    #[test]
    fn test_cached_body_parses_repeatedly() {
        let response = RawResponse {
            status: 200,
            body: Bytes::from_static(br#"{"a":1}"#),
        };
        assert_eq!(response.json().unwrap(), response.json().unwrap());
        let bad = RawResponse {
            status: 200,
            body: Bytes::from_static(b"<html>"),
        };
        assert!(matches!(bad.json(), Err(FetchError::InvalidJson(_))));
    }
}
