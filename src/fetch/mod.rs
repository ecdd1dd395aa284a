use async_trait::async_trait;
use reqwest::Client;

use crate::{Result, TranscriptError};

/// A completed HTTP exchange as the extractors see it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedBody {
    pub status: u16,
    pub body: String,
}

impl FetchedBody {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network access used by the extractors
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// GET a URL and return its status and body. Transport errors are `Err`; HTTP error
    /// statuses are returned as a normal [`FetchedBody`].
    async fn get(&self, url: &str) -> Result<FetchedBody>;
}

/// Fetch a URL and insist on a successful, non-empty body
pub async fn fetch_required(fetcher: &dyn HttpFetcher, url: &str) -> Result<String> {
    tracing::debug!("Fetching {}", url);
    let response = fetcher.get(url).await?;

    if !response.is_success() {
        return Err(TranscriptError::TranscriptFetchFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status),
        });
    }

    if response.body.trim().is_empty() {
        return Err(TranscriptError::EmptyTranscript {
            url: url.to_string(),
        });
    }

    Ok(response.body)
}

/// [`HttpFetcher`] backed by reqwest
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn get(&self, url: &str) -> Result<FetchedBody> {
        let failed = |e: reqwest::Error| TranscriptError::TranscriptFetchFailed {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(failed)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(failed)?;

        Ok(FetchedBody { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_required_returns_body() {
        let mut fetcher = MockHttpFetcher::new();
        fetcher
            .expect_get()
            .withf(|url| url == "https://example.test/a")
            .times(1)
            .returning(|_| Ok(FetchedBody::ok("<transcript/>")));

        let body = fetch_required(&fetcher, "https://example.test/a").await.unwrap();
        assert_eq!(body, "<transcript/>");
    }

    #[tokio::test]
    async fn test_fetch_required_rejects_error_status() {
        let mut fetcher = MockHttpFetcher::new();
        fetcher.expect_get().returning(|_| {
            Ok(FetchedBody {
                status: 404,
                body: "not found".into(),
            })
        });

        let err = fetch_required(&fetcher, "https://example.test/a").await.unwrap_err();
        assert!(matches!(
            err,
            TranscriptError::TranscriptFetchFailed { ref reason, .. } if reason == "HTTP 404"
        ));
    }

    #[tokio::test]
    async fn test_fetch_required_rejects_blank_body() {
        let mut fetcher = MockHttpFetcher::new();
        fetcher.expect_get().returning(|_| Ok(FetchedBody::ok("  \n")));

        let err = fetch_required(&fetcher, "https://example.test/a").await.unwrap_err();
        assert!(matches!(err, TranscriptError::EmptyTranscript { .. }));
    }
}
