//! HTTP fetch layer. The crawl core only speaks to the [`Downloader`] trait;
//! [`HttpClient`] is the reqwest-backed production implementation and tests
//! substitute in-memory fakes.

use async_trait::async_trait;
use std::borrow::Cow;
use std::time::Duration;

/// Outcome of one fetch attempt. Transport failures are carried in `error`
/// with `status == 0` rather than as a `Result`, because the crawl treats a
/// failed fetch the same as a contentless page: log it and move on.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub error: Option<String>,
    /// URL after redirects, for logging and diagnostics. Link resolution and
    /// record keys use the requested URL, so the frontier's dedup and the
    /// store stay keyed by what was admitted.
    pub final_url: String,
    pub content: Option<Vec<u8>>,
}

impl FetchResponse {
    pub fn failure(url: &str, error: String) -> Self {
        Self {
            status: 0,
            error: Some(error),
            final_url: url.to_string(),
            content: None,
        }
    }

    /// A 200 response with a non-empty body.
    pub fn has_content(&self) -> bool {
        self.status == 200
            && self.error.is_none()
            && self.content.as_ref().is_some_and(|c| !c.is_empty())
    }

    pub fn text(&self) -> Option<Cow<'_, str>> {
        self.content.as_ref().map(|c| String::from_utf8_lossy(c))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
}

/// Abstraction over the fetch layer so the validity filter and the crawl
/// loop can be exercised without a network.
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchResponse;
}

/// reqwest-backed downloader. No retry: a URL whose fetch fails is simply
/// treated as having no links.
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| FetchError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Downloader for HttpClient {
    async fn fetch(&self, url: &str) -> FetchResponse {
        let response = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => return FetchResponse::failure(url, e.to_string()),
        };

        let status = response.status().as_u16();
        let final_url = response.url().to_string();

        match response.bytes().await {
            Ok(body) => FetchResponse {
                status,
                error: None,
                final_url,
                content: Some(body.to_vec()),
            },
            Err(e) => FetchResponse {
                status,
                error: Some(format!("failed to read body: {}", e)),
                final_url,
                content: None,
            },
        }
    }
}
