use crate::error::{BookmarksError, Result};
use crate::types::{GithubResponseRepository, GithubSearchResponse};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Anything that can answer a repository search phrase
#[async_trait]
pub trait RepositorySearch: Send + Sync {
    async fn search_repositories(&self, phrase: &str) -> Result<Vec<GithubResponseRepository>>;
}

pub struct GitHubClient {
    client: Client,
    api_base: Url,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(api_base: &str, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("repo-bookmarks/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(GitHubClient {
            client,
            api_base: base_url(api_base)?,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// URL for the repository search endpoint with `phrase` encoded as `q`
    pub fn search_url(&self, phrase: &str) -> Result<Url> {
        let mut url = self.api_base.join("search/repositories")?;
        url.query_pairs_mut().append_pair("q", phrase);
        Ok(url)
    }

    // Single attempt; the search quota makes retries counterproductive.
    async fn make_request(&self, url: Url) -> Result<Response> {
        let mut request = self
            .client
            .get(url.clone())
            .header("Accept", "application/vnd.github.v3+json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token));
        }

        let response = request.send().await?;

        let rate_limit_remaining = header_value::<u32>(&response, "X-RateLimit-Remaining");
        let rate_limit_reset = header_value::<i64>(&response, "X-RateLimit-Reset");

        match response.status() {
            StatusCode::OK => {
                debug!(?rate_limit_remaining, "Search request succeeded");
                Ok(response)
            }
            StatusCode::NOT_FOUND => Err(BookmarksError::NotFound(format!(
                "Resource not found: {}",
                url
            ))),
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
                let reset_at = rate_limit_reset
                    .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "unknown".to_string());
                warn!(
                    ?rate_limit_remaining,
                    %reset_at,
                    "GitHub search rate limit hit"
                );
                let error_text = response.text().await.unwrap_or_default();
                Err(BookmarksError::RateLimitExceeded(format!(
                    "Reset at {}: {}",
                    reset_at, error_text
                )))
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(BookmarksError::ApiError(format!(
                    "API request failed with status {}: {}",
                    status, error_text
                )))
            }
        }
    }
}

/// Parse a base URL so that relative joins append rather than replace the last segment.
pub(crate) fn base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn header_value<T: std::str::FromStr>(response: &Response, name: &str) -> Option<T> {
    response
        .headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<T>().ok())
}

#[async_trait]
impl RepositorySearch for GitHubClient {
    async fn search_repositories(&self, phrase: &str) -> Result<Vec<GithubResponseRepository>> {
        let url = self.search_url(phrase)?;
        let response = self.make_request(url).await?;
        let body: GithubSearchResponse = response.json().await?;
        debug!(
            phrase,
            total_count = body.total_count,
            returned = body.items.len(),
            "Search results received"
        );
        Ok(body.items)
    }
}
