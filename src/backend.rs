use crate::error::{BookmarksError, Result};
use crate::github::base_url;
use crate::models::{Repository, RepositoryList};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080/repo/";

/// Remote persistence for bookmarks
#[async_trait]
pub trait BookmarkBackend: Send + Sync {
    /// Full bookmark list
    async fn list(&self) -> Result<Vec<Repository>>;

    async fn create(&self, repo: &Repository) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;
}

/// HTTP client for the companion bookmark service
pub struct BackendClient {
    client: Client,
    base: Url,
}

impl BackendClient {
    pub fn new(base: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("repo-bookmarks/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(BackendClient {
            client,
            base: base_url(base)?,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `{base}{id}` with the id percent-encoded as a single path segment
    pub fn item_url(&self, id: &str) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| BookmarksError::BackendError(format!("Cannot append to {}", self.base)))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let error_text = response.text().await.unwrap_or_default();
        Err(BookmarksError::BackendError(format!(
            "Request failed with status {}: {}",
            status, error_text
        )))
    }
}

#[async_trait]
impl BookmarkBackend for BackendClient {
    async fn list(&self) -> Result<Vec<Repository>> {
        let response = self.client.get(self.base.clone()).send().await?;
        let body: RepositoryList = Self::check(response).await?.json().await?;
        debug!(count = body.repos.len(), "Fetched saved repos");
        Ok(body.repos)
    }

    async fn create(&self, repo: &Repository) -> Result<()> {
        let response = self
            .client
            .post(self.base.clone())
            .json(repo)
            .send()
            .await?;
        Self::check(response).await?;
        debug!(id = %repo.id, "Persisted saved repo");
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let response = self.client.delete(self.item_url(id)?).send().await?;
        Self::check(response).await?;
        debug!(id, "Deleted saved repo");
        Ok(())
    }
}
