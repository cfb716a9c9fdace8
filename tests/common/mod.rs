#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use repo_bookmarks::backend::BookmarkBackend;
use repo_bookmarks::error::{BookmarksError, Result};
use repo_bookmarks::github::RepositorySearch;
use repo_bookmarks::models::Repository;
use repo_bookmarks::notice::{Notice, NoticeReceiver};
use repo_bookmarks::types::GithubResponseRepository;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub fn repo(id: &str, stars: u64) -> Repository {
    Repository {
        id: id.to_string(),
        full_name: format!("owner/{}", id),
        created_at: "2013-12-26T13:05:46Z".to_string(),
        stargazers_count: stars,
        language: "Rust".to_string(),
        url: format!("https://github.com/owner/{}", id),
    }
}

pub fn search_item(id: u64, full_name: &str) -> GithubResponseRepository {
    GithubResponseRepository {
        id,
        full_name: full_name.to_string(),
        description: Some(format!("{} description", full_name)),
        created_at: "2009-07-12T20:10:41Z".to_string(),
        stargazers_count: id * 10,
        language: Some("Go".to_string()),
        html_url: format!("https://github.com/{}", full_name),
    }
}

/// Collect everything currently queued on a notice channel
pub fn drain(notices: &mut NoticeReceiver) -> Vec<Notice> {
    let mut out = Vec::new();
    while let Ok(notice) = notices.try_recv() {
        out.push(notice);
    }
    out
}

/// Let spawned fire-and-forget tasks run to completion
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}

/// In-memory stand-in for the bookmark service
#[derive(Default)]
pub struct FakeBackend {
    pub stored: Mutex<Vec<Repository>>,
    pub created: Mutex<Vec<Repository>>,
    pub deleted: Mutex<Vec<String>>,
    pub fail: AtomicBool,
}

impl FakeBackend {
    pub fn with_repos(repos: Vec<Repository>) -> Self {
        let backend = Self::default();
        *backend.stored.lock().unwrap() = repos;
        backend
    }

    pub fn failing() -> Self {
        let backend = Self::default();
        backend.fail.store(true, Ordering::SeqCst);
        backend
    }

    pub fn created_ids(&self) -> Vec<String> {
        self.created.lock().unwrap().iter().map(|r| r.id.clone()).collect()
    }

    pub fn deleted_ids(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    fn check(&self) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            Err(BookmarksError::BackendError("backend unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BookmarkBackend for FakeBackend {
    async fn list(&self) -> Result<Vec<Repository>> {
        self.check()?;
        Ok(self.stored.lock().unwrap().clone())
    }

    async fn create(&self, repo: &Repository) -> Result<()> {
        self.created.lock().unwrap().push(repo.clone());
        self.check()
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.deleted.lock().unwrap().push(id.to_string());
        self.check()
    }
}

/// Search API stand-in: answers each phrase with one item named after it
#[derive(Default)]
pub struct FakeSearch {
    pub queries: Mutex<Vec<String>>,
    pub delays: HashMap<String, Duration>,
    pub failing: HashSet<String>,
}

impl FakeSearch {
    pub fn with_delay(mut self, phrase: &str, delay: Duration) -> Self {
        self.delays.insert(phrase.to_string(), delay);
        self
    }

    pub fn failing_on(mut self, phrase: &str) -> Self {
        self.failing.insert(phrase.to_string());
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl RepositorySearch for FakeSearch {
    async fn search_repositories(&self, phrase: &str) -> Result<Vec<GithubResponseRepository>> {
        self.queries.lock().unwrap().push(phrase.to_string());
        if let Some(delay) = self.delays.get(phrase) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(phrase) {
            return Err(BookmarksError::ApiError(format!("search for {} failed", phrase)));
        }
        let id = phrase.len() as u64 + 1;
        Ok(vec![search_item(id, phrase)])
    }
}

/// Serve `app` on an ephemeral local port and return its base URL
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock server");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock server failed");
    });
    format!("http://{}", addr)
}
