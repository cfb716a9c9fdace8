use crate::backend::BookmarkBackend;
use crate::error::{BookmarksError, Result};
use crate::models::{Repository, SortDirection};
use crate::notice::{Notice, NoticeSender};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Maximum number of bookmarks held at once
pub const MAX_BOOKMARKS: usize = 10;

/// Outcome of pressing the save button on a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Saved,
    Removed,
}

/// Ordered, capped list of bookmarked repositories.
///
/// Local state is updated synchronously and is the source of truth. Every
/// mutation spawns exactly one backend call whose outcome is only logged or
/// turned into a [`Notice`]; nothing is retried or rolled back.
pub struct BookmarkStore {
    backend: Arc<dyn BookmarkBackend>,
    notices: NoticeSender,
    repos: Vec<Repository>,
    sort: Option<SortDirection>,
}

impl BookmarkStore {
    pub fn new(backend: Arc<dyn BookmarkBackend>, notices: NoticeSender) -> Self {
        Self {
            backend,
            notices,
            repos: Vec::new(),
            sort: None,
        }
    }

    /// Replace the list with the backend's copy. Leaves local state untouched on failure.
    pub async fn load(&mut self) -> Result<usize> {
        match self.backend.list().await {
            Ok(repos) => {
                self.repos = normalize(repos);
                self.sort = None;
                info!(count = self.repos.len(), "Loaded saved repos");
                let _ = self.notices.send(Notice::BookmarksLoaded {
                    count: self.repos.len(),
                });
                Ok(self.repos.len())
            }
            Err(e) => {
                error!("Failed to fetch saved repos: {}", e);
                let _ = self.notices.send(Notice::LoadFailed {
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Append `repo` and persist it in the background. Returns the new length.
    pub fn save(&mut self, repo: Repository) -> Result<usize> {
        if self.contains(&repo.id) {
            return Err(BookmarksError::AlreadySaved(repo.id));
        }
        if self.is_full() {
            warn!(id = %repo.id, "Save rejected, bookmark limit reached");
            let _ = self.notices.send(Notice::CapacityExceeded);
            return Err(BookmarksError::CapacityExceeded(MAX_BOOKMARKS));
        }

        let backend = Arc::clone(&self.backend);
        let persisted = repo.clone();
        tokio::spawn(async move {
            if let Err(e) = backend.create(&persisted).await {
                error!(id = %persisted.id, "Failed to persist saved repo: {}", e);
            }
        });

        info!(id = %repo.id, full_name = %repo.full_name, "Saved repo");
        self.repos.push(repo);

        if self.is_full() {
            let _ = self.notices.send(Notice::CapacityReached);
        }
        Ok(self.repos.len())
    }

    /// Drop the bookmark with `id` locally and ask the backend to delete it.
    /// Returns whether a local record was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.repos.len();
        self.repos.retain(|r| r.id != id);
        let removed = self.repos.len() != before;
        if removed {
            info!(id, "Removed saved repo");
        }

        let backend = Arc::clone(&self.backend);
        let notices = self.notices.clone();
        let id = id.to_string();
        tokio::spawn(async move {
            if let Err(e) = backend.delete(&id).await {
                error!(%id, "Failed to delete saved repo: {}", e);
                let _ = notices.send(Notice::RemoveFailed { id });
            }
        });

        removed
    }

    /// Unsave when already saved, save otherwise.
    pub fn toggle(&mut self, repo: Repository) -> Result<Toggle> {
        if self.contains(&repo.id) {
            self.remove(&repo.id);
            Ok(Toggle::Removed)
        } else {
            self.save(repo).map(|_| Toggle::Saved)
        }
    }

    /// Stable sort by stargazer count. With no direction the previous one is
    /// flipped, starting from descending.
    pub fn sort(&mut self, direction: Option<SortDirection>) -> SortDirection {
        let direction = direction.unwrap_or_else(|| match self.sort {
            Some(SortDirection::Descending) => SortDirection::Ascending,
            _ => SortDirection::Descending,
        });

        match direction {
            SortDirection::Ascending => self.repos.sort_by_key(|r| r.stargazers_count),
            SortDirection::Descending => self
                .repos
                .sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count)),
        }
        self.sort = Some(direction);
        direction
    }

    pub fn repos(&self) -> &[Repository] {
        &self.repos
    }

    pub fn len(&self) -> usize {
        self.repos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.repos.len() >= MAX_BOOKMARKS
    }

    pub fn contains(&self, id: &str) -> bool {
        self.repos.iter().any(|r| r.id == id)
    }

    pub fn sort_direction(&self) -> Option<SortDirection> {
        self.sort
    }
}

// First occurrence of an id wins; anything past the cap is dropped.
fn normalize(repos: Vec<Repository>) -> Vec<Repository> {
    let received = repos.len();
    let mut seen = HashSet::new();
    let mut kept: Vec<Repository> = repos
        .into_iter()
        .filter(|r| seen.insert(r.id.clone()))
        .collect();
    kept.truncate(MAX_BOOKMARKS);
    if kept.len() != received {
        warn!(
            received,
            kept = kept.len(),
            "Backend returned duplicate or excess bookmarks"
        );
    }
    kept
}
