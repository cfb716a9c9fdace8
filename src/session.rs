use crate::actors::{
    BookmarkActor, BookmarkActorArgs, BookmarkMessage, SearchMessage, SearchSession,
    SearchSessionArgs, SearchSessionConfig, SearchSnapshot,
};
use crate::backend::BookmarkBackend;
use crate::error::{BookmarksError, Result};
use crate::github::RepositorySearch;
use crate::models::{Repository, SortDirection};
use crate::notice::NoticeSender;
use crate::store::Toggle;
use ractor::{Actor, ActorRef, RpcReplyPort};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const CALL_TIMEOUT: Duration = Duration::from_secs(5);
// Backend client timeout plus headroom
const LOAD_TIMEOUT: Duration = Duration::from_secs(35);

/// Both state owners of a running client, injected into whatever renders them
#[derive(Clone)]
pub struct Session {
    bookmarks: ActorRef<BookmarkMessage>,
    search: ActorRef<SearchMessage>,
}

impl Session {
    pub async fn start(
        config: SearchSessionConfig,
        backend: Arc<dyn BookmarkBackend>,
        search: Arc<dyn RepositorySearch>,
        notices: NoticeSender,
    ) -> Result<Self> {
        let (bookmarks, _) = Actor::spawn(
            None,
            BookmarkActor,
            BookmarkActorArgs {
                backend,
                notices: notices.clone(),
            },
        )
        .await
        .map_err(|e| BookmarksError::ActorError(format!("Failed to start bookmark store: {}", e)))?;

        let (search, _) = Actor::spawn(
            None,
            SearchSession,
            SearchSessionArgs {
                search,
                notices,
                config,
            },
        )
        .await
        .map_err(|e| BookmarksError::ActorError(format!("Failed to start search session: {}", e)))?;

        info!("Session started");
        Ok(Session { bookmarks, search })
    }

    pub async fn load_bookmarks(&self) -> Result<usize> {
        ask(&self.bookmarks, BookmarkMessage::Load, LOAD_TIMEOUT).await?
    }

    pub async fn bookmarks(&self) -> Result<Vec<Repository>> {
        ask(&self.bookmarks, BookmarkMessage::List, CALL_TIMEOUT).await
    }

    pub async fn is_saved(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        ask(&self.bookmarks, |reply| BookmarkMessage::Contains(id, reply), CALL_TIMEOUT).await
    }

    pub async fn save(&self, repo: Repository) -> Result<usize> {
        ask(&self.bookmarks, |reply| BookmarkMessage::Save(repo, reply), CALL_TIMEOUT).await?
    }

    pub async fn remove(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        ask(&self.bookmarks, |reply| BookmarkMessage::Remove(id, reply), CALL_TIMEOUT).await
    }

    pub async fn toggle(&self, repo: Repository) -> Result<Toggle> {
        ask(&self.bookmarks, |reply| BookmarkMessage::Toggle(repo, reply), CALL_TIMEOUT).await?
    }

    pub async fn sort(&self, direction: Option<SortDirection>) -> Result<SortDirection> {
        ask(&self.bookmarks, |reply| BookmarkMessage::Sort(direction, reply), CALL_TIMEOUT).await
    }

    pub fn text_changed(&self, text: impl Into<String>) -> Result<()> {
        tell(&self.search, SearchMessage::TextChanged(text.into()))
    }

    pub fn submit(&self) -> Result<()> {
        tell(&self.search, SearchMessage::Submit)
    }

    pub async fn snapshot(&self) -> Result<SearchSnapshot> {
        ask(&self.search, SearchMessage::GetSnapshot, CALL_TIMEOUT).await
    }

    /// Unmount both screens: stops the countdown and any pending debounce.
    pub fn shutdown(&self) {
        self.search.stop(Some("Session shutdown".to_string()));
        self.bookmarks.stop(Some("Session shutdown".to_string()));
        info!("Session stopped");
    }
}

fn tell<M: ractor::Message>(actor: &ActorRef<M>, message: M) -> Result<()> {
    actor
        .send_message(message)
        .map_err(|e| BookmarksError::ActorError(format!("Failed to send message: {}", e)))
}

async fn ask<M, T, F>(actor: &ActorRef<M>, build: F, timeout: Duration) -> Result<T>
where
    M: ractor::Message,
    T: Send + 'static,
    F: FnOnce(RpcReplyPort<T>) -> M,
{
    match actor.call(build, Some(timeout)).await {
        Ok(ractor::rpc::CallResult::Success(value)) => Ok(value),
        Ok(ractor::rpc::CallResult::Timeout) => {
            Err(BookmarksError::ActorError("Timed out waiting for reply".to_string()))
        }
        Ok(ractor::rpc::CallResult::SenderError) => {
            Err(BookmarksError::ActorError("Actor dropped the reply".to_string()))
        }
        Err(e) => Err(BookmarksError::ActorError(format!("Failed to send message: {}", e))),
    }
}
