use crate::backend::BookmarkBackend;
use crate::error::Result;
use crate::models::{Repository, SortDirection};
use crate::notice::NoticeSender;
use crate::store::{BookmarkStore, Toggle};
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use std::sync::Arc;
use tracing::{debug, info};

/// Owns the process-wide bookmark list. Mutations are applied in mailbox order.
pub struct BookmarkActor;

pub struct BookmarkActorArgs {
    pub backend: Arc<dyn BookmarkBackend>,
    pub notices: NoticeSender,
}

/// Messages the bookmark actor can handle
pub enum BookmarkMessage {
    /// Replace the list from the backend
    Load(RpcReplyPort<Result<usize>>),
    Save(Repository, RpcReplyPort<Result<usize>>),
    Remove(String, RpcReplyPort<bool>),
    Toggle(Repository, RpcReplyPort<Result<Toggle>>),
    Sort(Option<SortDirection>, RpcReplyPort<SortDirection>),
    List(RpcReplyPort<Vec<Repository>>),
    Contains(String, RpcReplyPort<bool>),
}

#[ractor::async_trait]
impl Actor for BookmarkActor {
    type Msg = BookmarkMessage;
    type State = BookmarkStore;
    type Arguments = BookmarkActorArgs;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> std::result::Result<Self::State, ActorProcessingErr> {
        info!("Bookmark store starting");
        Ok(BookmarkStore::new(args.backend, args.notices))
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        store: &mut Self::State,
    ) -> std::result::Result<(), ActorProcessingErr> {
        match message {
            BookmarkMessage::Load(reply) => {
                let result = store.load().await;
                reply_with(reply, result);
            }
            BookmarkMessage::Save(repo, reply) => {
                let result = store.save(repo);
                reply_with(reply, result);
            }
            BookmarkMessage::Remove(id, reply) => {
                let removed = store.remove(&id);
                reply_with(reply, removed);
            }
            BookmarkMessage::Toggle(repo, reply) => {
                let result = store.toggle(repo);
                reply_with(reply, result);
            }
            BookmarkMessage::Sort(direction, reply) => {
                let applied = store.sort(direction);
                debug!(?applied, "Sorted saved repos");
                reply_with(reply, applied);
            }
            BookmarkMessage::List(reply) => {
                reply_with(reply, store.repos().to_vec());
            }
            BookmarkMessage::Contains(id, reply) => {
                reply_with(reply, store.contains(&id));
            }
        }

        Ok(())
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        store: &mut Self::State,
    ) -> std::result::Result<(), ActorProcessingErr> {
        info!(saved = store.len(), "Bookmark store stopped");
        Ok(())
    }
}

fn reply_with<T: Send + 'static>(reply: RpcReplyPort<T>, value: T) {
    if !reply.is_closed() {
        let _ = reply.send(value);
    }
}
