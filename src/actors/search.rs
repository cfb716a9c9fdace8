use crate::debounce::{Debouncer, DEFAULT_DEBOUNCE};
use crate::github::RepositorySearch;
use crate::notice::{Notice, NoticeSender};
use crate::rate_limit::RateLimitWindow;
use crate::types::GithubResponseRepository;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Configuration for a search session
#[derive(Debug, Clone)]
pub struct SearchSessionConfig {
    /// Quiet period before a typed query is sent
    pub debounce: Duration,
    /// Countdown period of the rate-limit window
    pub tick_interval: Duration,
}

impl Default for SearchSessionConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            tick_interval: Duration::from_secs(1),
        }
    }
}

/// The search screen: debounced dispatch gated by the rate-limit window
pub struct SearchSession;

pub struct SearchSessionArgs {
    pub search: Arc<dyn RepositorySearch>,
    pub notices: NoticeSender,
    pub config: SearchSessionConfig,
}

pub struct SearchSessionState {
    search: Arc<dyn RepositorySearch>,
    notices: NoticeSender,
    window: RateLimitWindow,
    debouncer: Debouncer,
    query: String,
    results: Vec<GithubResponseRepository>,
    loading: bool,
    latest_seq: u64,
    ticker: Option<JoinHandle<()>>,
}

/// Messages the search session can handle
pub enum SearchMessage {
    /// The search box text changed
    TextChanged(String),
    /// The user pressed enter
    Submit,
    DebounceElapsed { generation: u64 },
    SearchCompleted {
        seq: u64,
        query: String,
        outcome: std::result::Result<Vec<GithubResponseRepository>, String>,
    },
    /// One second of the rate-limit countdown
    Tick,
    GetSnapshot(RpcReplyPort<SearchSnapshot>),
}

/// Read-only view of the search screen
#[derive(Debug, Clone)]
pub struct SearchSnapshot {
    pub query: String,
    pub loading: bool,
    pub results: Vec<GithubResponseRepository>,
    pub search_count: u32,
    pub seconds_remaining: u32,
    pub rate_limited: bool,
    pub latest_seq: u64,
}

#[ractor::async_trait]
impl Actor for SearchSession {
    type Msg = SearchMessage;
    type State = SearchSessionState;
    type Arguments = SearchSessionArgs;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> std::result::Result<Self::State, ActorProcessingErr> {
        info!("Search session starting");

        let period = args.config.tick_interval;
        let ticker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await; // Skip first immediate tick

            loop {
                interval.tick().await;
                if myself.send_message(SearchMessage::Tick).is_err() {
                    break;
                }
            }
        });

        Ok(SearchSessionState {
            search: args.search,
            notices: args.notices,
            window: RateLimitWindow::new(),
            debouncer: Debouncer::new(args.config.debounce),
            query: String::new(),
            results: Vec::new(),
            loading: false,
            latest_seq: 0,
            ticker: Some(ticker),
        })
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> std::result::Result<(), ActorProcessingErr> {
        match message {
            SearchMessage::TextChanged(text) => {
                state.query = text.clone();
                state.loading = true;

                let generation = state.debouncer.schedule(text);
                let delay = state.debouncer.delay();
                let session = myself.clone();
                let timer = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = session.send_message(SearchMessage::DebounceElapsed { generation });
                });
                state.debouncer.arm(timer);
            }

            SearchMessage::Submit => {
                state.loading = true;
                // Whatever was pending is replaced by the current text.
                state.debouncer.flush();
                let query = state.query.clone();
                self.dispatch(&myself, state, query);
            }

            SearchMessage::DebounceElapsed { generation } => {
                match state.debouncer.fire(generation) {
                    Some(query) => self.dispatch(&myself, state, query),
                    None => debug!(generation, "Superseded debounce timer ignored"),
                }
            }

            SearchMessage::SearchCompleted { seq, query, outcome } => {
                if seq != state.latest_seq {
                    debug!(
                        seq,
                        latest = state.latest_seq,
                        %query,
                        "Discarding stale search response"
                    );
                    return Ok(());
                }

                state.loading = false;
                match outcome {
                    Ok(items) => {
                        debug!(seq, %query, count = items.len(), "Search results applied");
                        let count = items.len();
                        state.results = items;
                        let _ = state.notices.send(Notice::ResultsUpdated { query, count });
                    }
                    // Logged only; the previous results stay on screen.
                    Err(reason) => error!(seq, %query, "Search failed: {}", reason),
                }
            }

            SearchMessage::Tick => {
                if state.window.tick() {
                    debug!("Search rate window reset");
                }
            }

            SearchMessage::GetSnapshot(reply) => {
                let snapshot = SearchSnapshot {
                    query: state.query.clone(),
                    loading: state.loading,
                    results: state.results.clone(),
                    search_count: state.window.search_count(),
                    seconds_remaining: state.window.seconds_remaining(),
                    rate_limited: state.window.is_over_quota(),
                    latest_seq: state.latest_seq,
                };
                if !reply.is_closed() {
                    let _ = reply.send(snapshot);
                }
            }
        }

        Ok(())
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> std::result::Result<(), ActorProcessingErr> {
        if let Some(ticker) = state.ticker.take() {
            ticker.abort();
        }
        state.debouncer.cancel();
        info!(
            searches_in_window = state.window.search_count(),
            "Search session stopped"
        );
        Ok(())
    }
}

impl SearchSession {
    fn dispatch(&self, myself: &ActorRef<SearchMessage>, state: &mut SearchSessionState, query: String) {
        state.window.record_search();
        state.latest_seq += 1;
        let seq = state.latest_seq;

        if state.window.is_over_quota() {
            warn!(
                searches = state.window.search_count(),
                seconds_remaining = state.window.seconds_remaining(),
                "Search quota exceeded for this window"
            );
            let _ = state.notices.send(Notice::RateLimited {
                seconds_remaining: state.window.seconds_remaining(),
            });
        }

        debug!(seq, %query, "Dispatching search");

        let search = Arc::clone(&state.search);
        let session = myself.clone();
        tokio::spawn(async move {
            let outcome = search
                .search_repositories(&query)
                .await
                .map_err(|e| e.to_string());
            let _ = session.send_message(SearchMessage::SearchCompleted { seq, query, outcome });
        });
    }
}
