use tokio::sync::mpsc;

use crate::rate_limit::SEARCHES_PER_WINDOW;
use crate::store::MAX_BOOKMARKS;

/// User-visible advisories and alerts raised by the store and the search session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    BookmarksLoaded { count: usize },
    LoadFailed { reason: String },
    RemoveFailed { id: String },
    CapacityExceeded,
    CapacityReached,
    RateLimited { seconds_remaining: u32 },
    ResultsUpdated { query: String, count: usize },
}

pub type NoticeSender = mpsc::UnboundedSender<Notice>;
pub type NoticeReceiver = mpsc::UnboundedReceiver<Notice>;

pub fn notice_channel() -> (NoticeSender, NoticeReceiver) {
    mpsc::unbounded_channel()
}

impl Notice {
    /// Alerts interrupt the user; everything else is a banner or status line.
    pub fn is_alert(&self) -> bool {
        matches!(self, Notice::LoadFailed { .. } | Notice::RemoveFailed { .. })
    }

    pub fn message(&self) -> String {
        match self {
            Notice::BookmarksLoaded { count } => format!("Loaded {} saved repos.", count),
            Notice::LoadFailed { .. } => {
                "Could not fetch saved repos. Please try again later.".to_string()
            }
            Notice::RemoveFailed { .. } => {
                "Could not unsave this repo. Please try again later.".to_string()
            }
            Notice::CapacityExceeded => format!(
                "You cannot save more than {} repositories at a time. Try unsaving some before saving more.",
                MAX_BOOKMARKS
            ),
            Notice::CapacityReached => format!(
                "You've saved the maximum number of {} repos! Unsave some to save more.",
                MAX_BOOKMARKS
            ),
            Notice::RateLimited { seconds_remaining } => format!(
                "Sorry, we can only process {} searches per minute. Try searching again in {} seconds.",
                SEARCHES_PER_WINDOW, seconds_remaining
            ),
            Notice::ResultsUpdated { query, count } => {
                format!("{} results for \"{}\"", count, query)
            }
        }
    }
}
