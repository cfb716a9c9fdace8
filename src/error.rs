use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookmarksError {
    #[error("GitHub API error: {0}")]
    ApiError(String),

    #[error("Backend error: {0}")]
    BackendError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Bookmark limit reached: cannot save more than {0} repositories")]
    CapacityExceeded(usize),

    #[error("Repository already saved: {0}")]
    AlreadySaved(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Actor error: {0}")]
    ActorError(String),
}

pub type Result<T> = std::result::Result<T, BookmarksError>;
