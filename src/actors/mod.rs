pub mod bookmarks;
pub mod search;

pub use bookmarks::{BookmarkActor, BookmarkActorArgs, BookmarkMessage};
pub use search::{SearchMessage, SearchSession, SearchSessionArgs, SearchSessionConfig, SearchSnapshot};
