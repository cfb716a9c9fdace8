use crate::backend::DEFAULT_BACKEND_URL;
use crate::github::DEFAULT_API_BASE_URL;
use crate::models::SortDirection;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "repo-bookmarks")]
#[command(about = "Search GitHub repositories and keep your top ten bookmarked")]
#[command(version)]
pub struct Cli {
    /// Bookmark backend base URL
    #[arg(long, env = "BACKEND_URL", default_value = DEFAULT_BACKEND_URL)]
    pub backend_url: String,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_BASE_URL)]
    pub github_api_url: String,

    /// Optional GitHub token
    #[arg(long, env = "GITHUB_TOKEN")]
    pub github_token: Option<String>,

    /// Quiet period in milliseconds before a typed search is sent
    #[arg(long, env = "SEARCH_DEBOUNCE_MS", default_value_t = 500)]
    pub debounce_ms: u64,

    /// Start with an empty list instead of loading from the backend
    #[arg(long)]
    pub skip_load: bool,
}

/// One line of interactive input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text: the search box changed
    Search(String),
    Submit,
    Results,
    /// 1-based index into the current results
    Toggle(usize),
    Unsave(String),
    List,
    Sort(Option<SortDirection>),
    Reload,
    Status,
    Help,
    Quit,
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let line = line.trim_end_matches(['\r', '\n']);
        let Some(rest) = line.strip_prefix(':') else {
            return Command::Search(line.to_string());
        };

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();
        if parts.next().is_some() {
            return Command::Invalid(format!("Too many arguments: {}", line));
        }

        match (name, arg) {
            ("submit" | "s", None) => Command::Submit,
            ("results" | "r", None) => Command::Results,
            ("save", Some(n)) => match n.parse::<usize>() {
                Ok(n) if n > 0 => Command::Toggle(n),
                _ => Command::Invalid(format!("Not a result number: {}", n)),
            },
            ("unsave", Some(id)) => Command::Unsave(id.to_string()),
            ("list" | "l" | "home", None) => Command::List,
            ("sort", None) => Command::Sort(None),
            ("sort", Some("asc" | "ascending")) => Command::Sort(Some(SortDirection::Ascending)),
            ("sort", Some("desc" | "descending")) => {
                Command::Sort(Some(SortDirection::Descending))
            }
            ("reload", None) => Command::Reload,
            ("status", None) => Command::Status,
            ("help" | "h" | "?", None) => Command::Help,
            ("quit" | "q" | "exit", None) => Command::Quit,
            _ => Command::Invalid(format!("Unknown command: {}", line)),
        }
    }
}
