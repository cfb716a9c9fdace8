use crate::actors::SearchSnapshot;
use crate::models::{Repository, SortDirection};
use crate::notice::Notice;
use crate::store::MAX_BOOKMARKS;
use crate::types::GithubResponseRepository;
use chrono::{DateTime, Local};
use colored::*;

/// Group digits in threes, e.g. `26012` -> `26,012`
pub fn format_stars(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Creation timestamp in local time; unparseable input is shown as-is.
pub fn format_created(created_at: &str) -> String {
    match DateTime::parse_from_rfc3339(created_at) {
        Ok(ts) => ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => created_at.to_string(),
    }
}

fn repo_card(
    index: usize,
    full_name: &str,
    description: Option<&str>,
    language: &str,
    stars: u64,
    created_at: &str,
    saved: bool,
) -> String {
    let marker = if saved {
        "★".blue().bold()
    } else {
        "☆".dimmed()
    };
    let mut card = format!("{:>3}. {} {}", index, marker, full_name.blue());
    if let Some(description) = description.filter(|d| !d.is_empty()) {
        card.push_str(&format!("\n       {}", description));
    }
    let tags = format!(
        "{} · ★ {} · Created {}",
        if language.is_empty() { "-" } else { language },
        format_stars(stars),
        format_created(created_at)
    );
    card.push_str(&format!("\n       {}", tags.dimmed()));
    card
}

pub fn render_saved_list(repos: &[Repository], sort: Option<SortDirection>) -> String {
    let mut out = format!("{}\n", "My Favorite Repos".bold());
    out.push_str(&format!(
        "{}\n",
        format!("Save your top {} Github repos in one place.", MAX_BOOKMARKS).dimmed()
    ));

    if repos.is_empty() {
        out.push_str("\nYou have no saved repos yet. Type a phrase to search GitHub.\n");
        return out;
    }

    let arrow = match sort {
        Some(SortDirection::Descending) => "↓",
        _ => "↑",
    };
    out.push_str(&format!("{}\n", format!("Sort by stars {}  (:sort)", arrow).dimmed()));
    for (i, repo) in repos.iter().enumerate() {
        out.push_str(&repo_card(
            i + 1,
            &repo.full_name,
            Some(repo.url.as_str()),
            &repo.language,
            repo.stargazers_count,
            &repo.created_at,
            true,
        ));
        out.push('\n');
    }
    out
}

/// Search screen: banners, then either the loading line or the result cards.
pub fn render_search(snapshot: &SearchSnapshot, saved: &[Repository]) -> String {
    let mut out = String::new();

    if saved.len() >= MAX_BOOKMARKS {
        out.push_str(&format!(
            "{}\n",
            Notice::CapacityExceeded.message().on_red().white()
        ));
    }
    if snapshot.rate_limited {
        out.push_str(&format!(
            "{}\n",
            format!(
                "Try searching again in {} seconds.",
                snapshot.seconds_remaining
            )
            .italic()
            .yellow()
        ));
    }

    if snapshot.loading {
        out.push_str("Loading results...\n");
        return out;
    }

    for (i, item) in snapshot.results.iter().enumerate() {
        let is_saved = saved.iter().any(|r| r.id == item.id.to_string());
        out.push_str(&render_result(i + 1, item, is_saved));
        out.push('\n');
    }
    out
}

pub fn render_result(index: usize, item: &GithubResponseRepository, saved: bool) -> String {
    repo_card(
        index,
        &item.full_name,
        item.description.as_deref(),
        item.language.as_deref().unwrap_or_default(),
        item.stargazers_count,
        &item.created_at,
        saved,
    )
}

pub fn render_notice(notice: &Notice) -> String {
    let message = notice.message();
    match notice {
        Notice::LoadFailed { .. } | Notice::RemoveFailed { .. } => {
            format!("{} {}", "Error:".red().bold(), message)
        }
        Notice::CapacityExceeded | Notice::CapacityReached | Notice::RateLimited { .. } => {
            message.yellow().to_string()
        }
        Notice::BookmarksLoaded { .. } | Notice::ResultsUpdated { .. } => {
            message.green().to_string()
        }
    }
}

pub fn help() -> String {
    [
        "Type any text to search GitHub (results arrive after you pause typing).",
        "  :submit          search now with the current text",
        "  :results         show the current search results",
        "  :save <n>        save or unsave result number n",
        "  :unsave <id>     remove a saved repo by id",
        "  :list            show saved repos",
        "  :sort [asc|desc] sort saved repos by stars (toggles without argument)",
        "  :reload          reload saved repos from the backend",
        "  :status          show the search rate window",
        "  :help            this help",
        "  :quit            exit",
    ]
    .join("\n")
}
