use anyhow::Result;
use clap::Parser;
use colored::*;
use repo_bookmarks::actors::SearchSessionConfig;
use repo_bookmarks::backend::BackendClient;
use repo_bookmarks::cli::{Cli, Command};
use repo_bookmarks::display;
use repo_bookmarks::error::BookmarksError;
use repo_bookmarks::github::GitHubClient;
use repo_bookmarks::models::{Repository, SortDirection};
use repo_bookmarks::notice::{notice_channel, Notice};
use repo_bookmarks::session::Session;
use repo_bookmarks::store::Toggle;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    // Logs go to stderr so stdout stays the interactive screen
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    println!("{}", "GitHub Repo Bookmarks".bold().green());
    println!("{}\n", "=".repeat(50).dimmed());

    let backend = Arc::new(BackendClient::new(&cli.backend_url)?);
    let github = Arc::new(GitHubClient::new(&cli.github_api_url, cli.github_token.clone())?);
    let config = SearchSessionConfig {
        debounce: Duration::from_millis(cli.debounce_ms),
        ..Default::default()
    };

    let (notices, mut notice_rx) = notice_channel();
    let session = Session::start(config, backend, github, notices).await?;

    info!(backend = %cli.backend_url, "Starting client");

    if !cli.skip_load {
        // Timeouts and a dead store raise no LoadFailed notice, so log here too
        if let Err(e) = session.load_bookmarks().await {
            error!("Initial load failed: {}", e);
        }
    }
    show_saved(&session).await?;
    println!("{}\n", display::help().dimmed());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !handle_command(&session, Command::parse(&line)).await? {
                    break;
                }
            }
            Some(notice) = notice_rx.recv() => {
                println!("{}", display::render_notice(&notice));
                if matches!(notice, Notice::ResultsUpdated { .. }) {
                    show_results(&session).await?;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }

    session.shutdown();
    // Give in-flight backend calls a moment to land
    tokio::time::sleep(Duration::from_millis(200)).await;
    println!("{}", "Bye".dimmed());

    Ok(())
}

/// Returns false when the user asked to quit
async fn handle_command(session: &Session, command: Command) -> Result<bool> {
    match command {
        Command::Search(text) => session.text_changed(text)?,
        Command::Submit => session.submit()?,
        Command::Results => show_results(session).await?,
        Command::Toggle(index) => {
            let snapshot = session.snapshot().await?;
            let Some(item) = snapshot.results.get(index - 1) else {
                println!("{}", format!("No result number {}", index).red());
                return Ok(true);
            };
            let repo = Repository::from(item);
            let name = repo.full_name.clone();
            match session.toggle(repo).await {
                Ok(Toggle::Saved) => println!("Saved {}", name.blue()),
                Ok(Toggle::Removed) => println!("Unsaved {}", name.blue()),
                // The capacity notice is printed from the notice channel.
                Err(BookmarksError::CapacityExceeded(_)) => {}
                Err(e) => println!("{}", e.to_string().red()),
            }
        }
        Command::Unsave(id) => {
            if session.remove(&id).await? {
                println!("Unsaved {}", id.blue());
            } else {
                println!("{}", format!("{} is not saved", id).red());
            }
        }
        Command::List => show_saved(session).await?,
        Command::Sort(direction) => {
            let applied = session.sort(direction).await?;
            info!(?applied, "Sorted saved repos");
            show_saved_sorted(session, Some(applied)).await?;
        }
        Command::Reload => {
            if let Err(e) = session.load_bookmarks().await {
                error!("Reload failed: {}", e);
            }
            show_saved(session).await?;
        }
        Command::Status => {
            let snapshot = session.snapshot().await?;
            println!(
                "{} searches this minute, window resets in {} s{}",
                snapshot.search_count,
                snapshot.seconds_remaining,
                if snapshot.rate_limited { " (over quota)" } else { "" }
            );
        }
        Command::Help => println!("{}", display::help()),
        Command::Quit => return Ok(false),
        Command::Invalid(message) => println!("{}", message.red()),
    }
    Ok(true)
}

async fn show_saved(session: &Session) -> Result<()> {
    show_saved_sorted(session, None).await
}

async fn show_saved_sorted(session: &Session, sort: Option<SortDirection>) -> Result<()> {
    let repos = session.bookmarks().await?;
    println!("{}", display::render_saved_list(&repos, sort));
    Ok(())
}

async fn show_results(session: &Session) -> Result<()> {
    let snapshot = session.snapshot().await?;
    let saved = session.bookmarks().await?;
    print!("{}", display::render_search(&snapshot, &saved));
    Ok(())
}
