mod action;
mod app;
mod config;
mod controller;
mod error;
mod event;
mod github;
mod guard;
mod source;
mod state;
mod tui;
mod types;
mod ui;

use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::app::App;
use crate::config::Config;
use crate::event::Event;
use crate::github::GitHub;
use crate::source::RepoSource;
use crate::tui::EventHandler;
use crate::types::CategoryKey;

/// Browse the most-starred GitHub repositories by language.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Language to show first (defaults to the configured default, "All")
    #[arg(short, long)]
    language: Option<String>,

    /// Read configuration from this file instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the repositories for one language as JSON and exit
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };

    let initial = cli
        .language
        .as_deref()
        .map(CategoryKey::from)
        .unwrap_or_else(|| config.default_language());

    let github: Arc<dyn RepoSource> = Arc::new(GitHub::new(&config.github)?);

    if cli.json {
        return print_json(github, &initial).await;
    }

    // Restore the terminal before the panic message is printed
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let result = run(github, &config, initial).await;

    tui::restore()?;

    result
}

async fn print_json(
    source: Arc<dyn RepoSource>,
    key: &CategoryKey,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", popular_json(source, key).await?);
    Ok(())
}

async fn popular_json(source: Arc<dyn RepoSource>, key: &CategoryKey) -> error::Result<String> {
    let repos = source.fetch_popular(key).await?;
    Ok(serde_json::to_string_pretty(&repos)?)
}

async fn run(
    source: Arc<dyn RepoSource>,
    config: &Config,
    initial: CategoryKey,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = tui::init()?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    let mut app = App::new(source, action_tx.clone(), config, initial);
    app.start();

    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(config.tick_rate(), render_rate);

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
