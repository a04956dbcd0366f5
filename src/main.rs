use std::io::{self, stdout};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;

use tui_repotree::api::HttpApi;
use tui_repotree::app::App;
use tui_repotree::cli::{self, Args};
use tui_repotree::{config, logging};

fn main() -> Result<()> {
    let args = Args::parse();

    // Handle shell completion generation
    if let Some(shell) = args.completions {
        cli::generate_completions(shell);
        return Ok(());
    }

    if let Some(path) = args.log_file.clone().or_else(logging::default_log_path) {
        logging::init(&path)?;
    }

    let config = args.apply(
        args.config
            .as_deref()
            .map_or_else(config::load, config::load_from),
    );
    let api = HttpApi::new(&config.api_url, config.request_timeout())
        .with_context(|| format!("invalid api url {}", config.api_url))?;
    tracing::info!(api = %api.base(), branch = %config.branch, "starting");

    let mut app = App::new(Arc::new(api), &config);
    match &args.repo {
        Some(repo) => app.open_repo(repo),
        None => app.open_picker(),
    }

    let mut terminal = ratatui::init();
    let result = with_mouse_capture(
        || execute!(stdout(), EnableMouseCapture),
        || app.run(&mut terminal),
        || {
            let _ = execute!(stdout(), DisableMouseCapture);
        },
    );
    ratatui::restore();
    result.context("running terminal ui")
}

/// Runs `body` with mouse capture when the terminal allows it; the app stays
/// usable from the keyboard otherwise.
fn with_mouse_capture<T>(
    enable: impl FnOnce() -> io::Result<()>,
    body: impl FnOnce() -> T,
    disable: impl FnOnce(),
) -> T {
    let captured = match enable() {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "mouse capture unavailable");
            false
        }
    };
    let result = body();
    if captured {
        disable();
    }
    result
}
