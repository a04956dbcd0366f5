//! Tracing subscriber setup. The terminal belongs to the UI, so everything is
//! written to a file.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// `~/.cache/repotree/repotree.log`
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|p| p.join("repotree").join("repotree.log"))
}

/// Installs the global subscriber writing to `path`.
pub fn init(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    build_subscriber(file)
        .try_init()
        .context("installing tracing subscriber")
}

/// Filter from `RUST_LOG`, `info` when unset.
pub fn build_subscriber(log_file: File) -> impl tracing::Subscriber + Send + Sync {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer().with_ansi(false).with_writer(Arc::new(log_file));

    tracing_subscriber::registry().with(fmt_layer).with(env_filter)
}
