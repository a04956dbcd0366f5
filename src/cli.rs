use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, ValueHint};
use clap_complete::{Shell, generate};

use crate::config::Config;

/// repotree - browse the files and history of a remote repository
#[derive(Parser, Debug)]
#[command(name = "repotree", version, about, long_about = None)]
pub struct Args {
    /// Repository to open. Without one, a repository picker is shown.
    #[arg(value_hint = ValueHint::Other)]
    pub repo: Option<String>,

    /// Base URL of the repository API
    #[arg(long, value_hint = ValueHint::Url)]
    pub api_url: Option<String>,

    /// Branch used for the file tree and file contents
    #[arg(long)]
    pub branch: Option<String>,

    /// Config file to read instead of the default location
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Log file (defaults to the user cache directory)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Generate shell completions
    #[arg(long, value_enum)]
    pub completions: Option<Shell>,
}

impl Args {
    /// Overrides config values with the flags that were given.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(url) = &self.api_url {
            config.api_url.clone_from(url);
        }
        if let Some(branch) = &self.branch {
            config.branch.clone_from(branch);
        }
        config
    }
}

/// Generate shell completions to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Args::command();
    generate(shell, &mut cmd, "repotree", &mut io::stdout());
}
