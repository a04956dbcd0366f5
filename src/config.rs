//! User settings read from `~/.config/repotree/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::{DEFAULT_API_URL, DEFAULT_BRANCH};
use crate::keymap::KeymapProfile;

pub const MIN_SIDEBAR_WIDTH: u16 = 10;
pub const MAX_SIDEBAR_WIDTH: u16 = 90;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub branch: String,
    pub keymap: KeymapProfile,
    pub ascii_glyphs: bool,
    pub draw_guides: bool,
    /// Sidebar share of the terminal width, in percent.
    pub sidebar_width: u16,
    /// Show the failure reason in a pane instead of rendering it as empty.
    pub show_fetch_errors: bool,
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            keymap: KeymapProfile::Default,
            ascii_glyphs: false,
            draw_guides: true,
            sidebar_width: 25,
            show_fetch_errors: false,
            request_timeout_secs: None,
        }
    }
}

impl Config {
    pub fn sidebar_percent(&self) -> u16 {
        self.sidebar_width.clamp(MIN_SIDEBAR_WIDTH, MAX_SIDEBAR_WIDTH)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Returns the path to the config file: `~/.config/repotree/config.toml`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("repotree").join("config.toml"))
}

/// Load configuration from the default location. Returns default if the file
/// is missing or invalid.
pub fn load() -> Config {
    config_path().map_or_else(Config::default, |path| load_from(&path))
}

pub fn load_from(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), error = %err, "ignoring invalid config");
            Config::default()
        }),
        Err(_) => Config::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_url, "https://api.rchung.dev");
        assert_eq!(config.branch, "main");
        assert!(config.draw_guides);
        assert!(!config.show_fetch_errors);
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let partial = r#"
            branch = "dev"
            keymap = "vim"
        "#;

        let config: Config = toml::from_str(partial).unwrap();
        assert_eq!(config.branch, "dev");
        assert_eq!(config.keymap, KeymapProfile::Vim);
        assert_eq!(config.sidebar_width, 25);
    }

    #[test]
    fn test_sidebar_width_is_clamped() {
        let mut config = Config {
            sidebar_width: 3,
            ..Config::default()
        };
        assert_eq!(config.sidebar_percent(), 10);
        config.sidebar_width = 100;
        assert_eq!(config.sidebar_percent(), 90);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_url = \"http://localhost:9000\"\nrequest_timeout_secs = 3").unwrap();

        let config = load_from(file.path());
        assert_eq!(config.api_url, "http://localhost:9000");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_invalid_or_missing_file_returns_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not valid toml {{{{").unwrap();
        assert_eq!(load_from(file.path()), Config::default());

        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_from(&dir.path().join("absent.toml")), Config::default());
    }
}
