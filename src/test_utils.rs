//! Shared fixtures for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use ratatui::buffer::Buffer;

use crate::api::RepoApi;
use crate::error::ApiError;
use crate::history::Commit;

/// Rows of a rendered buffer as plain strings.
pub fn buffer_lines(buffer: &Buffer) -> Vec<String> {
    buffer
        .content()
        .chunks(buffer.area.width as usize)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect())
        .collect()
}

pub fn commit(id: &str) -> Commit {
    Commit {
        author: format!("author-{id}"),
        commit: id.to_string(),
        message: format!("message {id}"),
    }
}

/// In-memory API. Unknown repositories and files fail the way the HTTP
/// client would; every call is recorded.
#[derive(Default)]
pub struct FakeApi {
    pub repos: Vec<String>,
    pub files: HashMap<String, Vec<String>>,
    pub commits: HashMap<String, Vec<Commit>>,
    pub contents: HashMap<(String, String), String>,
    pub requests: Mutex<Vec<String>>,
}

impl FakeApi {
    /// A repository `demo` with a small tree, two commits, and two files.
    pub fn demo() -> Self {
        let mut api = Self {
            repos: vec!["demo".to_string(), "other".to_string()],
            ..Self::default()
        };
        api.files.insert(
            "demo".to_string(),
            ["README.md", "src/index.ts", "src/utils/a.ts", "src/utils/b.ts", ".git/config"]
                .map(String::from)
                .to_vec(),
        );
        api.commits
            .insert("demo".to_string(), vec![commit("aaa111"), commit("bbb222")]);
        api.contents.insert(
            ("demo".to_string(), "README.md".to_string()),
            "# demo\n".to_string(),
        );
        api.contents.insert(
            ("demo".to_string(), "src/index.ts".to_string()),
            "export {};\n".to_string(),
        );
        api.contents
            .insert(("demo".to_string(), "EMPTY".to_string()), String::new());
        api
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn record(&self, request: String) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
    }
}

impl RepoApi for FakeApi {
    fn list_repositories(&self) -> Result<Vec<String>, ApiError> {
        self.record("list".to_string());
        Ok(self.repos.clone())
    }

    fn list_files(&self, repo: &str, branch: &str) -> Result<Vec<String>, ApiError> {
        self.record(format!("tree {repo} {branch}"));
        self.files
            .get(repo)
            .cloned()
            .ok_or(ApiError::Status { code: 404 })
    }

    fn history(&self, repo: &str) -> Result<Vec<Commit>, ApiError> {
        self.record(format!("history {repo}"));
        self.commits
            .get(repo)
            .cloned()
            .ok_or_else(|| ApiError::Transport("connection refused".to_string()))
    }

    fn file_content(&self, repo: &str, branch: &str, path: &str) -> Result<String, ApiError> {
        self.record(format!("file {repo} {branch} {path}"));
        self.contents
            .get(&(repo.to_string(), path.to_string()))
            .cloned()
            .ok_or(ApiError::Status { code: 500 })
    }
}
