//! Client side of the read-only repository API.

use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::ApiError;
use crate::history::Commit;

/// Branch used for tree and file requests unless configured otherwise.
pub const DEFAULT_BRANCH: &str = "main";
/// Base URL of the public API.
pub const DEFAULT_API_URL: &str = "https://api.rchung.dev";

/// The four endpoints the viewer consumes. Implementations must be usable
/// from worker threads.
pub trait RepoApi: Send + Sync {
    /// `GET /repo/list`
    fn list_repositories(&self) -> Result<Vec<String>, ApiError>;
    /// `GET /repo/{repo}/tree/{branch}/`
    fn list_files(&self, repo: &str, branch: &str) -> Result<Vec<String>, ApiError>;
    /// `GET /repo/{repo}/history`
    fn history(&self, repo: &str) -> Result<Vec<Commit>, ApiError>;
    /// `GET /repo/{repo}/file/{branch}/{path}`
    fn file_content(&self, repo: &str, branch: &str, path: &str) -> Result<String, ApiError>;
}

#[derive(Deserialize)]
struct TreeData {
    files: Vec<String>,
}

#[derive(Deserialize)]
struct FileData {
    content: String,
}

/// Blocking HTTP implementation backed by a shared `ureq` agent.
#[derive(Clone)]
pub struct HttpApi {
    agent: ureq::Agent,
    base: Url,
}

impl HttpApi {
    /// Creates a client for the API rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            agent: builder.build(),
            base,
        })
    }

    pub const fn base(&self) -> &Url {
        &self.base
    }

    /// Appends percent-encoded segments to the base URL.
    ///
    /// URL parsing has no encoding for `.` and `..` segments, so they are
    /// dropped: `a/../b` is requested as `a/b`. Tree listings never contain them.
    pub fn endpoint<'s, I>(&self, segments: I) -> Result<Url, ApiError>
    where
        I: IntoIterator<Item = &'s str>,
    {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ApiError::InvalidUrl(self.base.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, ApiError> {
        tracing::debug!(%url, "GET");
        let body = self
            .agent
            .get(url.as_str())
            .call()?
            .into_string()
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl RepoApi for HttpApi {
    fn list_repositories(&self) -> Result<Vec<String>, ApiError> {
        let url = self.endpoint(["repo", "list"])?;
        self.get_json(&url)
    }

    fn list_files(&self, repo: &str, branch: &str) -> Result<Vec<String>, ApiError> {
        // The tree endpoint is addressed with a trailing slash.
        let url = self.endpoint(["repo", repo, "tree", branch, ""])?;
        let data: TreeData = self.get_json(&url)?;
        Ok(data.files)
    }

    fn history(&self, repo: &str) -> Result<Vec<Commit>, ApiError> {
        let url = self.endpoint(["repo", repo, "history"])?;
        self.get_json(&url)
    }

    fn file_content(&self, repo: &str, branch: &str, path: &str) -> Result<String, ApiError> {
        let segments = ["repo", repo, "file", branch]
            .into_iter()
            .chain(path.split('/'));
        let url = self.endpoint(segments)?;
        let data: FileData = self.get_json(&url)?;
        Ok(data.content)
    }
}
