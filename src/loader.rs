use crate::api::{DEFAULT_BRANCH, RepoApi};
use crate::fetch::Fetch;

/// Loads the text of a single file on a fixed branch.
///
/// A missing file, a failed request, and a genuinely empty file all come back
/// from [`ContentLoader::load_content`] as `""`. Use [`ContentLoader::fetch`]
/// when the difference matters; never infer existence from the length.
pub struct ContentLoader<'a, A: RepoApi + ?Sized> {
    api: &'a A,
    branch: &'a str,
}

impl<'a, A: RepoApi + ?Sized> ContentLoader<'a, A> {
    pub const fn new(api: &'a A) -> Self {
        Self {
            api,
            branch: DEFAULT_BRANCH,
        }
    }

    #[must_use]
    pub const fn on_branch(mut self, branch: &'a str) -> Self {
        self.branch = branch;
        self
    }

    pub const fn branch(&self) -> &str {
        self.branch
    }

    /// Issues one request and settles it; failures are logged, never returned.
    pub fn fetch(&self, repo: &str, path: &str) -> Fetch<String> {
        let _span = tracing::debug_span!("load_content", repo, path, branch = self.branch).entered();
        Fetch::settle(
            self.api.file_content(repo, self.branch, path),
            "file content",
        )
    }

    /// File text, or `""` on any failure.
    pub fn load_content(&self, repo: &str, path: &str) -> String {
        self.fetch(repo, path).into_value()
    }
}
