//! Per-repository view state and the reactions to user input and fetch replies.

use crate::api::DEFAULT_BRANCH;
use crate::fetch::Fetch;
use crate::history::{Commit, present};
use crate::request::{Generations, Job, Payload, Reply, Request, Resource};
use crate::state::TreeViewState;
use crate::tree::{NodeId, PathForest, build_tree};

/// Whether the repository view is still waiting for its initial data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
}

/// Loading flag of one resource plus the reason of its last failure.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

impl Status {
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    fn settled<T>(fetch: &Fetch<T>) -> Self {
        fetch
            .failure()
            .map_or(Self::Loaded, |reason| Self::Failed(reason.to_string()))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SidebarMode {
    #[default]
    Tree,
    History,
}

/// The file whose content is shown in the main pane.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content: String,
    pub status: Status,
}

pub struct RepoTreeController {
    repo: Option<String>,
    branch: String,
    forest: PathForest,
    tree_state: TreeViewState<NodeId>,
    commits: Vec<Commit>,
    tree_status: Status,
    history_status: Status,
    mode: SidebarMode,
    file: SelectedFile,
    generations: Generations,
}

impl Default for RepoTreeController {
    fn default() -> Self {
        Self::new(DEFAULT_BRANCH)
    }
}

impl RepoTreeController {
    pub fn new(branch: impl Into<String>) -> Self {
        Self {
            repo: None,
            branch: branch.into(),
            forest: PathForest::default(),
            tree_state: TreeViewState::new(),
            commits: Vec::new(),
            tree_status: Status::Idle,
            history_status: Status::Idle,
            mode: SidebarMode::Tree,
            file: SelectedFile::default(),
            generations: Generations::default(),
        }
    }

    pub fn repo(&self) -> Option<&str> {
        self.repo.as_deref()
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub const fn forest(&self) -> &PathForest {
        &self.forest
    }

    pub const fn tree_state(&self) -> &TreeViewState<NodeId> {
        &self.tree_state
    }

    pub const fn tree_state_mut(&mut self) -> &mut TreeViewState<NodeId> {
        &mut self.tree_state
    }

    /// Forest and tree state together, for rendering and key handling.
    pub const fn tree_parts(&mut self) -> (&PathForest, &mut TreeViewState<NodeId>) {
        (&self.forest, &mut self.tree_state)
    }

    /// Commits in presentation order (newest first).
    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    pub const fn tree_status(&self) -> &Status {
        &self.tree_status
    }

    pub const fn history_status(&self) -> &Status {
        &self.history_status
    }

    pub const fn mode(&self) -> SidebarMode {
        self.mode
    }

    pub const fn file(&self) -> &SelectedFile {
        &self.file
    }

    pub const fn phase(&self) -> Phase {
        if self.tree_status.is_loading() || self.history_status.is_loading() {
            Phase::Loading
        } else {
            Phase::Ready
        }
    }

    /// Makes `repo` the active repository. Everything from the previous one
    /// is dropped, including any reply still in flight for it.
    pub fn activate(&mut self, repo: &str) -> [Job; 2] {
        tracing::info!(repo, branch = %self.branch, "activating repository");
        let draw_lines = self.tree_state.draw_lines();
        let profile = self.tree_state.keymap_mut().profile();

        self.repo = Some(repo.to_string());
        self.forest = PathForest::empty(repo);
        self.tree_state = TreeViewState::new();
        self.tree_state.set_draw_lines(draw_lines);
        self.tree_state.keymap_mut().set_profile(profile);
        self.commits.clear();
        self.file = SelectedFile::default();
        self.tree_status = Status::Loading;
        self.history_status = Status::Loading;

        // Supersede a content request of the previous repository.
        self.generations.issue(Resource::Content);
        [
            Job {
                ticket: self.generations.issue(Resource::Tree),
                request: Request::Tree {
                    repo: repo.to_string(),
                    branch: self.branch.clone(),
                },
            },
            Job {
                ticket: self.generations.issue(Resource::History),
                request: Request::History {
                    repo: repo.to_string(),
                },
            },
        ]
    }

    /// Refetches the active repository from scratch.
    pub fn reload(&mut self) -> Option<[Job; 2]> {
        let repo = self.repo.clone()?;
        Some(self.activate(&repo))
    }

    /// Applies one reply. Returns `false` when the reply was stale.
    pub fn apply(&mut self, reply: Reply) -> bool {
        if !self.generations.is_current(reply.ticket) {
            tracing::debug!(ticket = ?reply.ticket, "discarding stale reply");
            return false;
        }
        match reply.payload {
            Payload::Tree(files) => {
                self.tree_status = Status::settled(&files);
                let label = self.repo.as_deref().unwrap_or_default();
                self.forest = build_tree(files.into_value(), label);
                self.tree_state.invalidate();
                tracing::debug!(nodes = self.forest.len(), "file tree ready");
            }
            Payload::History(commits) => {
                self.history_status = Status::settled(&commits);
                self.commits = present(&commits.into_value());
                tracing::debug!(commits = self.commits.len(), "history ready");
            }
            Payload::Content { name, content } => {
                let status = Status::settled(&content);
                self.file = SelectedFile {
                    name,
                    content: content.into_value(),
                    status,
                };
            }
            Payload::Repositories(_) => return false,
        }
        true
    }

    pub const fn toggle_view(&mut self) {
        self.mode = match self.mode {
            SidebarMode::Tree => SidebarMode::History,
            SidebarMode::History => SidebarMode::Tree,
        };
    }

    /// A directory toggles open; a file starts loading its content.
    pub fn activate_node(&mut self, id: NodeId) -> Option<Job> {
        let node = self.forest.node(id)?;
        if node.is_dir() {
            let key = node.id.clone();
            self.tree_state.toggle(&key);
            return None;
        }
        let repo = self.repo.clone()?;
        let request = Request::Content {
            repo,
            branch: self.branch.clone(),
            path: node.path.clone(),
            name: node.name.clone(),
        };
        tracing::debug!(path = %node.path, "loading file");
        self.file.status = Status::Loading;
        Some(Job {
            ticket: self.generations.issue(Resource::Content),
            request,
        })
    }

    /// Selects visible row `row` and activates the node there.
    pub fn activate_row(&mut self, row: usize) -> Option<Job> {
        self.tree_state.ensure_visible_nodes(&self.forest);
        let id = self.tree_state.select_row(row)?;
        self.activate_node(id)
    }
}
