//! Terminal browser for a read-only repository hosting API.
//!
//! The flat path list of a repository becomes a [`tree::PathForest`] shown by
//! [`widget::FileTreeView`]; expansion and selection live in
//! [`state::TreeViewState`]. [`controller::RepoTreeController`] ties the tree,
//! the commit history, and the selected file together, and
//! [`app::App`] drives it from terminal events and background fetches.

pub mod action;
pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod fetch;
pub mod glyphs;
pub mod history;
pub mod keymap;
pub mod loader;
pub mod logging;
pub mod model;
pub mod prelude;
pub mod request;
pub mod state;
pub mod style;
pub mod tree;
pub mod ui;
pub mod widget;
pub mod worker;

#[cfg(test)]
mod test_utils;

pub use action::{TreeAction, TreeEvent};
pub use api::{HttpApi, RepoApi};
pub use context::TreeRowContext;
pub use controller::{Phase, RepoTreeController, SidebarMode};
pub use error::ApiError;
pub use fetch::Fetch;
pub use glyphs::{NodeName, TreeGlyphs, TreeLabelProvider, TreeLabelRenderer, tree_label_line};
pub use history::{Commit, CommitHistoryView, present};
pub use keymap::{KeymapProfile, TreeKeyBindings};
pub use loader::ContentLoader;
pub use model::TreeModel;
pub use state::{OpenNodes, TreeViewSnapshot, TreeViewState};
pub use style::{TreeScrollPolicy, TreeViewStyle};
pub use tree::{NodeId, PathForest, TreeNode, build_tree};
pub use widget::FileTreeView;
