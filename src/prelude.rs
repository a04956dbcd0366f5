pub use crate::{
    ApiError, Commit, CommitHistoryView, ContentLoader, Fetch, FileTreeView, HttpApi,
    KeymapProfile, NodeId, NodeName, OpenNodes, PathForest, Phase, RepoApi, RepoTreeController,
    SidebarMode, TreeAction, TreeEvent, TreeGlyphs, TreeKeyBindings, TreeLabelProvider,
    TreeLabelRenderer, TreeModel, TreeNode, TreeRowContext, TreeScrollPolicy, TreeViewSnapshot,
    TreeViewState, TreeViewStyle, build_tree, present, tree_label_line,
};
