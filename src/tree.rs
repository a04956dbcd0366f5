//! Forest construction from the flat path list returned by the tree endpoint.
//!
//! Paths are scanned left to right. Directories are created lazily the first
//! time a path references them and are shared by every later path with the
//! same prefix; files are always new nodes. Sibling order is the order of
//! first occurrence in the input, never sorted.

use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::model::TreeModel;

/// Key prefix shared by every node id.
pub const ROOT_KEY: &str = "root";
/// Label used for a file whose final path segment is empty.
pub const UNNAMED_FILE: &str = "Unnamed File";
/// Label used for a directory whose path segment is empty.
pub const UNNAMED_FOLDER: &str = "Unnamed Folder";
/// Top-level entries that never appear in the tree.
pub const IGNORED_ROOTS: [&str; 2] = [".git", ".idea"];

/// Index of a node inside a [`PathForest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One entry of the displayed hierarchy. A node with no children is a file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeNode {
    /// Cumulative key (`root/<path>`), also the expansion-state key.
    pub id: String,
    /// Final path segment, never empty.
    pub name: String,
    /// Repository-relative path used when requesting file content.
    pub path: String,
    pub children: Vec<NodeId>,
}

impl TreeNode {
    #[inline]
    pub fn is_file(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Arena-backed forest: the children of an implicit root labelled with the
/// repository name.
#[derive(Clone, Debug, Default)]
pub struct PathForest {
    label: String,
    nodes: Vec<TreeNode>,
    roots: Vec<NodeId>,
}

impl PathForest {
    /// Creates an empty forest with the given root label.
    pub fn empty(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Label of the implicit root (the repository name).
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TreeNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (NodeId(idx), node))
    }

    /// Finds the node carrying the given key. A file and a directory can share
    /// a key (`a` next to `a/b`); the directory wins, then the first file.
    pub fn find(&self, key: &str) -> Option<NodeId> {
        let mut first_file = None;
        for (id, node) in self.iter().filter(|(_, node)| node.id == key) {
            if node.is_dir() {
                return Some(id);
            }
            first_file.get_or_insert(id);
        }
        first_file
    }

    fn push(&mut self, node: TreeNode, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        match parent {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }
}

impl TreeModel for PathForest {
    type Id = NodeId;

    fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map_or(&[], |node| node.children.as_slice())
    }

    fn key(&self, id: NodeId) -> &str {
        self.nodes.get(id.0).map_or("", |node| node.id.as_str())
    }

    fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    fn size_hint(&self) -> usize {
        self.nodes.len()
    }
}

/// Returns `true` if the path's first segment is one of [`IGNORED_ROOTS`].
pub fn is_ignored(path: &str) -> bool {
    path.split('/')
        .next()
        .is_some_and(|first| IGNORED_ROOTS.contains(&first))
}

fn display_name(segment: &str, placeholder: &str) -> String {
    if segment.is_empty() {
        placeholder.to_string()
    } else {
        segment.to_string()
    }
}

/// Builds the forest for a flat list of `/`-separated, root-relative paths.
///
/// A path that is both a file and the prefix of another path produces two
/// sibling nodes with the same name: the file and the directory. Neither is
/// merged into the other.
pub fn build_tree<I, S>(paths: I, root_label: &str) -> PathForest
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let paths = paths.into_iter();
    let mut forest = PathForest::empty(root_label);
    forest.nodes.reserve(paths.size_hint().0);
    let mut index: FxHashMap<String, NodeId> =
        FxHashMap::with_capacity_and_hasher(paths.size_hint().0, FxBuildHasher);

    for path in paths {
        let path = path.as_ref();
        if is_ignored(path) {
            continue;
        }

        let (dirs, file_name) = match path.rsplit_once('/') {
            Some((dirs, file_name)) => (Some(dirs), file_name),
            None => (None, path),
        };

        let mut key = String::with_capacity(ROOT_KEY.len() + path.len() + 1);
        key.push_str(ROOT_KEY);
        let mut parent = None;

        for segment in dirs.into_iter().flat_map(|dirs| dirs.split('/')) {
            key.push('/');
            key.push_str(segment);
            let dir = if let Some(&existing) = index.get(&key) {
                existing
            } else {
                let node = TreeNode {
                    id: key.clone(),
                    name: display_name(segment, UNNAMED_FOLDER),
                    path: key[ROOT_KEY.len() + 1..].to_string(),
                    children: Vec::new(),
                };
                let created = forest.push(node, parent);
                index.insert(key.clone(), created);
                created
            };
            parent = Some(dir);
        }

        key.push('/');
        key.push_str(file_name);
        let file = TreeNode {
            id: key,
            name: display_name(file_name, UNNAMED_FILE),
            path: path.to_string(),
            children: Vec::new(),
        };
        forest.push(file, parent);
    }

    forest
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn names(forest: &PathForest, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .map(|id| forest.node(*id).unwrap().name.clone())
            .collect()
    }

    fn child<'a>(forest: &'a PathForest, ids: &[NodeId], name: &str) -> &'a TreeNode {
        ids.iter()
            .map(|id| forest.node(*id).unwrap())
            .find(|node| node.name == name)
            .unwrap()
    }

    #[test]
    fn builds_nested_forest_and_skips_git() {
        let paths = [
            "README.md",
            "src/index.ts",
            "src/utils/a.ts",
            "src/utils/b.ts",
            ".git/config",
        ];
        let forest = build_tree(paths, "demo");

        assert_eq!(forest.label(), "demo");
        assert_eq!(names(&forest, forest.roots()), vec!["README.md", "src"]);

        let readme = child(&forest, forest.roots(), "README.md");
        assert!(readme.is_file());
        assert_eq!(readme.id, "root/README.md");

        let src = child(&forest, forest.roots(), "src");
        assert!(src.is_dir());
        assert_eq!(src.id, "root/src");
        assert_eq!(names(&forest, &src.children), vec!["index.ts", "utils"]);

        let utils = child(&forest, &src.children, "utils");
        assert_eq!(utils.id, "root/src/utils");
        assert_eq!(utils.path, "src/utils");
        assert_eq!(names(&forest, &utils.children), vec!["a.ts", "b.ts"]);

        assert!(forest.iter().all(|(_, node)| !node.id.contains(".git")));
        assert_eq!(forest.len(), 6);
    }

    #[test]
    fn shares_directories_between_paths() {
        let forest = build_tree(["a/b/c.txt", "a/b/d.txt"], "repo");

        assert_eq!(forest.roots().len(), 1);
        let a = child(&forest, forest.roots(), "a");
        assert_eq!(a.children.len(), 1);
        let b = child(&forest, &a.children, "b");
        assert_eq!(names(&forest, &b.children), vec!["c.txt", "d.txt"]);
        let c = child(&forest, &b.children, "c.txt");
        assert_eq!(c.path, "a/b/c.txt");
        assert_eq!(c.id, "root/a/b/c.txt");
    }

    #[test]
    fn empty_input_yields_empty_forest() {
        let forest = build_tree(Vec::<String>::new(), "repo");
        assert!(forest.is_empty());
        assert!(forest.roots().is_empty());
    }

    #[test]
    fn empty_segments_get_placeholder_names() {
        let forest = build_tree(["docs/", "", "x//y.md"], "repo");

        let docs = child(&forest, forest.roots(), "docs");
        assert_eq!(names(&forest, &docs.children), vec![UNNAMED_FILE]);
        assert!(names(&forest, forest.roots()).contains(&UNNAMED_FILE.to_string()));

        let x = child(&forest, forest.roots(), "x");
        let unnamed_dir = child(&forest, &x.children, UNNAMED_FOLDER);
        assert_eq!(unnamed_dir.id, "root/x/");
        assert_eq!(names(&forest, &unnamed_dir.children), vec!["y.md"]);
    }

    #[test]
    fn duplicate_paths_produce_duplicate_leaves() {
        let forest = build_tree(["src/a.rs", "src/a.rs"], "repo");
        let src = child(&forest, forest.roots(), "src");
        assert_eq!(names(&forest, &src.children), vec!["a.rs", "a.rs"]);
    }

    #[test]
    fn filter_matches_whole_first_segment_only() {
        let forest = build_tree(
            [".gitignore", ".idea/workspace.xml", "docs/.git/x", ".github/ci.yml"],
            "repo",
        );
        assert_eq!(names(&forest, forest.roots()), vec![".gitignore", "docs", ".github"]);
    }

    #[test]
    fn leaf_and_directory_with_same_name_coexist() {
        let forest = build_tree(["a", "a/b"], "repo");

        let roots = forest.roots();
        assert_eq!(names(&forest, roots), vec!["a", "a"]);
        let leaf = forest.node(roots[0]).unwrap();
        let dir = forest.node(roots[1]).unwrap();
        assert!(leaf.is_file());
        assert!(dir.is_dir());
        assert_eq!(leaf.id, dir.id);
        assert_eq!(names(&forest, &dir.children), vec!["b"]);
    }

    #[test]
    fn find_prefers_the_directory_on_a_shared_key() {
        let forest = build_tree(["a", "a/b"], "repo");
        let dir = forest.find("root/a").unwrap();
        assert!(forest.node(dir).unwrap().is_dir());
        assert_eq!(forest.node(dir).unwrap().children.len(), 1);

        let files_only = build_tree(["a", "a"], "repo");
        assert_eq!(files_only.find("root/a"), Some(files_only.roots()[0]));
        assert_eq!(forest.find("root/missing"), None);
    }

    #[test]
    fn forest_implements_tree_model() {
        let forest = build_tree(["src/main.rs"], "repo");
        let src = forest.roots()[0];
        assert_eq!(forest.key(src), "root/src");
        assert!(!forest.is_leaf(src));
        let main = forest.children(src)[0];
        assert!(forest.is_leaf(main));
        assert!(forest.contains(main));
        assert_eq!(forest.size_hint(), 2);
    }

    fn path_strategy() -> impl Strategy<Value = String> {
        let segment = prop::sample::select(vec!["src", "lib", "a", "b", ".git", ".idea", "x.rs"]);
        prop::collection::vec(segment, 1..4).prop_map(|parts| parts.join("/"))
    }

    fn collect_dirs(forest: &PathForest) -> Vec<(String, usize)> {
        forest
            .iter()
            .filter(|(_, node)| node.is_dir())
            .map(|(id, node)| {
                let parent_children = forest
                    .iter()
                    .map(|(_, n)| n.children.as_slice())
                    .chain(std::iter::once(forest.roots()))
                    .map(|children| children.iter().filter(|c| **c == id).count())
                    .sum();
                (node.id.clone(), parent_children)
            })
            .collect()
    }

    proptest! {
        #[test]
        fn directories_are_unique_and_attached_once(paths in prop::collection::vec(path_strategy(), 0..24)) {
            let forest = build_tree(&paths, "repo");
            let dirs = collect_dirs(&forest);
            for (key, attachments) in &dirs {
                prop_assert_eq!(*attachments, 1);
                prop_assert_eq!(dirs.iter().filter(|(k, _)| k == key).count(), 1);
            }
        }

        #[test]
        fn ignored_paths_do_not_change_the_forest(paths in prop::collection::vec(path_strategy(), 0..24)) {
            let kept: Vec<&String> = paths.iter().filter(|p| !is_ignored(p)).collect();
            let full = build_tree(&paths, "repo");
            let filtered = build_tree(kept, "repo");
            let full_ids: Vec<_> = full.iter().map(|(_, n)| n.id.clone()).collect();
            let filtered_ids: Vec<_> = filtered.iter().map(|(_, n)| n.id.clone()).collect();
            prop_assert_eq!(full_ids, filtered_ids);
            prop_assert!(full.iter().all(|(_, n)| !is_ignored(&n.path)));
        }

        #[test]
        fn children_follow_first_occurrence(paths in prop::collection::vec(path_strategy(), 0..24)) {
            let forest = build_tree(&paths, "repo");
            let mut expected: FxHashMap<String, Vec<(String, bool)>> = FxHashMap::default();
            for path in paths.iter().filter(|p| !is_ignored(p)) {
                let segments: Vec<&str> = path.split('/').collect();
                let mut parent = ROOT_KEY.to_string();
                for (depth, segment) in segments.iter().enumerate() {
                    let key = format!("{parent}/{segment}");
                    let is_dir = depth + 1 < segments.len();
                    let siblings = expected.entry(parent).or_default();
                    if !is_dir || !siblings.contains(&(key.clone(), true)) {
                        siblings.push((key.clone(), is_dir));
                    }
                    parent = key;
                }
            }

            let shape = |children: &[NodeId]| -> Vec<(String, bool)> {
                children
                    .iter()
                    .map(|id| {
                        let node = forest.node(*id).unwrap();
                        (node.id.clone(), node.is_dir())
                    })
                    .collect()
            };
            prop_assert_eq!(
                shape(forest.roots()),
                expected.get(ROOT_KEY).cloned().unwrap_or_default()
            );
            for (_, node) in forest.iter().filter(|(_, node)| node.is_dir()) {
                prop_assert_eq!(Some(shape(&node.children)), expected.get(&node.id).cloned());
            }
        }
    }
}
