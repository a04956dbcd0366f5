use std::hash::Hash;

/// Minimal forest contract required by the tree view.
///
/// A proper forest is expected (not a DAG):
/// - no cycles (DFS traversal is used directly);
/// - each node has at most one parent;
/// - identifiers are stable for as long as the forest lives.
///
/// Expansion state is keyed by [`TreeModel::key`], not by `Id`, so a key may
/// outlive the concrete node it was recorded for.
pub trait TreeModel {
    /// Node identifier type.
    type Id: Copy + Eq + Hash;

    /// Returns the top-level nodes (children of the implicit root) in display order.
    fn roots(&self) -> &[Self::Id];
    /// Returns the node's children in a deterministic order.
    fn children(&self, id: Self::Id) -> &[Self::Id];
    /// Returns the key used to look up the node's expansion flag.
    fn key(&self, id: Self::Id) -> &str;
    /// Returns `true` if the node exists in the model.
    fn contains(&self, id: Self::Id) -> bool;
    /// Returns an approximate size hint (not required to be exact).
    fn size_hint(&self) -> usize {
        0
    }
    /// Returns `true` if the node is a leaf (has no children).
    fn is_leaf(&self, id: Self::Id) -> bool {
        self.children(id).is_empty()
    }
}
