use std::hash::Hash;

use crossterm::event::KeyEvent;
use ratatui::widgets::TableState;
use rustc_hash::{FxBuildHasher, FxHashMap};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::action::{TreeAction, TreeEvent};
use crate::keymap::TreeKeyBindings;
use crate::model::TreeModel;
use crate::style::TreeScrollPolicy;

/// Expanded flags keyed by node key. A missing key reads as collapsed.
///
/// Flags are independent of tree position: collapsing a directory leaves the
/// flags of its descendants untouched, so re-expanding it restores them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpenNodes {
    flags: FxHashMap<String, bool>,
}

impl OpenNodes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the flag for `id` (absent counts as `false`).
    pub fn toggle(&mut self, id: &str) {
        let flag = self.flags.entry(id.to_string()).or_insert(false);
        *flag = !*flag;
    }

    #[inline]
    pub fn is_open(&self, id: &str) -> bool {
        self.flags.get(id).copied().unwrap_or(false)
    }

    pub fn set_open(&mut self, id: &str, open: bool) {
        self.flags.insert(id.to_string(), open);
    }

    /// Number of recorded entries, open or closed.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn clear(&mut self) {
        self.flags.clear();
    }

    /// Raw entry for `id`, distinguishing "never toggled" from "closed".
    pub fn get(&self, id: &str) -> Option<bool> {
        self.flags.get(id).copied()
    }
}

/// A visible node row with metadata used for rendering and navigation.
#[derive(Clone)]
pub struct VisibleNode<Id> {
    pub(crate) id: Id,
    pub(crate) level: u16,
    pub(crate) parent: Option<Id>,
    pub(crate) has_children: bool,
    pub(crate) is_open: bool,
    pub(crate) is_tail_stack: SmallVec<[bool; 8]>,
}

/// Tree view state: open flags, selection, and the visible-row cache.
pub struct TreeViewState<Id> {
    list_state: TableState,
    open: OpenNodes,
    // Cached visible rows to avoid recomputing DFS every render.
    visible_nodes: Vec<VisibleNode<Id>>,
    // Fast lookup from node id to visible row index.
    visible_index: FxHashMap<Id, usize>,
    // Marks whether visible_nodes must be rebuilt.
    dirty: bool,
    draw_lines: bool,
    keymap: TreeKeyBindings,
}

/// Snapshot of state (open flags, selection, scroll).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeViewSnapshot {
    /// Open/closed flags keyed by node key.
    pub open: OpenNodes,
    /// Selected row index in the visible list.
    pub selected: Option<usize>,
    /// Scroll offset within the visible list.
    pub offset: usize,
    /// Whether guide lines were enabled.
    pub draw_lines: bool,
}

impl<Id: Copy + Eq + Hash> Default for TreeViewState<Id> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: Copy + Eq + Hash> TreeViewState<Id> {
    /// Creates a new empty state with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a state with preallocated capacity for the given number of nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            list_state: TableState::default(),
            open: OpenNodes::new(),
            visible_nodes: Vec::with_capacity(capacity),
            visible_index: FxHashMap::with_capacity_and_hasher(capacity, FxBuildHasher),
            dirty: true,
            draw_lines: true,
            keymap: TreeKeyBindings::new(),
        }
    }

    /// Returns a mutable reference to the key binding set.
    pub const fn keymap_mut(&mut self) -> &mut TreeKeyBindings {
        &mut self.keymap
    }

    pub(crate) const fn list_state(&self) -> &TableState {
        &self.list_state
    }

    pub(crate) const fn list_state_mut(&mut self) -> &mut TableState {
        &mut self.list_state
    }

    pub(crate) fn visible_nodes(&self) -> &[VisibleNode<Id>] {
        &self.visible_nodes
    }

    fn visible_index_of(&self, id: Id) -> Option<usize> {
        self.visible_index.get(&id).copied()
    }

    /// Read-only view of the open flags.
    pub const fn open_nodes(&self) -> &OpenNodes {
        &self.open
    }

    /// Returns whether the node with the given key is expanded.
    #[inline]
    pub fn is_open(&self, key: &str) -> bool {
        self.open.is_open(key)
    }

    /// Flips the open flag for exactly one key.
    pub fn toggle(&mut self, key: &str) {
        self.open.toggle(key);
        self.dirty = true;
    }

    /// Sets the open flag for exactly one key.
    pub fn set_open(&mut self, key: &str, open: bool) {
        self.open.set_open(key, open);
        self.dirty = true;
    }

    /// Captures a snapshot of the current state for persistence or restore.
    pub fn snapshot(&self) -> TreeViewSnapshot {
        TreeViewSnapshot {
            open: self.open.clone(),
            selected: self.list_state.selected(),
            offset: self.list_state.offset(),
            draw_lines: self.draw_lines,
        }
    }

    /// Restores state from a previously captured snapshot.
    pub fn restore(&mut self, snapshot: TreeViewSnapshot) {
        self.open = snapshot.open;
        self.draw_lines = snapshot.draw_lines;
        *self.list_state.offset_mut() = snapshot.offset;
        self.list_state.select(snapshot.selected);
        self.dirty = true;
    }

    /// Returns whether guide lines are drawn.
    #[inline]
    pub const fn draw_lines(&self) -> bool {
        self.draw_lines
    }

    /// Enables or disables drawing of guide lines.
    pub const fn set_draw_lines(&mut self, draw: bool) {
        self.draw_lines = draw;
    }

    /// Marks the visible-node cache as dirty.
    pub const fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Selects the first visible row.
    pub const fn select_first(&mut self) {
        self.list_state.select_first();
    }

    /// Selects the last visible row.
    pub const fn select_last(&mut self) {
        self.list_state.select_last();
    }

    /// Moves selection to the previous visible row.
    pub fn select_prev(&mut self) {
        if self.visible_nodes.is_empty() {
            self.list_state.select(None);
            return;
        }
        let selected = self.list_state.selected().unwrap_or(0);
        self.list_state.select(Some(selected.saturating_sub(1)));
    }

    /// Moves selection to the next visible row.
    pub fn select_next(&mut self) {
        if self.visible_nodes.is_empty() {
            self.list_state.select(None);
            return;
        }
        let next = self
            .list_state
            .selected()
            .map_or(0, |selected| selected + 1)
            .min(self.visible_nodes.len().saturating_sub(1));
        self.list_state.select(Some(next));
    }

    /// Selects a visible row by index; out-of-range rows leave the selection as is.
    pub fn select_row(&mut self, row: usize) -> Option<Id> {
        let node = self.visible_nodes.get(row)?;
        let id = node.id;
        self.list_state.select(Some(row));
        Some(id)
    }

    /// Maps a row inside the viewport (0 = first drawn row) to a visible row index.
    pub fn row_in_viewport(&self, viewport_row: usize) -> usize {
        self.list_state.offset() + viewport_row
    }

    /// Adjusts scroll offset so the selection is within the viewport.
    pub fn ensure_selection_visible(&mut self, viewport_height: usize) {
        self.clamp_selection();
        let Some(selected) = self.list_state.selected() else {
            return;
        };
        let viewport_height = viewport_height.max(1);
        let offset = self.list_state.offset();
        if selected < offset {
            *self.list_state.offset_mut() = selected;
        } else if selected >= offset + viewport_height {
            *self.list_state.offset_mut() = selected + 1 - viewport_height;
        }
    }

    /// Adjusts selection visibility according to the provided scroll policy.
    pub fn ensure_selection_visible_with_policy(
        &mut self,
        viewport_height: usize,
        policy: TreeScrollPolicy,
    ) {
        match policy {
            TreeScrollPolicy::KeepInView => self.ensure_selection_visible(viewport_height),
            TreeScrollPolicy::CenterOnSelect => {
                self.ensure_selection_visible_centered(viewport_height);
            }
        }
    }

    fn ensure_selection_visible_centered(&mut self, viewport_height: usize) {
        self.clamp_selection();
        let Some(selected) = self.list_state.selected() else {
            return;
        };
        let viewport_height = viewport_height.max(1);
        let total = self.visible_nodes.len();
        if total <= viewport_height {
            *self.list_state.offset_mut() = 0;
            return;
        }

        // Center selection, then clamp to valid scroll range.
        let half = viewport_height / 2;
        let max_offset = total.saturating_sub(viewport_height);
        *self.list_state.offset_mut() = selected.saturating_sub(half).min(max_offset);
    }

    /// Returns the id of the currently selected node, if any.
    pub fn selected_id(&self) -> Option<Id> {
        self.list_state
            .selected()
            .and_then(|idx| self.visible_nodes.get(idx).map(|node| node.id))
    }

    /// Returns the number of visible nodes in the current view.
    pub const fn visible_len(&self) -> usize {
        self.visible_nodes.len()
    }

    /// Ids of the visible rows, top to bottom.
    pub fn visible_ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.visible_nodes.iter().map(|node| node.id)
    }

    /// Ensures the visible node list is up to date (if marked dirty).
    pub fn ensure_visible_nodes<T: TreeModel<Id = Id>>(&mut self, model: &T) {
        if !self.dirty {
            return;
        }
        self.update_visible_nodes(model);
    }

    /// Handles a tree action and returns the resulting event.
    pub fn handle_action<T: TreeModel<Id = Id>>(
        &mut self,
        model: &T,
        action: TreeAction,
    ) -> TreeEvent<Id> {
        self.ensure_visible_nodes(model);
        if self.visible_nodes.is_empty() {
            return TreeEvent::Unhandled;
        }

        match action {
            TreeAction::SelectPrev => {
                self.select_prev();
                TreeEvent::Handled
            }
            TreeAction::SelectNext => {
                self.select_next();
                TreeEvent::Handled
            }
            TreeAction::SelectParent => {
                self.select_parent();
                TreeEvent::Handled
            }
            TreeAction::SelectChild => {
                if self.select_child(model) {
                    TreeEvent::Handled
                } else {
                    TreeEvent::Unhandled
                }
            }
            TreeAction::Activate => self
                .selected_id()
                .map_or(TreeEvent::Unhandled, TreeEvent::Activated),
            TreeAction::ToggleGuides => {
                self.draw_lines = !self.draw_lines;
                TreeEvent::Handled
            }
            TreeAction::SelectFirst => {
                self.select_first();
                TreeEvent::Handled
            }
            TreeAction::SelectLast => {
                self.select_last();
                TreeEvent::Handled
            }
        }
    }

    /// Resolves a key event into an action and handles it.
    pub fn handle_key<T: TreeModel<Id = Id>>(&mut self, model: &T, key: KeyEvent) -> TreeEvent<Id> {
        let Some(action) = self.keymap.resolve(key) else {
            return TreeEvent::Unhandled;
        };
        self.handle_action(model, action)
    }

    fn reserve_visible_capacity<T: TreeModel<Id = Id>>(&mut self, model: &T) {
        let hint = model.size_hint();
        if hint == 0 {
            return;
        }
        let node_extra = hint.saturating_sub(self.visible_nodes.capacity());
        if node_extra > 0 {
            self.visible_nodes.reserve(node_extra);
        }
        let index_extra = hint.saturating_sub(self.visible_index.capacity());
        if index_extra > 0 {
            self.visible_index.reserve(index_extra);
        }
    }

    fn update_visible_nodes<T: TreeModel<Id = Id>>(&mut self, model: &T) {
        self.visible_nodes.clear();
        self.visible_index.clear();
        self.reserve_visible_capacity(model);
        // Top-level rows carry no guide lines, so their tail stack stays empty.
        let mut is_tail_stack: SmallVec<[bool; 8]> = SmallVec::new();
        for root in model.roots().iter().copied() {
            self.build_visible_nodes(model, root, 0, None, &mut is_tail_stack);
        }
        self.dirty = false;
        self.clamp_selection();
    }

    fn build_visible_nodes<T: TreeModel<Id = Id>>(
        &mut self,
        model: &T,
        node_id: Id,
        level: u16,
        parent: Option<Id>,
        is_tail_stack: &mut SmallVec<[bool; 8]>,
    ) {
        let children = model.children(node_id);
        let has_children = !children.is_empty();
        let is_open = has_children && self.open.is_open(model.key(node_id));
        let idx = self.visible_nodes.len();
        self.visible_nodes.push(VisibleNode {
            id: node_id,
            level,
            parent,
            has_children,
            is_open,
            is_tail_stack: is_tail_stack.clone(),
        });
        self.visible_index.insert(node_id, idx);

        if !is_open {
            return;
        }

        for (i, child) in children.iter().copied().enumerate() {
            let is_last = i == children.len().saturating_sub(1);
            is_tail_stack.push(is_last);
            self.build_visible_nodes(model, child, level + 1, Some(node_id), is_tail_stack);
            is_tail_stack.pop();
        }
    }

    const fn clamp_selection(&mut self) {
        if self.visible_nodes.is_empty() {
            self.list_state.select(None);
            return;
        }

        if let Some(selected) = self.list_state.selected()
            && selected >= self.visible_nodes.len()
        {
            self.list_state
                .select(Some(self.visible_nodes.len().saturating_sub(1)));
        }
    }

    fn select_parent(&mut self) {
        let Some(selected_idx) = self.list_state.selected() else {
            return;
        };

        let Some(parent_id) = self
            .visible_nodes
            .get(selected_idx)
            .and_then(|node| node.parent)
        else {
            return;
        };

        if let Some(parent_idx) = self.visible_index_of(parent_id) {
            self.list_state.select(Some(parent_idx));
        }
    }

    fn select_child<T: TreeModel<Id = Id>>(&mut self, model: &T) -> bool {
        let Some(selected_idx) = self.list_state.selected() else {
            return false;
        };
        let Some(node) = self.visible_nodes.get(selected_idx) else {
            return false;
        };
        if !node.has_children {
            return false;
        }
        let node_id = node.id;

        if !node.is_open {
            self.open.set_open(model.key(node_id), true);
            self.update_visible_nodes(model);
        }

        // Children follow their parent directly in DFS order.
        let Some(current_idx) = self.visible_index_of(node_id) else {
            return false;
        };
        if self.visible_nodes.get(current_idx + 1).is_some() {
            self.list_state.select(Some(current_idx + 1));
        }
        true
    }
}
