/// Actions that a user or application can initiate on the tree view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeAction {
    /// Move selection to the previous visible row.
    SelectPrev,
    /// Move selection to the next visible row.
    SelectNext,
    /// Move selection to the parent node.
    SelectParent,
    /// Open the selected directory if needed and move to its first child.
    SelectChild,
    /// Activate the selected node (open/close a directory, load a file).
    Activate,
    /// Toggle drawing of guide lines.
    ToggleGuides,
    /// Select the first visible row.
    SelectFirst,
    /// Select the last visible row.
    SelectLast,
}

/// Result of handling an action or key event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeEvent<Id> {
    /// The action was handled internally and state was updated.
    Handled,
    /// The action was ignored (e.g., nothing selected / nothing to do).
    Unhandled,
    /// The selected node was activated; the caller decides what that means.
    Activated(Id),
}
