use tortree_core::Priority;

/// User actions that can be performed in the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move selection up
    MoveUp,
    /// Move selection down
    MoveDown,
    /// Move selection up by a page
    PageUp,
    /// Move selection down by a page
    PageDown,
    /// Go to first item
    GoToFirst,
    /// Go to last item
    GoToLast,
    /// Open the directory under the cursor (or ".." to go up)
    Enter,
    /// Go to the parent directory
    GoUp,
    /// Add or remove the row under the cursor from the selection
    ToggleSelect,
    /// Select every row of the current directory
    SelectAll,
    ClearSelection,
    /// Download the selected files
    SetWanted,
    /// Skip the selected files
    SetUnwanted,
    SetPriority(Priority),
    /// Show help overlay
    ShowHelp,
    /// Hide help overlay
    HideHelp,
    /// Quit the application
    Quit,
    /// No action (for tick events)
    Tick,
}
