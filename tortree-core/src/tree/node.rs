use std::collections::HashMap;

use crate::record::Priority;

/// Index of a node in the tree arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(&self) -> usize {
        self.0
    }
}

/// Aggregated "wanted" state of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WantedState {
    Wanted,
    Unwanted,
    Mixed,
}

impl WantedState {
    pub fn from_wanted(wanted: bool) -> Self {
        if wanted {
            WantedState::Wanted
        } else {
            WantedState::Unwanted
        }
    }

    pub fn checkbox(&self) -> &'static str {
        match self {
            WantedState::Wanted => "[x]",
            WantedState::Unwanted => "[ ]",
            WantedState::Mixed => "[-]",
        }
    }
}

/// Aggregated priority of a node. `Mixed` only ever appears on directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriorityState {
    Low,
    Normal,
    High,
    Mixed,
}

impl PriorityState {
    pub fn label(&self) -> &'static str {
        match self {
            PriorityState::Low => "Low",
            PriorityState::Normal => "Normal",
            PriorityState::High => "High",
            PriorityState::Mixed => "Mixed",
        }
    }
}

impl From<Priority> for PriorityState {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Low => PriorityState::Low,
            Priority::Normal => PriorityState::Normal,
            Priority::High => PriorityState::High,
        }
    }
}

/// Leaf state, owned by file nodes only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileData {
    pub file_id: u32,
    pub size: u64,
    pub completed_size: u64,
    pub wanted: bool,
    pub priority: Priority,
    /// Set by the last incremental update, cleared by `take_changed`
    pub changed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryData {
    /// Children in first-seen order
    pub children: Vec<NodeId>,
    pub(crate) lookup: HashMap<String, NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    File(FileData),
    Directory(DirectoryData),
}

impl NodeKind {
    pub fn icon(&self) -> &'static str {
        match self {
            NodeKind::Directory(_) => "📁",
            NodeKind::File(_) => "📄",
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, NodeKind::Directory(_))
    }
}

/// A node in the files tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub id: NodeId,
    pub name: String,
    /// Parent node (None for root)
    pub parent: Option<NodeId>,
    /// Position among the parent's children
    pub ordinal: usize,
    /// Depth in tree (0 for root)
    pub depth: u16,
    pub kind: NodeKind,
}

impl TreeNode {
    pub(crate) fn new(
        id: NodeId,
        name: String,
        parent: Option<NodeId>,
        ordinal: usize,
        depth: u16,
        kind: NodeKind,
    ) -> Self {
        Self {
            id,
            name,
            parent,
            ordinal,
            depth,
            kind,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind.is_directory()
    }

    pub fn as_file(&self) -> Option<&FileData> {
        match &self.kind {
            NodeKind::File(file) => Some(file),
            NodeKind::Directory(_) => None,
        }
    }

    pub fn as_directory(&self) -> Option<&DirectoryData> {
        match &self.kind {
            NodeKind::Directory(dir) => Some(dir),
            NodeKind::File(_) => None,
        }
    }

    pub fn file_id(&self) -> Option<u32> {
        self.as_file().map(|f| f.file_id)
    }

    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Directory(dir) => &dir.children,
            NodeKind::File(_) => &[],
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }
}
