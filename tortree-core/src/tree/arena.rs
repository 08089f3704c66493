use std::collections::HashMap;

use super::node::{DirectoryData, FileData, NodeId, NodeKind, TreeNode};
use super::rollup::{Rollup, rollup};

/// Arena-allocated torrent files tree.
///
/// Node 0 is a synthetic, unnamed root directory. Its children are the
/// top-level entries of the torrent. File nodes are also indexed by their
/// RPC file id for O(1) lookup during incremental updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesTree {
    nodes: Vec<TreeNode>,
    files: HashMap<u32, NodeId>,
}

impl Default for FilesTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FilesTree {
    pub fn new() -> Self {
        let root = TreeNode::new(
            NodeId::ROOT,
            String::new(),
            None,
            0,
            0,
            NodeKind::Directory(DirectoryData::default()),
        );

        Self {
            nodes: vec![root],
            files: HashMap::new(),
        }
    }

    /// Append a directory under `parent`. Returns None if `parent` is a file.
    pub(crate) fn add_directory(&mut self, parent: NodeId, name: String) -> Option<NodeId> {
        self.push_child(parent, name, NodeKind::Directory(DirectoryData::default()))
    }

    /// Append a file under `parent` and index it by its file id
    pub(crate) fn add_file(&mut self, parent: NodeId, name: String, file: FileData) -> Option<NodeId> {
        let file_id = file.file_id;
        let id = self.push_child(parent, name, NodeKind::File(file))?;
        self.files.insert(file_id, id);
        Some(id)
    }

    fn push_child(&mut self, parent: NodeId, name: String, kind: NodeKind) -> Option<NodeId> {
        let id = NodeId(self.nodes.len());
        let parent_node = self.nodes.get_mut(parent.index())?;
        let depth = parent_node.depth + 1;

        let ordinal = match &mut parent_node.kind {
            NodeKind::Directory(dir) => {
                let ordinal = dir.children.len();
                dir.children.push(id);
                dir.lookup.insert(name.clone(), id);
                ordinal
            }
            NodeKind::File(_) => return None,
        };

        self.nodes
            .push(TreeNode::new(id, name, Some(parent), ordinal, depth, kind));
        Some(id)
    }

    /// Get a reference to a node
    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.nodes.get_mut(id.index())
    }

    pub(crate) fn file_mut(&mut self, id: NodeId) -> Option<&mut FileData> {
        match &mut self.nodes.get_mut(id.index())?.kind {
            NodeKind::File(file) => Some(file),
            NodeKind::Directory(_) => None,
        }
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[0]
    }

    /// Total number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree holds no files (metadata not known yet)
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Node holding the file with the given RPC file id
    pub fn file_node(&self, file_id: u32) -> Option<NodeId> {
        self.files.get(&file_id).copied()
    }

    pub fn file_by_id(&self, file_id: u32) -> Option<&FileData> {
        self.file_node(file_id)
            .and_then(|id| self.get(id))
            .and_then(|node| node.as_file())
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children()).unwrap_or(&[])
    }

    pub fn child_by_name(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        self.get(dir)?.as_directory()?.lookup.get(name).copied()
    }

    pub fn rollup(&self, id: NodeId) -> Rollup {
        rollup(self, id)
    }

    pub fn total_size(&self) -> u64 {
        self.rollup(NodeId::ROOT).size
    }

    /// Get the path from root to a node (both included)
    pub fn path_to_node(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = self.get(id).map(|n| n.id);

        while let Some(node_id) = current {
            path.push(node_id);
            current = self.get(node_id).and_then(|n| n.parent);
        }

        path.reverse();
        path
    }

    /// `/`-separated path of a node relative to the torrent root
    pub fn node_path(&self, id: NodeId) -> String {
        self.path_to_node(id)
            .iter()
            .skip(1)
            .filter_map(|&id| self.get(id).map(|n| n.name.as_str()))
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Breadcrumb string for a directory, always starting with `/`
    pub fn breadcrumbs(&self, id: NodeId) -> String {
        format!("/{}", self.node_path(id))
    }

    /// Locate a node by its `/`-separated path. Empty segments are ignored.
    pub fn find_by_path(&self, path: &str) -> Option<NodeId> {
        let mut current = NodeId::ROOT;
        let mut descended = false;
        for part in path.split('/').filter(|p| !p.is_empty()) {
            current = self.child_by_name(current, part)?;
            descended = true;
        }
        descended.then_some(current)
    }

    /// Sibling indices leading from the root to `id`
    pub fn ordinal_path(&self, id: NodeId) -> Vec<usize> {
        self.path_to_node(id)
            .iter()
            .skip(1)
            .filter_map(|&id| self.get(id).map(|n| n.ordinal))
            .collect()
    }

    /// Replay an ordinal path from the root. None if any step is out of range.
    pub fn find_by_ordinal_path(&self, ordinals: &[usize]) -> Option<NodeId> {
        let mut current = NodeId::ROOT;
        for &ordinal in ordinals {
            current = *self.children(current).get(ordinal)?;
        }
        Some(current)
    }

    /// All file nodes under `id` (or `id` itself if it is a file), depth-first
    pub fn descendant_files(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        self.collect_files(id, &mut result);
        result
    }

    fn collect_files(&self, id: NodeId, result: &mut Vec<NodeId>) {
        let Some(node) = self.get(id) else {
            return;
        };
        match &node.kind {
            NodeKind::File(_) => result.push(id),
            NodeKind::Directory(dir) => {
                for &child in &dir.children {
                    self.collect_files(child, result);
                }
            }
        }
    }

    /// Rename the node at `path` in place. Its id, size and ordinal are kept.
    ///
    /// Returns the renamed node, or None if the path does not resolve (the
    /// root cannot be renamed).
    pub fn rename(&mut self, path: &str, new_name: &str) -> Option<NodeId> {
        let id = self.find_by_path(path)?;
        let parent = self.get(id)?.parent?;
        let old_name = std::mem::replace(&mut self.get_mut(id)?.name, new_name.to_string());

        if let Some(NodeKind::Directory(dir)) = self.get_mut(parent).map(|n| &mut n.kind) {
            if dir.lookup.get(&old_name) == Some(&id) {
                dir.lookup.remove(&old_name);
            }
            dir.lookup.insert(new_name.to_string(), id);
        }

        Some(id)
    }

    /// Iterator over all nodes
    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter()
    }

    /// Iterator over file nodes in arena order
    pub fn files(&self) -> impl Iterator<Item = (&TreeNode, &FileData)> {
        self.nodes
            .iter()
            .filter_map(|n| n.as_file().map(|f| (n, f)))
    }
}
