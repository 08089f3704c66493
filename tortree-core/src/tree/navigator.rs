use std::cmp::Ordering;

use crate::compare::alphanumeric_cmp;

use super::arena::FilesTree;
use super::node::NodeId;

/// One row of a directory listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// Synthetic ".." row shown everywhere except the root
    Parent,
    Node(NodeId),
}

/// Tracks the directory currently being listed.
///
/// Navigation never mutates the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigator {
    current: NodeId,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            current: NodeId::ROOT,
        }
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn is_at_root(&self) -> bool {
        self.current == NodeId::ROOT
    }

    /// Enter `id` if it is a directory of `tree`. Returns whether we moved.
    pub fn enter(&mut self, tree: &FilesTree, id: NodeId) -> bool {
        match tree.get(id) {
            Some(node) if node.is_directory() => {
                self.current = id;
                true
            }
            _ => false,
        }
    }

    /// Move to the parent directory. False when already at the root.
    pub fn up(&mut self, tree: &FilesTree) -> bool {
        match tree.get(self.current).and_then(|n| n.parent) {
            Some(parent) => {
                self.current = parent;
                true
            }
            None => false,
        }
    }

    /// Children of the current directory in display order
    pub fn sorted_children(&self, tree: &FilesTree) -> Vec<NodeId> {
        let mut children = tree.children(self.current).to_vec();
        children.sort_by(|&a, &b| display_order(tree, a, b));
        children
    }

    /// Rows to display: ".." first when not at the root, then the children
    pub fn entries(&self, tree: &FilesTree) -> Vec<Entry> {
        let children = self.sorted_children(tree);
        let mut entries = Vec::with_capacity(children.len() + 1);
        if !self.is_at_root() {
            entries.push(Entry::Parent);
        }
        entries.extend(children.into_iter().map(Entry::Node));
        entries
    }

    /// Position as sibling ordinals from the root, for persistence
    pub fn save(&self, tree: &FilesTree) -> Vec<usize> {
        tree.ordinal_path(self.current)
    }

    /// Replay a saved position. Falls back to the root when the path no
    /// longer resolves to a directory.
    pub fn restore(tree: &FilesTree, ordinals: &[usize]) -> Self {
        let mut navigator = Self::new();
        if let Some(id) = tree.find_by_ordinal_path(ordinals) {
            if !navigator.enter(tree, id) {
                tracing::debug!(?ordinals, "saved position is not a directory, using root");
            }
        } else {
            tracing::debug!(?ordinals, "saved position out of range, using root");
        }
        navigator
    }

    pub fn reset(&mut self) {
        self.current = NodeId::ROOT;
    }
}

/// Directories first, then natural name order
pub fn display_order(tree: &FilesTree, a: NodeId, b: NodeId) -> Ordering {
    match (tree.get(a), tree.get(b)) {
        (Some(a), Some(b)) => b
            .is_directory()
            .cmp(&a.is_directory())
            .then_with(|| alphanumeric_cmp(&a.name, &b.name)),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FileRecord;
    use crate::tree::build_tree;

    fn sample() -> FilesTree {
        build_tree(&[
            FileRecord::new(0, ["top", "file10"], 1),
            FileRecord::new(1, ["top", "file2"], 1),
            FileRecord::new(2, ["top", "zdir", "inner"], 1),
            FileRecord::new(3, ["top", "Adir", "x"], 1),
            FileRecord::new(4, ["readme"], 1),
        ])
    }

    fn names(tree: &FilesTree, ids: &[NodeId]) -> Vec<String> {
        ids.iter().map(|&id| tree.get(id).unwrap().name.clone()).collect()
    }

    #[test]
    fn test_root_listing_has_no_header() {
        let tree = sample();
        let nav = Navigator::new();
        let entries = nav.entries(&tree);
        assert_eq!(entries.len(), 2);
        assert!(!entries.contains(&Entry::Parent));
    }

    #[test]
    fn test_enter_sorts_directories_first_then_naturally() {
        let tree = sample();
        let mut nav = Navigator::new();
        let top = tree.find_by_path("top").unwrap();

        assert!(nav.enter(&tree, top));
        let sorted = nav.sorted_children(&tree);
        assert_eq!(names(&tree, &sorted), vec!["Adir", "zdir", "file2", "file10"]);
        assert_eq!(nav.entries(&tree)[0], Entry::Parent);

        // first-seen order in the tree itself is untouched
        assert_eq!(
            names(&tree, tree.children(top)),
            vec!["file10", "file2", "zdir", "Adir"]
        );
    }

    #[test]
    fn test_enter_file_is_rejected() {
        let tree = sample();
        let mut nav = Navigator::new();
        let readme = tree.find_by_path("readme").unwrap();
        assert!(!nav.enter(&tree, readme));
        assert!(nav.is_at_root());
    }

    #[test]
    fn test_up() {
        let tree = sample();
        let mut nav = Navigator::new();
        assert!(!nav.up(&tree));

        let inner_dir = tree.find_by_path("top/zdir").unwrap();
        assert!(nav.enter(&tree, inner_dir));
        assert!(nav.up(&tree));
        assert_eq!(nav.current(), tree.find_by_path("top").unwrap());
        assert!(nav.up(&tree));
        assert!(nav.is_at_root());
    }

    #[test]
    fn test_save_and_restore() {
        let tree = sample();
        let mut nav = Navigator::new();
        let target = tree.find_by_path("top/Adir").unwrap();
        nav.enter(&tree, target);

        let saved = nav.save(&tree);
        assert_eq!(saved, vec![0, 3]);

        let rebuilt = sample();
        assert_eq!(Navigator::restore(&rebuilt, &saved).current(), target);
    }

    #[test]
    fn test_restore_falls_back_to_root() {
        let tree = sample();
        assert!(Navigator::restore(&tree, &[0, 42]).is_at_root());
        // ordinal path of a file
        assert!(Navigator::restore(&tree, &[1]).is_at_root());
    }
}
