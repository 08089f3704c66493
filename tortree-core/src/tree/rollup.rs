//! Bottom-up aggregation of leaf state.
//!
//! Nothing here is cached. Every call walks the subtree, so directory values
//! can never go stale after a leaf changes.

use super::arena::FilesTree;
use super::node::{NodeId, NodeKind, PriorityState, WantedState};

/// Aggregated view of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rollup {
    pub size: u64,
    pub completed_size: u64,
    pub wanted: WantedState,
    pub priority: PriorityState,
}

impl Rollup {
    /// Completed fraction in `0.0..=1.0`, 0 for empty nodes
    pub fn progress(&self) -> f64 {
        if self.size == 0 {
            0.0
        } else {
            self.completed_size as f64 / self.size as f64
        }
    }

    const EMPTY: Rollup = Rollup {
        size: 0,
        completed_size: 0,
        wanted: WantedState::Wanted,
        priority: PriorityState::Normal,
    };
}

/// Aggregate a node. Unknown ids yield an empty rollup.
pub fn rollup(tree: &FilesTree, id: NodeId) -> Rollup {
    let Some(node) = tree.get(id) else {
        return Rollup::EMPTY;
    };

    match &node.kind {
        NodeKind::File(file) => Rollup {
            size: file.size,
            completed_size: file.completed_size,
            wanted: WantedState::from_wanted(file.wanted),
            priority: file.priority.into(),
        },
        NodeKind::Directory(dir) => {
            let mut children = dir.children.iter().map(|&child| rollup(tree, child));
            let Some(first) = children.next() else {
                return Rollup::EMPTY;
            };
            children.fold(first, merge)
        }
    }
}

fn merge(acc: Rollup, child: Rollup) -> Rollup {
    Rollup {
        size: acc.size + child.size,
        completed_size: acc.completed_size + child.completed_size,
        wanted: if acc.wanted == child.wanted {
            acc.wanted
        } else {
            WantedState::Mixed
        },
        priority: if acc.priority == child.priority {
            acc.priority
        } else {
            PriorityState::Mixed
        },
    }
}

pub fn size(tree: &FilesTree, id: NodeId) -> u64 {
    rollup(tree, id).size
}

pub fn completed_size(tree: &FilesTree, id: NodeId) -> u64 {
    rollup(tree, id).completed_size
}

pub fn progress(tree: &FilesTree, id: NodeId) -> f64 {
    rollup(tree, id).progress()
}

pub fn wanted_state(tree: &FilesTree, id: NodeId) -> WantedState {
    rollup(tree, id).wanted
}

pub fn priority(tree: &FilesTree, id: NodeId) -> PriorityState {
    rollup(tree, id).priority
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FileRecord, Priority};
    use crate::tree::build_tree;

    #[test]
    fn test_directory_sums() {
        let tree = build_tree(&[
            FileRecord::new(0, ["a", "b.txt"], 100).with_completed(100),
            FileRecord::new(1, ["a", "c.txt"], 50).with_completed(25),
        ]);
        let dir = tree.root().children()[0];

        assert_eq!(size(&tree, dir), 150);
        assert_eq!(completed_size(&tree, dir), 125);
        assert!((progress(&tree, dir) - 125.0 / 150.0).abs() < f64::EPSILON);
        assert_eq!(size(&tree, NodeId::ROOT), tree.files().map(|(_, f)| f.size).sum::<u64>());
    }

    #[test]
    fn test_wanted_rollup() {
        let tree = build_tree(&[
            FileRecord::new(0, ["d", "x"], 1),
            FileRecord::new(1, ["d", "y"], 1),
            FileRecord::new(2, ["e", "x"], 1).with_wanted(false),
            FileRecord::new(3, ["f", "x"], 1),
            FileRecord::new(4, ["f", "y"], 1).with_wanted(false),
        ]);
        let children = tree.root().children().to_vec();

        assert_eq!(wanted_state(&tree, children[0]), WantedState::Wanted);
        assert_eq!(wanted_state(&tree, children[1]), WantedState::Unwanted);
        assert_eq!(wanted_state(&tree, children[2]), WantedState::Mixed);
        assert_eq!(wanted_state(&tree, NodeId::ROOT), WantedState::Mixed);
    }

    #[test]
    fn test_mixed_child_makes_parent_mixed() {
        let tree = build_tree(&[
            FileRecord::new(0, ["top", "sub", "x"], 1).with_priority(Priority::High),
            FileRecord::new(1, ["top", "sub", "y"], 1).with_priority(Priority::Low),
            FileRecord::new(2, ["top", "z"], 1).with_priority(Priority::High),
        ]);
        let top = tree.root().children()[0];
        let sub = tree.children(top)[0];

        assert_eq!(priority(&tree, sub), PriorityState::Mixed);
        assert_eq!(priority(&tree, top), PriorityState::Mixed);
    }

    #[test]
    fn test_empty_tree_rollup() {
        let tree = FilesTree::new();
        let root = rollup(&tree, NodeId::ROOT);
        assert_eq!(root.size, 0);
        assert_eq!(root.progress(), 0.0);
        assert_eq!(root.wanted, WantedState::Wanted);
        assert_eq!(root.priority, PriorityState::Normal);
    }
}
