use std::collections::BTreeSet;

use crate::record::FileRecordDelta;

use super::arena::FilesTree;
use super::node::NodeId;

/// What an incremental update touched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// File nodes whose values actually changed, in update order
    pub changed_files: Vec<NodeId>,
    /// Ancestors of changed files (root included), whose rollups may differ
    pub affected_directories: BTreeSet<NodeId>,
    /// Deltas whose file id is not in the tree
    pub missing: usize,
}

impl UpdateOutcome {
    pub fn is_empty(&self) -> bool {
        self.changed_files.is_empty()
    }

    /// Whether a listing of `dir`'s children needs a redraw
    pub fn touches_listing_of(&self, dir: NodeId) -> bool {
        self.affected_directories.contains(&dir)
    }
}

impl FilesTree {
    /// Overwrite leaf state from a list of changed files.
    ///
    /// Unknown ids are dropped. A delta that carries the node's current values
    /// does not mark it changed.
    pub fn apply_updates(&mut self, deltas: &[FileRecordDelta]) -> UpdateOutcome {
        let mut outcome = UpdateOutcome::default();

        for delta in deltas {
            let Some(id) = self.file_node(delta.index) else {
                outcome.missing += 1;
                continue;
            };
            let Some(file) = self.file_mut(id) else {
                outcome.missing += 1;
                continue;
            };

            if file.completed_size == delta.completed_size
                && file.wanted == delta.wanted
                && file.priority == delta.priority
            {
                continue;
            }

            file.completed_size = delta.completed_size;
            file.wanted = delta.wanted;
            file.priority = delta.priority;
            file.changed = true;

            outcome.changed_files.push(id);
            let mut parent = self.get(id).and_then(|n| n.parent);
            while let Some(dir) = parent {
                if !outcome.affected_directories.insert(dir) {
                    break;
                }
                parent = self.get(dir).and_then(|n| n.parent);
            }
        }

        if outcome.missing > 0 {
            tracing::debug!(missing = outcome.missing, "dropped updates for unknown file ids");
        }
        tracing::trace!(changed = outcome.changed_files.len(), "applied file updates");

        outcome
    }

    pub fn is_changed(&self, id: NodeId) -> bool {
        self.get(id)
            .and_then(|n| n.as_file())
            .is_some_and(|f| f.changed)
    }

    /// Return every node marked changed and clear the marks
    pub fn take_changed(&mut self) -> Vec<NodeId> {
        let changed: Vec<NodeId> = self
            .files()
            .filter(|(_, f)| f.changed)
            .map(|(n, _)| n.id)
            .collect();

        for &id in &changed {
            if let Some(file) = self.file_mut(id) {
                file.changed = false;
            }
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FileRecord, Priority};
    use crate::tree::{WantedState, build_tree};

    fn sample() -> FilesTree {
        build_tree(&[
            FileRecord::new(0, ["a", "b.txt"], 100),
            FileRecord::new(1, ["a", "c.txt"], 50),
            FileRecord::new(2, ["other"], 10),
        ])
    }

    #[test]
    fn test_update_overwrites_only_target() {
        let mut tree = sample();
        let before_sibling = tree.file_by_id(0).cloned().unwrap();

        let outcome = tree.apply_updates(&[FileRecordDelta {
            index: 1,
            completed_size: 30,
            wanted: true,
            priority: Priority::High,
        }]);

        let updated = tree.file_by_id(1).unwrap();
        assert_eq!(updated.completed_size, 30);
        assert_eq!(updated.priority, Priority::High);
        assert_eq!(tree.file_by_id(0), Some(&before_sibling));
        assert_eq!(outcome.changed_files, vec![tree.file_node(1).unwrap()]);
    }

    #[test]
    fn test_unwanting_one_file_makes_directory_mixed() {
        let mut tree = sample();
        let dir = tree.root().children()[0];
        assert_eq!(tree.rollup(dir).wanted, WantedState::Wanted);

        let delta = FileRecord::new(1, ["a", "c.txt"], 50).with_wanted(false).delta();
        let outcome = tree.apply_updates(&[delta]);

        assert_eq!(tree.rollup(dir).wanted, WantedState::Mixed);
        assert!(outcome.touches_listing_of(dir));
        assert!(outcome.touches_listing_of(NodeId::ROOT));
    }

    #[test]
    fn test_unknown_ids_are_dropped() {
        let mut tree = sample();
        let snapshot = tree.clone();
        let outcome = tree.apply_updates(&[FileRecord::new(99, ["x"], 1).delta()]);
        assert_eq!(outcome.missing, 1);
        assert!(outcome.is_empty());
        assert_eq!(tree, snapshot);
    }

    #[test]
    fn test_identical_values_do_not_mark_changed() {
        let mut tree = sample();
        let outcome = tree.apply_updates(&[FileRecord::new(2, ["other"], 10).delta()]);
        assert!(outcome.is_empty());
        assert!(tree.take_changed().is_empty());
    }

    #[test]
    fn test_changed_flag_is_single_shot() {
        let mut tree = sample();
        let target = tree.file_node(2).unwrap();
        tree.apply_updates(&[FileRecord::new(2, ["other"], 10).with_completed(10).delta()]);

        assert!(tree.is_changed(target));
        assert_eq!(tree.take_changed(), vec![target]);
        assert!(!tree.is_changed(target));
        assert!(tree.take_changed().is_empty());
    }
}
