use crate::error::{Result, TortreeError};
use crate::record::FileRecord;
use crate::worker::CancellationToken;

use super::arena::FilesTree;
use super::node::{FileData, NodeId};

/// Incrementally groups flat file records into a [`FilesTree`]
#[derive(Debug, Default)]
pub struct TreeBuilder {
    tree: FilesTree,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk the record's path from the root, creating missing directories,
    /// and append the file at the last segment. Records with an empty path
    /// are skipped.
    pub fn add_file(&mut self, record: &FileRecord) -> Option<NodeId> {
        let (file_name, dirs) = record.path.split_last()?;

        let mut current = NodeId::ROOT;
        for part in dirs {
            current = match self.tree.child_by_name(current, part) {
                Some(child) if self.tree.get(child).is_some_and(|n| n.is_directory()) => child,
                _ => self.tree.add_directory(current, part.clone())?,
            };
        }

        self.tree.add_file(
            current,
            file_name.clone(),
            FileData {
                file_id: record.index,
                size: record.size,
                completed_size: record.completed_size,
                wanted: record.wanted,
                priority: record.priority,
                changed: false,
            },
        )
    }

    pub fn file_count(&self) -> usize {
        self.tree.file_count()
    }

    pub fn finish(self) -> FilesTree {
        self.tree
    }
}

/// Build a tree from a full snapshot of file records
pub fn build_tree(records: &[FileRecord]) -> FilesTree {
    let mut builder = TreeBuilder::new();
    for record in records {
        builder.add_file(record);
    }
    builder.finish()
}

/// Like [`build_tree`], but checks `token` before each record.
/// A cancelled build returns no tree at all.
pub fn build_tree_cancellable(records: &[FileRecord], token: &CancellationToken) -> Result<FilesTree> {
    let mut builder = TreeBuilder::new();
    for record in records {
        if token.is_cancelled() {
            return Err(TortreeError::Cancelled);
        }
        builder.add_file(record);
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{NodeKind, WantedState};

    fn sample() -> Vec<FileRecord> {
        vec![
            FileRecord::new(0, ["a", "b.txt"], 100),
            FileRecord::new(1, ["a", "c.txt"], 50),
        ]
    }

    #[test]
    fn test_two_files_in_one_directory() {
        let tree = build_tree(&sample());

        assert_eq!(tree.root().children().len(), 1);
        let dir_id = tree.root().children()[0];
        let dir = tree.get(dir_id).unwrap();
        assert_eq!(dir.name, "a");
        assert!(dir.is_directory());

        let names: Vec<_> = dir
            .children()
            .iter()
            .map(|&id| tree.get(id).unwrap())
            .map(|n| (n.name.as_str(), n.file_id(), n.ordinal))
            .collect();
        assert_eq!(names, vec![("b.txt", Some(0), 0), ("c.txt", Some(1), 1)]);

        let rollup = tree.rollup(dir_id);
        assert_eq!(rollup.size, 150);
        assert_eq!(rollup.wanted, WantedState::Wanted);
    }

    #[test]
    fn test_single_file_torrent_has_no_wrapper() {
        let tree = build_tree(&[FileRecord::new(0, ["solo.iso"], 1000)]);

        assert_eq!(tree.root().children().len(), 1);
        let node = tree.get(tree.root().children()[0]).unwrap();
        assert!(matches!(node.kind, NodeKind::File(_)));
        assert_eq!(node.name, "solo.iso");
        assert_eq!(tree.total_size(), 1000);
    }

    #[test]
    fn test_children_keep_first_seen_order() {
        let tree = build_tree(&[
            FileRecord::new(0, ["z", "1"], 1),
            FileRecord::new(1, ["a", "1"], 1),
            FileRecord::new(2, ["z", "2"], 1),
        ]);
        let names: Vec<_> = tree
            .root()
            .children()
            .iter()
            .map(|&id| tree.get(id).unwrap().name.clone())
            .collect();
        assert_eq!(names, vec!["z", "a"]);
        assert_eq!(tree.children(tree.root().children()[0]).len(), 2);
    }

    #[test]
    fn test_rebuild_is_structurally_identical() {
        let records = vec![
            FileRecord::new(4, ["root", "x", "deep", "f"], 3),
            FileRecord::new(2, ["root", "y"], 9).with_wanted(false),
            FileRecord::new(7, ["root", "x", "g"], 1),
        ];
        assert_eq!(build_tree(&records), build_tree(&records));
    }

    #[test]
    fn test_size_sum_matches_leaves() {
        let records: Vec<_> = (0..40)
            .map(|i| FileRecord::new(i, [format!("d{}", i % 3), format!("f{i}")], u64::from(i) * 7))
            .collect();
        let tree = build_tree(&records);
        let leaves: u64 = tree.files().map(|(_, f)| f.size).sum();
        assert_eq!(tree.total_size(), leaves);
        assert_eq!(tree.file_count(), 40);
    }

    #[test]
    fn test_empty_path_is_skipped() {
        let mut builder = TreeBuilder::new();
        assert!(builder.add_file(&FileRecord::new(0, Vec::<String>::new(), 5)).is_none());
        assert_eq!(builder.file_count(), 0);
    }

    #[test]
    fn test_file_name_reused_as_directory() {
        let tree = build_tree(&[
            FileRecord::new(0, ["clash"], 1),
            FileRecord::new(1, ["clash", "inner"], 2),
        ]);
        assert_eq!(tree.root().children().len(), 2);
        let inner = tree.file_node(1).unwrap();
        assert_eq!(tree.node_path(inner), "clash/inner");
        assert_eq!(tree.find_by_path("clash/inner"), Some(inner));
    }

    #[test]
    fn test_cancelled_build_returns_nothing() {
        let token = CancellationToken::new();
        token.cancel();
        let result = build_tree_cancellable(&sample(), &token);
        assert!(matches!(result, Err(TortreeError::Cancelled)));

        let fresh = CancellationToken::new();
        let tree = build_tree_cancellable(&sample(), &fresh).unwrap();
        assert_eq!(tree.file_count(), 2);
    }
}
