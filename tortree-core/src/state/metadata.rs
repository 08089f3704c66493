use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::record::{FileRecordDelta, Priority};
use crate::tree::{FilesTree, Navigator};

/// Current state format version - increment when format changes
pub const STATE_VERSION: u32 = 1;

/// Magic bytes identifying a tortree state file
pub const STATE_MAGIC: [u8; 4] = *b"TTRS";

/// User choices for one torrent, persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedState {
    /// State format version
    pub version: u32,
    /// Name of the torrent the state was captured from
    pub torrent_name: String,
    /// Number of files in the tree at capture time
    pub file_count: usize,
    /// Total size of the tree at capture time
    pub total_size: u64,
    pub saved_at: SystemTime,
    /// Navigator position as sibling ordinals from the root
    pub position: Vec<usize>,
    pub files: Vec<SavedFile>,
}

/// Wanted flag and priority of one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedFile {
    pub index: u32,
    pub wanted: bool,
    pub priority: Priority,
}

impl SavedState {
    pub fn capture(torrent_name: &str, tree: &FilesTree, navigator: &Navigator) -> Self {
        let mut files: Vec<SavedFile> = tree
            .files()
            .map(|(_, file)| SavedFile {
                index: file.file_id,
                wanted: file.wanted,
                priority: file.priority,
            })
            .collect();
        files.sort_by_key(|f| f.index);

        Self {
            version: STATE_VERSION,
            torrent_name: torrent_name.to_string(),
            file_count: tree.file_count(),
            total_size: tree.total_size(),
            saved_at: SystemTime::now(),
            position: navigator.save(tree),
            files,
        }
    }

    /// Updates that bring `tree` in line with the saved choices.
    /// Downloaded byte counts are taken from the tree as is.
    pub fn deltas(&self, tree: &FilesTree) -> Vec<FileRecordDelta> {
        self.files
            .iter()
            .filter_map(|saved| {
                let current = tree.file_by_id(saved.index)?;
                Some(FileRecordDelta {
                    index: saved.index,
                    completed_size: current.completed_size,
                    wanted: saved.wanted,
                    priority: saved.priority,
                })
            })
            .collect()
    }
}
