use serde::{Deserialize, Serialize};

/// Download priority of a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

impl Priority {
    /// Decode Transmission's integer priority. Unknown values become `Normal`.
    pub fn from_rpc(value: i64) -> Self {
        match value {
            -1 => Priority::Low,
            1 => Priority::High,
            _ => Priority::Normal,
        }
    }

    pub fn to_rpc(self) -> i64 {
        match self {
            Priority::Low => -1,
            Priority::Normal => 0,
            Priority::High => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Normal => "Normal",
            Priority::High => "High",
        }
    }
}

/// Flat description of one file in a torrent, as reported by the RPC layer
/// or produced from a parsed `.torrent` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Stable file index, used to address the file in requests
    pub index: u32,
    /// Path segments from the torrent root to the file
    pub path: Vec<String>,
    pub size: u64,
    pub completed_size: u64,
    pub wanted: bool,
    pub priority: Priority,
}

impl FileRecord {
    /// A wanted, normal-priority file with nothing downloaded yet
    pub fn new<I, S>(index: u32, path: I, size: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            index,
            path: path.into_iter().map(Into::into).collect(),
            size,
            completed_size: 0,
            wanted: true,
            priority: Priority::Normal,
        }
    }

    pub fn with_completed(mut self, completed_size: u64) -> Self {
        self.completed_size = completed_size;
        self
    }

    pub fn with_wanted(mut self, wanted: bool) -> Self {
        self.wanted = wanted;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn delta(&self) -> FileRecordDelta {
        FileRecordDelta::from(self)
    }
}

/// The mutable part of a [`FileRecord`], carried by incremental updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecordDelta {
    pub index: u32,
    pub completed_size: u64,
    pub wanted: bool,
    pub priority: Priority,
}

impl From<&FileRecord> for FileRecordDelta {
    fn from(record: &FileRecord) -> Self {
        Self {
            index: record.index,
            completed_size: record.completed_size,
            wanted: record.wanted,
            priority: record.priority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_rpc_mapping() {
        assert_eq!(Priority::from_rpc(-1), Priority::Low);
        assert_eq!(Priority::from_rpc(0), Priority::Normal);
        assert_eq!(Priority::from_rpc(1), Priority::High);
        assert_eq!(Priority::from_rpc(42), Priority::Normal);

        for priority in [Priority::Low, Priority::Normal, Priority::High] {
            assert_eq!(Priority::from_rpc(priority.to_rpc()), priority);
        }
    }

    #[test]
    fn test_record_defaults() {
        let record = FileRecord::new(3, ["dir", "file.bin"], 10);
        assert_eq!(record.path, vec!["dir".to_string(), "file.bin".to_string()]);
        assert!(record.wanted);
        assert_eq!(record.priority, Priority::Normal);
        assert_eq!(record.completed_size, 0);

        let delta = record.with_completed(4).with_wanted(false).delta();
        assert_eq!(delta.index, 3);
        assert_eq!(delta.completed_size, 4);
        assert!(!delta.wanted);
    }
}
