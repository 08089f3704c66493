use tortree_core::{FilesBackend, Priority, format_ids};

/// A change the user asked for, as it would be sent to the torrent client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRequest {
    Wanted { ids: Vec<u32>, wanted: bool },
    Priority { ids: Vec<u32>, priority: Priority },
}

impl FileRequest {
    pub fn describe(&self) -> String {
        match self {
            FileRequest::Wanted { ids, wanted } => format!(
                "{} {} file{}",
                if *wanted { "Download" } else { "Skip" },
                ids.len(),
                if ids.len() == 1 { "" } else { "s" }
            ),
            FileRequest::Priority { ids, priority } => format!(
                "{} priority for {} file{}",
                priority.label(),
                ids.len(),
                if ids.len() == 1 { "" } else { "s" }
            ),
        }
    }
}

/// Backend that records requests instead of talking to a client
#[derive(Debug, Default)]
pub struct RequestLog {
    pub requests: Vec<FileRequest>,
}

impl RequestLog {
    pub fn last(&self) -> Option<&FileRequest> {
        self.requests.last()
    }
}

impl FilesBackend for RequestLog {
    fn set_files_wanted(&mut self, ids: &[u32], wanted: bool) {
        tracing::info!(ids = %format_ids(ids), wanted, "set files wanted");
        self.requests.push(FileRequest::Wanted {
            ids: ids.to_vec(),
            wanted,
        });
    }

    fn set_files_priority(&mut self, ids: &[u32], priority: Priority) {
        tracing::info!(ids = %format_ids(ids), priority = priority.label(), "set files priority");
        self.requests.push(FileRequest::Priority {
            ids: ids.to_vec(),
            priority,
        });
    }
}
