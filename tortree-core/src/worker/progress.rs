use super::job::BuiltTree;

/// Message sent from a background build to its owner
#[derive(Debug)]
pub enum BuildMessage {
    /// Progress update
    Progress(BuildProgress),
    /// Build finished; the tree is handed over whole
    Completed(BuiltTree),
    /// Build was cancelled, nothing was produced
    Cancelled,
}

/// Tree building progress
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildProgress {
    /// Records grouped into the tree so far
    pub files_added: usize,
    /// Records in the snapshot being built
    pub total_files: usize,
}

impl BuildProgress {
    pub fn percentage(&self) -> f64 {
        crate::size::percentage(self.files_added as u64, self.total_files as u64)
    }
}
