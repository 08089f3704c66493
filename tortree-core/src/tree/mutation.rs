use std::collections::HashSet;

use crate::record::Priority;

use super::arena::FilesTree;
use super::node::{FileData, NodeId};

impl FilesTree {
    /// Set the wanted flag on every file under the selection.
    ///
    /// Returns the affected file ids, each once, in the order they were
    /// first reached. The change is applied locally right away.
    pub fn set_wanted(&mut self, selection: &[NodeId], wanted: bool) -> Vec<u32> {
        self.mutate_selection(selection, |file| file.wanted = wanted)
    }

    /// Set the priority on every file under the selection
    pub fn set_priority(&mut self, selection: &[NodeId], priority: Priority) -> Vec<u32> {
        self.mutate_selection(selection, |file| file.priority = priority)
    }

    /// File nodes reachable from the selection, without duplicates
    pub fn selected_files(&self, selection: &[NodeId]) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        selection
            .iter()
            .flat_map(|&id| self.descendant_files(id))
            .filter(|id| seen.insert(*id))
            .collect()
    }

    fn mutate_selection(&mut self, selection: &[NodeId], apply: impl Fn(&mut FileData)) -> Vec<u32> {
        let files = self.selected_files(selection);
        let mut ids = Vec::with_capacity(files.len());

        for id in files {
            if let Some(file) = self.file_mut(id) {
                apply(file);
                ids.push(file.file_id);
            }
        }

        ids
    }
}
