use std::collections::HashSet;

use tortree_core::{BuildProgress, Entry, FilesSession, NodeId, Priority};

use super::requests::RequestLog;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Files tree is being built
    Building,
    /// Browsing the tree
    Browsing,
    /// Showing help overlay
    Help,
}

/// Application state
pub struct AppState {
    /// Current mode
    pub mode: AppMode,
    /// Name of the torrent being browsed
    pub torrent_name: String,
    pub session: FilesSession<RequestLog>,
    /// Current build progress
    pub progress: BuildProgress,
    /// Cursor position in the current listing
    pub selected_index: usize,
    /// Scroll offset for the listing
    pub scroll_offset: usize,
    /// Visible area height (set by UI)
    pub visible_height: usize,
    /// Whether app should quit
    pub should_quit: bool,
    /// Spinner frame for animation
    pub spinner_frame: usize,
    /// Message shown in the footer
    pub status_message: Option<String>,
    /// Multi-selected rows of the current directory
    pub selected_nodes: HashSet<NodeId>,
}

impl AppState {
    pub fn new(torrent_name: String, session: FilesSession<RequestLog>) -> Self {
        Self {
            mode: AppMode::Building,
            torrent_name,
            session,
            progress: BuildProgress::default(),
            selected_index: 0,
            scroll_offset: 0,
            visible_height: 20,
            should_quit: false,
            spinner_frame: 0,
            status_message: None,
            selected_nodes: HashSet::new(),
        }
    }

    /// Switch to browsing once the session has a tree
    pub fn tree_ready(&mut self) {
        self.mode = AppMode::Browsing;
        self.selected_index = 0;
        self.scroll_offset = 0;
        self.selected_nodes.clear();
    }

    /// Update build progress
    pub fn update_progress(&mut self, progress: BuildProgress) {
        self.progress = progress;
    }

    /// Advance spinner animation
    pub fn tick_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % 10;
    }

    /// Rows of the current directory
    pub fn entries(&self) -> Vec<Entry> {
        self.session.entries()
    }

    /// Row under the cursor
    pub fn selected_entry(&self) -> Option<Entry> {
        self.entries().get(self.selected_index).copied()
    }

    /// Ensure the given index is visible within the scroll viewport
    fn ensure_visible(&mut self) {
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + self.visible_height {
            self.scroll_offset = self.selected_index + 1 - self.visible_height.max(1);
        }
    }

    fn last_index(&self) -> usize {
        self.entries().len().saturating_sub(1)
    }

    /// Move selection up
    pub fn move_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
        self.ensure_visible();
    }

    /// Move selection down
    pub fn move_down(&mut self) {
        self.selected_index = (self.selected_index + 1).min(self.last_index());
        self.ensure_visible();
    }

    /// Move selection up by a page
    pub fn page_up(&mut self) {
        let page_size = self.visible_height.saturating_sub(2).max(1);
        self.selected_index = self.selected_index.saturating_sub(page_size);
        self.ensure_visible();
    }

    /// Move selection down by a page
    pub fn page_down(&mut self) {
        let page_size = self.visible_height.saturating_sub(2).max(1);
        self.selected_index = (self.selected_index + page_size).min(self.last_index());
        self.ensure_visible();
    }

    /// Go to first item
    pub fn go_to_first(&mut self) {
        self.selected_index = 0;
        self.ensure_visible();
    }

    /// Go to last item
    pub fn go_to_last(&mut self) {
        self.selected_index = self.last_index();
        self.ensure_visible();
    }

    /// Open the directory under the cursor, or go up on ".."
    pub fn enter_selected(&mut self) {
        match self.selected_entry() {
            Some(Entry::Parent) => self.go_up(),
            Some(Entry::Node(id)) => {
                if self.session.enter(id) {
                    self.selected_nodes.clear();
                    self.selected_index = 0;
                    self.scroll_offset = 0;
                }
            }
            None => {}
        }
    }

    /// Go to the parent directory, keeping the cursor on the one we left
    pub fn go_up(&mut self) {
        let left = self.session.current_directory();
        if !self.session.up() {
            return;
        }
        self.selected_nodes.clear();
        self.selected_index = self
            .entries()
            .iter()
            .position(|entry| *entry == Entry::Node(left))
            .unwrap_or(0);
        self.scroll_offset = 0;
        self.ensure_visible();
    }

    /// Toggle the row under the cursor in the multi-selection
    pub fn toggle_select(&mut self) {
        if let Some(Entry::Node(id)) = self.selected_entry()
            && !self.selected_nodes.remove(&id)
        {
            self.selected_nodes.insert(id);
        }
    }

    /// Select every row of the current directory
    pub fn select_all(&mut self) {
        self.selected_nodes = self
            .entries()
            .into_iter()
            .filter_map(|entry| match entry {
                Entry::Node(id) => Some(id),
                Entry::Parent => None,
            })
            .collect();
    }

    /// Clear the multi-selection
    pub fn clear_selection(&mut self) {
        self.selected_nodes.clear();
    }

    /// Number of nodes in the multi-selection
    pub fn selection_count(&self) -> usize {
        self.selected_nodes.len()
    }

    /// Nodes an action applies to: the multi-selection in listing order,
    /// or the row under the cursor when nothing is selected
    fn action_targets(&self) -> Vec<NodeId> {
        if self.selected_nodes.is_empty() {
            return match self.selected_entry() {
                Some(Entry::Node(id)) => vec![id],
                _ => Vec::new(),
            };
        }

        self.entries()
            .into_iter()
            .filter_map(|entry| match entry {
                Entry::Node(id) if self.selected_nodes.contains(&id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn set_wanted(&mut self, wanted: bool) {
        let targets = self.action_targets();
        let ids = self.session.set_wanted(&targets, wanted);
        self.finish_request(ids.is_empty());
    }

    pub fn set_priority(&mut self, priority: Priority) {
        let targets = self.action_targets();
        let ids = self.session.set_priority(&targets, priority);
        self.finish_request(ids.is_empty());
    }

    fn finish_request(&mut self, nothing_changed: bool) {
        self.status_message = if nothing_changed {
            Some("Nothing selected".to_string())
        } else {
            self.session.backend().last().map(|request| request.describe())
        };
        self.selected_nodes.clear();
    }

    /// Total size of the files currently wanted
    pub fn wanted_size(&self) -> u64 {
        self.session
            .tree()
            .files()
            .filter(|(_, file)| file.wanted)
            .map(|(_, file)| file.size)
            .sum()
    }

    /// Show help overlay
    pub fn show_help(&mut self) {
        self.mode = AppMode::Help;
    }

    /// Hide help overlay
    pub fn hide_help(&mut self) {
        self.mode = AppMode::Browsing;
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Set footer message
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    /// Per-file choices printed on exit: unwanted, high and low priority ids
    pub fn summary(&self) -> (Vec<u32>, Vec<u32>, Vec<u32>) {
        let mut unwanted = Vec::new();
        let mut high = Vec::new();
        let mut low = Vec::new();

        for (_, file) in self.session.tree().files() {
            if !file.wanted {
                unwanted.push(file.file_id);
            }
            match file.priority {
                Priority::High => high.push(file.file_id),
                Priority::Low => low.push(file.file_id),
                Priority::Normal => {}
            }
        }

        unwanted.sort_unstable();
        high.sort_unstable();
        low.sort_unstable();
        (unwanted, high, low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tortree_core::FileRecord;

    fn browsing_state() -> AppState {
        let mut session = FilesSession::new(RequestLog::default());
        session.load();
        let job = session
            .files_updated(vec![
                FileRecord::new(0, ["pack", "disc2", "track1.flac"], 30),
                FileRecord::new(1, ["pack", "disc1", "track1.flac"], 20),
                FileRecord::new(2, ["pack", "cover.jpg"], 5),
                FileRecord::new(3, ["pack", "disc1", "track2.flac"], 25),
            ])
            .unwrap();
        assert!(session.finish_build(job.run().unwrap()));

        let mut state = AppState::new("pack".to_string(), session);
        state.tree_ready();
        state.enter_selected();
        state
    }

    #[test]
    fn test_listing_order() {
        let state = browsing_state();
        let tree = state.session.tree();
        let names: Vec<_> = state
            .entries()
            .into_iter()
            .map(|entry| match entry {
                Entry::Parent => "..".to_string(),
                Entry::Node(id) => tree.get(id).unwrap().name.clone(),
            })
            .collect();
        assert_eq!(names, vec!["..", "disc1", "disc2", "cover.jpg"]);
    }

    #[test]
    fn test_enter_and_go_up_keeps_cursor() {
        let mut state = browsing_state();
        state.move_down();
        state.move_down();
        state.enter_selected();
        assert_eq!(
            state.session.current_directory(),
            state.session.tree().find_by_path("pack/disc2").unwrap()
        );

        state.go_to_first();
        state.enter_selected();
        assert_eq!(state.selected_index, 2);
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut state = browsing_state();
        state.move_up();
        assert_eq!(state.selected_index, 0);
        state.go_to_last();
        state.move_down();
        assert_eq!(state.selected_index, 3);
        state.page_up();
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn test_selection_actions() {
        let mut state = browsing_state();
        state.select_all();
        assert_eq!(state.selection_count(), 3);

        state.set_wanted(false);
        assert_eq!(state.selection_count(), 0);
        assert_eq!(
            state.session.backend().last(),
            Some(&crate::app::FileRequest::Wanted {
                ids: vec![1, 3, 0, 2],
                wanted: false
            })
        );
        assert_eq!(state.wanted_size(), 0);
        assert_eq!(state.status_message.as_deref(), Some("Skip 4 files"));
    }

    #[test]
    fn test_cursor_action_and_summary() {
        let mut state = browsing_state();
        state.go_to_last();
        state.set_priority(Priority::High);
        state.go_to_first();
        state.set_priority(Priority::Low);
        assert_eq!(state.status_message.as_deref(), Some("Nothing selected"));

        state.move_down();
        state.toggle_select();
        state.set_wanted(false);

        let (unwanted, high, low) = state.summary();
        assert_eq!(unwanted, vec![1, 3]);
        assert_eq!(high, vec![2]);
        assert!(low.is_empty());
    }
}
