//! Lifecycle of one torrent's files tree: snapshot, build, updates and
//! user requests.

use crate::record::{FileRecord, FileRecordDelta, Priority};
use crate::state::{SavedState, is_state_valid};
use crate::tree::{Entry, FilesTree, Navigator, NodeId, UpdateOutcome};
use crate::worker::{BuildConfig, BuildJob, BuiltTree, CancellationToken};

/// Receives the requests produced by wanted/priority changes
pub trait FilesBackend {
    fn set_files_wanted(&mut self, ids: &[u32], wanted: bool);
    fn set_files_priority(&mut self, ids: &[u32], priority: Priority);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No torrent selected
    #[default]
    Idle,
    /// Waiting for the first file listing
    Loading,
    /// A build job is in flight
    CreatingTree,
    TreeCreated,
}

/// Owns the tree of a single torrent and decides when to rebuild it.
///
/// Builds are handed out as [`BuildJob`]s so the caller can run them on
/// whatever thread it likes. Results come back through
/// [`finish_build`](Self::finish_build), which drops anything started
/// before the latest rebuild or reset.
pub struct FilesSession<B: FilesBackend> {
    backend: B,
    state: SessionState,
    tree: FilesTree,
    navigator: Navigator,
    epoch: u64,
    cancel: CancellationToken,
    build_config: BuildConfig,
    pending_position: Option<Vec<usize>>,
    last_update: UpdateOutcome,
}

impl<B: FilesBackend> FilesSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: SessionState::Idle,
            tree: FilesTree::new(),
            navigator: Navigator::new(),
            epoch: 0,
            cancel: CancellationToken::new(),
            build_config: BuildConfig::default(),
            pending_position: None,
            last_update: UpdateOutcome::default(),
        }
    }

    pub fn with_build_config(mut self, config: BuildConfig) -> Self {
        self.build_config = config;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn tree(&self) -> &FilesTree {
        &self.tree
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Outcome of the most recent incremental update
    pub fn last_update(&self) -> &UpdateOutcome {
        &self.last_update
    }

    /// Clear and return the nodes changed since the last call
    pub fn take_changed(&mut self) -> Vec<NodeId> {
        self.tree.take_changed()
    }

    /// A torrent became available; its file listing is expected next
    pub fn load(&mut self) {
        tracing::info!("torrent available, waiting for files");
        self.state = SessionState::Loading;
    }

    /// Directory to open once the next build finishes
    pub fn set_pending_position(&mut self, ordinals: Vec<usize>) {
        self.pending_position = Some(ordinals);
    }

    /// Feed a full listing or a changed subset.
    ///
    /// Returns a job when the records call for a fresh tree: the first
    /// listing after [`load`](Self::load), or the first non-empty listing
    /// for a torrent whose metadata was missing until now. Everything else
    /// in [`SessionState::TreeCreated`] is an incremental update.
    pub fn files_updated(&mut self, records: Vec<FileRecord>) -> Option<BuildJob> {
        match self.state {
            SessionState::Loading => self.create_tree(records),
            SessionState::TreeCreated => {
                if self.tree.is_empty() && !records.is_empty() {
                    tracing::info!(files = records.len(), "torrent metadata arrived, rebuilding");
                    return self.create_tree(records);
                }
                let deltas: Vec<FileRecordDelta> = records.iter().map(FileRecordDelta::from).collect();
                self.last_update = self.tree.apply_updates(&deltas);
                None
            }
            SessionState::Idle | SessionState::CreatingTree => {
                tracing::trace!(state = ?self.state, files = records.len(), "ignoring file update");
                None
            }
        }
    }

    fn create_tree(&mut self, records: Vec<FileRecord>) -> Option<BuildJob> {
        if records.is_empty() {
            self.publish(FilesTree::new());
            return None;
        }

        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.epoch += 1;
        self.state = SessionState::CreatingTree;

        Some(
            BuildJob::new(self.epoch, records, self.cancel.clone())
                .with_config(self.build_config.clone()),
        )
    }

    /// Install a finished tree. Returns false if the build was superseded.
    pub fn finish_build(&mut self, built: BuiltTree) -> bool {
        if built.epoch != self.epoch || self.state != SessionState::CreatingTree {
            tracing::debug!(
                build_epoch = built.epoch,
                current_epoch = self.epoch,
                "discarding stale tree build"
            );
            return false;
        }

        self.publish(built.tree);
        true
    }

    fn publish(&mut self, tree: FilesTree) {
        self.tree = tree;
        self.last_update = UpdateOutcome::default();
        self.navigator = match self.pending_position.take() {
            Some(ordinals) => Navigator::restore(&self.tree, &ordinals),
            None => Navigator::new(),
        };
        self.state = SessionState::TreeCreated;
        tracing::info!(files = self.tree.file_count(), "files tree created");
    }

    /// Apply choices saved from an earlier session.
    /// Returns false when the state belongs to a different torrent.
    pub fn restore_state(&mut self, torrent_name: &str, saved: &SavedState) -> bool {
        if self.state != SessionState::TreeCreated || !is_state_valid(saved, torrent_name, &self.tree) {
            tracing::info!(torrent = torrent_name, "saved state does not match, ignoring");
            return false;
        }

        let outcome = self.tree.apply_updates(&saved.deltas(&self.tree));
        self.tree.take_changed();
        self.navigator = Navigator::restore(&self.tree, &saved.position);
        tracing::info!(restored = outcome.changed_files.len(), "applied saved state");
        true
    }

    pub fn capture_state(&self, torrent_name: &str) -> SavedState {
        SavedState::capture(torrent_name, &self.tree, &self.navigator)
    }

    /// Drop the tree and abandon any build in flight
    pub fn reset(&mut self) {
        if self.state == SessionState::Idle {
            return;
        }
        tracing::info!(epoch = self.epoch, "resetting files session");
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.epoch += 1;
        self.tree = FilesTree::new();
        self.navigator = Navigator::new();
        self.pending_position = None;
        self.last_update = UpdateOutcome::default();
        self.state = SessionState::Idle;
    }

    /// Rename the node at `path`. Unknown paths are ignored.
    pub fn file_renamed(&mut self, path: &str, new_name: &str) -> bool {
        match self.tree.rename(path, new_name) {
            Some(_) => true,
            None => {
                tracing::debug!(path, new_name, "rename target not found");
                false
            }
        }
    }

    /// Change the wanted flag of the selection and forward the ids
    pub fn set_wanted(&mut self, selection: &[NodeId], wanted: bool) -> Vec<u32> {
        let ids = self.tree.set_wanted(selection, wanted);
        if !ids.is_empty() {
            self.backend.set_files_wanted(&ids, wanted);
        }
        ids
    }

    /// Change the priority of the selection and forward the ids
    pub fn set_priority(&mut self, selection: &[NodeId], priority: Priority) -> Vec<u32> {
        let ids = self.tree.set_priority(selection, priority);
        if !ids.is_empty() {
            self.backend.set_files_priority(&ids, priority);
        }
        ids
    }

    pub fn current_directory(&self) -> NodeId {
        self.navigator.current()
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.navigator.entries(&self.tree)
    }

    pub fn enter(&mut self, id: NodeId) -> bool {
        self.navigator.enter(&self.tree, id)
    }

    pub fn up(&mut self) -> bool {
        self.navigator.up(&self.tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct RecordingBackend {
        wanted: Vec<(Vec<u32>, bool)>,
        priority: Vec<(Vec<u32>, Priority)>,
    }

    impl FilesBackend for RecordingBackend {
        fn set_files_wanted(&mut self, ids: &[u32], wanted: bool) {
            self.wanted.push((ids.to_vec(), wanted));
        }

        fn set_files_priority(&mut self, ids: &[u32], priority: Priority) {
            self.priority.push((ids.to_vec(), priority));
        }
    }

    fn records() -> Vec<FileRecord> {
        vec![
            FileRecord::new(0, ["a", "b.txt"], 100),
            FileRecord::new(1, ["a", "c.txt"], 50),
            FileRecord::new(2, ["d.txt"], 10),
        ]
    }

    fn loaded_session() -> FilesSession<RecordingBackend> {
        let mut session = FilesSession::new(RecordingBackend::default());
        session.load();
        let job = session.files_updated(records()).unwrap();
        assert_eq!(session.state(), SessionState::CreatingTree);
        assert!(session.finish_build(job.run().unwrap()));
        session
    }

    #[test]
    fn test_load_build_and_publish() {
        let session = loaded_session();
        assert_eq!(session.state(), SessionState::TreeCreated);
        assert_eq!(session.tree().file_count(), 3);
        assert!(session.navigator().is_at_root());
    }

    #[test]
    fn test_updates_ignored_before_load() {
        let mut session = FilesSession::new(RecordingBackend::default());
        assert!(session.files_updated(records()).is_none());
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.tree().is_empty());
    }

    #[test]
    fn test_empty_listing_creates_empty_tree() {
        let mut session = FilesSession::new(RecordingBackend::default());
        session.load();
        assert!(session.files_updated(Vec::new()).is_none());
        assert_eq!(session.state(), SessionState::TreeCreated);
        assert!(session.tree().is_empty());
    }

    #[test]
    fn test_metadata_arrival_triggers_rebuild() {
        let mut session = FilesSession::new(RecordingBackend::default());
        session.load();
        session.files_updated(Vec::new());

        let job = session.files_updated(records()).unwrap();
        assert_eq!(session.state(), SessionState::CreatingTree);
        assert!(session.finish_build(job.run().unwrap()));
        assert_eq!(session.tree().file_count(), 3);
    }

    #[test]
    fn test_incremental_update() {
        let mut session = loaded_session();
        let update = vec![FileRecord::new(1, ["a", "c.txt"], 50).with_completed(25)];

        assert!(session.files_updated(update).is_none());
        let changed = session.last_update().changed_files.clone();
        assert_eq!(changed, vec![session.tree().file_node(1).unwrap()]);
        assert_eq!(session.tree().file_by_id(1).unwrap().completed_size, 25);
        assert_eq!(session.take_changed(), changed);

        // empty subset on a populated tree stays incremental
        assert!(session.files_updated(Vec::new()).is_none());
    }

    #[test]
    fn test_stale_build_discarded() {
        let mut session = FilesSession::new(RecordingBackend::default());
        session.load();
        let first = session.files_updated(records()).unwrap();
        let first_token = first.cancellation();

        session.reset();
        assert!(first_token.is_cancelled());
        session.load();
        let second = session
            .files_updated(vec![FileRecord::new(0, ["only.bin"], 1)])
            .unwrap();

        let stale = BuildJob::new(first.epoch(), records(), CancellationToken::new())
            .run()
            .unwrap();
        assert!(!session.finish_build(stale));
        assert_eq!(session.state(), SessionState::CreatingTree);

        assert!(session.finish_build(second.run().unwrap()));
        assert_eq!(session.tree().file_count(), 1);
    }

    #[test]
    fn test_reset_drops_tree() {
        let mut session = loaded_session();
        let epoch = session.epoch();
        session.reset();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.tree().is_empty());
        assert!(session.epoch() > epoch);
    }

    #[test]
    fn test_mutations_forward_to_backend() {
        let mut session = loaded_session();
        let dir = session.tree().find_by_path("a").unwrap();
        let file = session.tree().find_by_path("a/b.txt").unwrap();

        assert_eq!(session.set_wanted(&[dir, file], false), vec![0, 1]);
        assert_eq!(session.set_priority(&[file], Priority::High), vec![0]);
        assert!(session.set_wanted(&[], true).is_empty());

        let backend = session.backend();
        assert_eq!(backend.wanted, vec![(vec![0, 1], false)]);
        assert_eq!(backend.priority, vec![(vec![0], Priority::High)]);
    }

    #[test]
    fn test_rename() {
        let mut session = loaded_session();
        assert!(session.file_renamed("a/b.txt", "renamed.txt"));
        assert!(!session.file_renamed("a/missing.txt", "x"));
        assert!(session.tree().find_by_path("a/renamed.txt").is_some());
    }

    #[test]
    fn test_navigation_and_pending_position() {
        let mut session = loaded_session();
        let dir = session.tree().find_by_path("a").unwrap();
        assert!(session.enter(dir));
        assert_eq!(session.entries()[0], Entry::Parent);
        let saved = session.navigator().save(session.tree());

        session.reset();
        session.load();
        session.set_pending_position(saved);
        let job = session.files_updated(records()).unwrap();
        assert!(session.finish_build(job.run().unwrap()));
        assert_eq!(session.current_directory(), dir);
        assert!(session.up());
        assert_eq!(session.current_directory(), NodeId::ROOT);
    }

    #[test]
    fn test_restore_saved_state() {
        let mut session = loaded_session();
        let dir = session.tree().find_by_path("a").unwrap();
        session.set_wanted(&[dir], false);
        session.enter(dir);
        let saved = session.capture_state("pack");

        let mut fresh = loaded_session();
        assert!(!fresh.restore_state("other", &saved));
        assert!(fresh.restore_state("pack", &saved));
        assert!(!fresh.tree().file_by_id(0).unwrap().wanted);
        assert!(fresh.tree().file_by_id(2).unwrap().wanted);
        assert_eq!(fresh.current_directory(), dir);
        // restoring is local only
        assert!(fresh.backend().wanted.is_empty());
    }
}
