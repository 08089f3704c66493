pub mod compare;
pub mod error;
pub mod record;
pub mod session;
pub mod size;
pub mod state;
pub mod torrent;
pub mod tree;
pub mod worker;

pub use error::{Result, TortreeError};
pub use record::{FileRecord, FileRecordDelta, Priority};
pub use session::{FilesBackend, FilesSession, SessionState};
pub use size::{format_count, format_ids, format_progress, format_size};
pub use state::{SavedState, load_state, save_state, state_path_for};
pub use torrent::{TorrentMetadata, load_torrent, parse_torrent};
pub use tree::{Entry, FilesTree, Navigator, NodeId, NodeKind, PriorityState, TreeNode, WantedState};
pub use worker::{BuildConfig, BuildJob, BuildMessage, BuildProgress, BuiltTree, CancellationToken};
