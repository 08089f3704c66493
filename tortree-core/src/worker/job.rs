use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Instant;

use crossbeam_channel::Receiver;

use super::progress::{BuildMessage, BuildProgress};
use crate::error::{Result, TortreeError};
use crate::record::FileRecord;
use crate::tree::{FilesTree, TreeBuilder};

/// Build worker configuration
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Records processed between two progress messages
    pub progress_interval: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            progress_interval: 512,
        }
    }
}

/// Cancellation token for stopping builds
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// A finished tree tagged with the epoch of the build that produced it
#[derive(Debug)]
pub struct BuiltTree {
    pub epoch: u64,
    pub tree: FilesTree,
}

/// One tree build, detached from the session that requested it
#[derive(Debug)]
pub struct BuildJob {
    epoch: u64,
    records: Vec<FileRecord>,
    cancel: CancellationToken,
    config: BuildConfig,
}

impl BuildJob {
    pub fn new(epoch: u64, records: Vec<FileRecord>, cancel: CancellationToken) -> Self {
        Self {
            epoch,
            records,
            cancel,
            config: BuildConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn file_count(&self) -> usize {
        self.records.len()
    }

    /// Build on the calling thread
    pub fn run(self) -> Result<BuiltTree> {
        self.run_reporting(|_| {})
    }

    /// Build on a background thread.
    /// Returns a receiver for progress updates and the thread's handle.
    pub fn spawn(self) -> (Receiver<BuildMessage>, JoinHandle<()>) {
        let (tx, rx) = crossbeam_channel::unbounded();

        let handle = std::thread::spawn(move || {
            let progress_tx = tx.clone();
            let message = match self.run_reporting(|progress| {
                let _ = progress_tx.send(BuildMessage::Progress(progress));
            }) {
                Ok(built) => BuildMessage::Completed(built),
                Err(_) => BuildMessage::Cancelled,
            };
            let _ = tx.send(message);
        });

        (rx, handle)
    }

    fn run_reporting(self, mut on_progress: impl FnMut(BuildProgress)) -> Result<BuiltTree> {
        let start = Instant::now();
        let total_files = self.records.len();
        let interval = self.config.progress_interval.max(1);
        tracing::info!(epoch = self.epoch, files = total_files, "building files tree");

        let mut builder = TreeBuilder::new();
        for (i, record) in self.records.iter().enumerate() {
            if self.cancel.is_cancelled() {
                tracing::info!(epoch = self.epoch, done = i, "files tree build cancelled");
                return Err(TortreeError::Cancelled);
            }
            builder.add_file(record);

            if (i + 1) % interval == 0 {
                on_progress(BuildProgress {
                    files_added: i + 1,
                    total_files,
                });
            }
        }

        on_progress(BuildProgress {
            files_added: total_files,
            total_files,
        });

        let tree = builder.finish();
        tracing::debug!(
            epoch = self.epoch,
            nodes = tree.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "files tree built"
        );

        Ok(BuiltTree {
            epoch: self.epoch,
            tree,
        })
    }
}
