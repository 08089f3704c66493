use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TortreeError {
    #[error("Torrent file does not exist: {0}")]
    TorrentNotFound(PathBuf),

    #[error("Torrent file is too large: {size} bytes (limit is {limit})")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Failed to decode bencode structure: {0}")]
    Bencode(#[from] serde_bencode::Error),

    #[error("Invalid torrent metadata: {0}")]
    InvalidTorrent(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Saved state error: {0}")]
    State(String),

    #[error("Tree build was cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, TortreeError>;
