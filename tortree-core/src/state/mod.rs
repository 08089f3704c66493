mod metadata;

pub use metadata::{STATE_MAGIC, STATE_VERSION, SavedFile, SavedState};

use std::collections::hash_map::DefaultHasher;
use std::fs::{self, File};
use std::hash::{Hash, Hasher};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, TortreeError};
use crate::tree::FilesTree;

/// Get the state file path for a given torrent file
pub fn state_path_for(torrent: &Path, state_dir: &Path) -> PathBuf {
    let canonical = fs::canonicalize(torrent).unwrap_or_else(|_| torrent.to_path_buf());
    let hash = hash_path(&canonical);
    state_dir.join(format!("{:016x}.ttrs", hash))
}

fn hash_path(path: &Path) -> u64 {
    let mut hasher = DefaultHasher::new();
    path.hash(&mut hasher);
    hasher.finish()
}

/// Save state to a file
///
/// File format:
/// [4B] Magic "TTRS"
/// [4B] Version (u32 LE)
/// [4B] State length (u32 LE)
/// [NB] State (postcard)
/// [4B] CRC32 checksum of all preceding bytes
pub fn save_state(path: &Path, state: &SavedState) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut data = Vec::new();
    data.extend_from_slice(&STATE_MAGIC);
    data.extend_from_slice(&STATE_VERSION.to_le_bytes());

    let state_bytes = postcard::to_allocvec(state)
        .map_err(|e| TortreeError::State(format!("Failed to serialize state: {}", e)))?;
    data.extend_from_slice(&(state_bytes.len() as u32).to_le_bytes());
    data.extend_from_slice(&state_bytes);

    let checksum = crc32fast::hash(&data);
    data.extend_from_slice(&checksum.to_le_bytes());

    // Write atomically by writing to temp file then renaming
    let temp_path = path.with_extension("tmp");
    let mut file = File::create(&temp_path)?;
    file.write_all(&data)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&temp_path, path)?;
    tracing::debug!(path = %path.display(), bytes = data.len(), "saved state");

    Ok(())
}

fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    data.get(offset..offset + 4)
        .and_then(|bytes| bytes.try_into().ok())
        .map(u32::from_le_bytes)
        .ok_or_else(|| TortreeError::State("State file truncated".to_string()))
}

/// Load state from a file
pub fn load_state(path: &Path) -> Result<SavedState> {
    let mut file = File::open(path)?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;

    // magic(4) + version(4) + state_len(4) + checksum(4)
    if data.len() < 16 {
        return Err(TortreeError::State("State file too small".to_string()));
    }

    let checksum_offset = data.len() - 4;
    let stored_checksum = read_u32(&data, checksum_offset)?;
    let computed_checksum = crc32fast::hash(&data[..checksum_offset]);
    if stored_checksum != computed_checksum {
        return Err(TortreeError::State("State checksum mismatch".to_string()));
    }

    if data[..4] != STATE_MAGIC {
        return Err(TortreeError::State("Invalid state magic".to_string()));
    }

    let version = read_u32(&data, 4)?;
    if version != STATE_VERSION {
        return Err(TortreeError::State(format!(
            "State version mismatch: expected {}, got {}",
            STATE_VERSION, version
        )));
    }

    let state_len = read_u32(&data, 8)? as usize;
    let start = 12;
    if start + state_len > checksum_offset {
        return Err(TortreeError::State("Invalid state length".to_string()));
    }
    let state: SavedState = postcard::from_bytes(&data[start..start + state_len])
        .map_err(|e| TortreeError::State(format!("Failed to deserialize state: {}", e)))?;

    Ok(state)
}

/// Check that a saved state was captured from the same torrent
pub fn is_state_valid(state: &SavedState, torrent_name: &str, tree: &FilesTree) -> bool {
    state.torrent_name == torrent_name
        && state.file_count == tree.file_count()
        && state.total_size == tree.total_size()
}
