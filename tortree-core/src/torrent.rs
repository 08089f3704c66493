//! Reading the file listing out of `.torrent` metainfo files.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, TortreeError};
use crate::record::FileRecord;

/// Larger files are rejected before reading (10 MiB)
pub const MAX_TORRENT_FILE_SIZE: u64 = 10 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct MetaInfo {
    info: Info,
}

#[derive(Debug, Deserialize)]
struct Info {
    name: String,
    #[serde(default)]
    length: Option<u64>,
    #[serde(default)]
    files: Option<Vec<FileEntry>>,
}

#[derive(Debug, Deserialize)]
struct FileEntry {
    length: u64,
    path: Vec<String>,
}

/// Name and flat file listing of a torrent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorrentMetadata {
    pub name: String,
    pub records: Vec<FileRecord>,
}

impl TorrentMetadata {
    pub fn total_size(&self) -> u64 {
        self.records.iter().map(|r| r.size).sum()
    }
}

/// Decode bencoded metainfo.
///
/// A single-file torrent yields one record named after the torrent. In a
/// multi-file torrent the torrent name becomes the top-level directory and
/// file indices follow the order of the `files` list. Every file starts
/// wanted, at normal priority, with nothing downloaded.
pub fn parse_torrent(bytes: &[u8]) -> Result<TorrentMetadata> {
    let meta: MetaInfo = serde_bencode::from_bytes(bytes)?;
    let info = meta.info;

    let records = match info.files {
        None => {
            let length = info.length.ok_or_else(|| {
                TortreeError::InvalidTorrent(
                    "field 'length' is required for single-file torrents".to_string(),
                )
            })?;
            vec![FileRecord::new(0, [info.name.clone()], length)]
        }
        Some(files) => files
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                if entry.path.is_empty() {
                    return Err(TortreeError::InvalidTorrent(format!(
                        "file {index} has an empty path"
                    )));
                }
                let index = u32::try_from(index).map_err(|_| {
                    TortreeError::InvalidTorrent("too many files".to_string())
                })?;
                let path = std::iter::once(info.name.clone()).chain(entry.path);
                Ok(FileRecord::new(index, path, entry.length))
            })
            .collect::<Result<Vec<_>>>()?,
    };

    Ok(TorrentMetadata {
        name: info.name,
        records,
    })
}

/// Read and decode a `.torrent` file
pub fn load_torrent(path: &Path) -> Result<TorrentMetadata> {
    if !path.exists() {
        return Err(TortreeError::TorrentNotFound(path.to_path_buf()));
    }

    let size = fs::metadata(path)?.len();
    if size > MAX_TORRENT_FILE_SIZE {
        tracing::error!(path = %path.display(), size, "torrent file is too large");
        return Err(TortreeError::FileTooLarge {
            size,
            limit: MAX_TORRENT_FILE_SIZE,
        });
    }

    let bytes = fs::read(path).inspect_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "failed to read torrent file");
    })?;

    let metadata = parse_torrent(&bytes).inspect_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "failed to parse torrent file");
    })?;

    tracing::info!(
        name = %metadata.name,
        files = metadata.records.len(),
        "loaded torrent metainfo"
    );
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SINGLE: &[u8] =
        b"d4:infod6:lengthi1000e4:name8:solo.iso12:piece lengthi16384e6:pieces0:ee";
    const MULTI: &[u8] = b"d8:announce9:udp://x:14:infod5:filesld6:lengthi100e4:pathl1:a5:b.txteed6:lengthi50e4:pathl5:c.txteee4:name3:top12:piece lengthi16384e6:pieces0:ee";

    #[test]
    fn test_single_file() {
        let meta = parse_torrent(SINGLE).unwrap();
        assert_eq!(meta.name, "solo.iso");
        assert_eq!(meta.records, vec![FileRecord::new(0, ["solo.iso"], 1000)]);
    }

    #[test]
    fn test_multi_file_wraps_in_torrent_name() {
        let meta = parse_torrent(MULTI).unwrap();
        assert_eq!(meta.name, "top");
        assert_eq!(
            meta.records,
            vec![
                FileRecord::new(0, ["top", "a", "b.txt"], 100),
                FileRecord::new(1, ["top", "c.txt"], 50),
            ]
        );
        assert_eq!(meta.total_size(), 150);
    }

    #[test]
    fn test_missing_length() {
        let err = parse_torrent(b"d4:infod4:name1:xee").unwrap_err();
        assert!(matches!(err, TortreeError::InvalidTorrent(_)));
    }

    #[test]
    fn test_empty_path_entry() {
        let err = parse_torrent(b"d4:infod5:filesld6:lengthi1e4:pathleee4:name1:xee").unwrap_err();
        assert!(matches!(err, TortreeError::InvalidTorrent(_)));
    }

    #[test]
    fn test_not_a_torrent() {
        assert!(matches!(
            parse_torrent(b"d3:fooi1ee"),
            Err(TortreeError::Bencode(_))
        ));
        assert!(parse_torrent(b"garbage").is_err());
    }

    #[test]
    fn test_load_from_disk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("multi.torrent");
        std::fs::write(&path, MULTI).unwrap();

        let meta = load_torrent(&path).unwrap();
        assert_eq!(meta.records.len(), 2);

        let missing = load_torrent(&temp.path().join("nope.torrent"));
        assert!(matches!(missing, Err(TortreeError::TorrentNotFound(_))));
    }

    #[test]
    fn test_too_large() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("huge.torrent");
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(MAX_TORRENT_FILE_SIZE + 1).unwrap();

        assert!(matches!(
            load_torrent(&path),
            Err(TortreeError::FileTooLarge { .. })
        ));
    }
}
