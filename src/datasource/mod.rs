//! Ingestion of forwarding history, channel info, and node logs.
//!
//! Records leave this module fully populated; malformed input is rejected here.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod csv_records;
pub mod lnd_logs;

pub use csv_records::{read_channel_info, read_forwards, ChannelInfoMap};
pub use lnd_logs::{extract_add_events, extract_resolve_events, find_log_files, read_log_lines};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("lz4 decode error on {path}: {message}")]
    Lz4 { path: PathBuf, message: String },
    #[error("gzip decode error on {path}: {message}")]
    Gzip { path: PathBuf, message: String },
    #[error("csv error: {0}")]
    Csv(String),
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },
    #[error("log directory not found: {0}")]
    MissingLogDir(PathBuf),
    #[error("no lnd.log* files in {0}")]
    NoLogFiles(PathBuf),
}

/// True if `path` names an LZ4 frame file.
pub fn is_lz4(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "lz4")
}

/// True if `path` names a gzip file.
pub fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Open `path` for reading, decompressing `.lz4` frame and `.gz` files on the fly.
pub fn open_input(path: &Path) -> Result<Box<dyn Read>, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    if is_lz4(path) {
        Ok(Box::new(lz4_flex::frame::FrameDecoder::new(reader)))
    } else if is_gzip(path) {
        Ok(Box::new(flate2::read::MultiGzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Read the whole of `path` as bytes, decompressing `.lz4` and `.gz` files.
pub fn read_input_bytes(path: &Path) -> Result<Vec<u8>, IngestError> {
    let mut out = Vec::new();
    open_input(path)?.read_to_end(&mut out).map_err(|e| {
        let path = path.to_path_buf();
        if is_lz4(&path) {
            IngestError::Lz4 {
                path,
                message: e.to_string(),
            }
        } else if is_gzip(&path) {
            IngestError::Gzip {
                path,
                message: e.to_string(),
            }
        } else {
            IngestError::Io { path, source: e }
        }
    })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn compress_lz4_frame(input: &[u8]) -> Vec<u8> {
        let mut encoder = lz4_flex::frame::FrameEncoder::new(Vec::new());
        encoder.write_all(input).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_lz4_input_is_decompressed() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("forwards.csv.lz4");
        let body = b"timestamp_ns,chan_id_in\n1,a\n";
        std::fs::write(&path, compress_lz4_frame(body)).unwrap();

        assert_eq!(read_input_bytes(&path).unwrap(), body);
    }

    #[test]
    fn test_gzip_input_is_decompressed() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("lnd.log.3.gz");
        let body = b"2024-03-01 12:00:00.000 [INF] LTND: Version 0.17\n";
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(body).unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();

        assert_eq!(read_input_bytes(&path).unwrap(), body);
    }

    #[test]
    fn test_corrupt_gzip_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("lnd.log.1.gz");
        std::fs::write(&path, b"not really gzip").unwrap();

        assert!(matches!(
            read_input_bytes(&path),
            Err(IngestError::Gzip { .. })
        ));
    }

    #[test]
    fn test_plain_input_is_passed_through() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("forwards.csv");
        std::fs::write(&path, b"abc").unwrap();

        assert_eq!(read_input_bytes(&path).unwrap(), b"abc");
    }

    #[test]
    fn test_corrupt_lz4_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.lz4");
        std::fs::write(&path, b"definitely not lz4").unwrap();

        assert!(matches!(
            read_input_bytes(&path),
            Err(IngestError::Lz4 { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_input_bytes(Path::new("/nonexistent/forwards.csv")).unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
    }
}
