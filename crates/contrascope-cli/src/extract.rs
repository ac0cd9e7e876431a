//! Contract text acquisition from files or standard input.

use std::io::Read;
use std::path::{Path, PathBuf};

use contrascope_core::PASTED_TEXT;
use thiserror::Error;

/// Largest accepted input, in bytes (10 MiB).
pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Path argument meaning "read standard input".
pub const STDIN_PATH: &str = "-";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is {size} bytes, over the {limit} byte limit", .path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("{} is not UTF-8 text", .path.display())]
    Unsupported { path: PathBuf },
}

/// Raw contract text plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub identifier: String,
    /// `None` for pasted text.
    pub size_bytes: Option<u64>,
    pub text: String,
}

impl Document {
    pub fn pasted(text: impl Into<String>) -> Self {
        Self {
            identifier: PASTED_TEXT.to_string(),
            size_bytes: None,
            text: text.into(),
        }
    }
}

/// Read `path` as a contract; `-` reads standard input as pasted text.
pub fn read_document(path: &Path, max_bytes: u64) -> Result<Document, ExtractionError> {
    if path.as_os_str() == STDIN_PATH {
        return read_stdin(max_bytes);
    }

    let unreadable = |source: std::io::Error| ExtractionError::Unreadable {
        path: path.to_path_buf(),
        source,
    };
    let size = std::fs::metadata(path).map_err(unreadable)?.len();
    if size > max_bytes {
        return Err(ExtractionError::TooLarge {
            path: path.to_path_buf(),
            size,
            limit: max_bytes,
        });
    }

    let bytes = std::fs::read(path).map_err(unreadable)?;
    let text = decode(bytes, path)?;
    let identifier = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    tracing::debug!(file = %identifier, size, "read contract");
    Ok(Document {
        identifier,
        size_bytes: Some(size),
        text,
    })
}

fn read_stdin(max_bytes: u64) -> Result<Document, ExtractionError> {
    let path = PathBuf::from(STDIN_PATH);
    read_limited(std::io::stdin().lock(), &path, max_bytes).map(Document::pasted)
}

fn read_limited(reader: impl Read, path: &Path, max_bytes: u64) -> Result<String, ExtractionError> {
    let mut bytes = Vec::new();
    // One byte past the limit is enough to know it was exceeded.
    reader
        .take(max_bytes.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|source| ExtractionError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
    let size = bytes.len() as u64;
    if size > max_bytes {
        return Err(ExtractionError::TooLarge {
            path: path.to_path_buf(),
            size,
            limit: max_bytes,
        });
    }
    decode(bytes, path)
}

/// UTF-8 text without a leading byte-order mark.
fn decode(mut bytes: Vec<u8>, path: &Path) -> Result<String, ExtractionError> {
    if bytes.starts_with(UTF8_BOM) {
        bytes.drain(..UTF8_BOM.len());
    }
    String::from_utf8(bytes).map_err(|_| ExtractionError::Unsupported {
        path: path.to_path_buf(),
    })
}
