use crate::error::AnalyzerError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The full content of a log file, loaded once and shared read-only by every stage
#[derive(Debug, Clone)]
pub struct LogText {
    path: PathBuf,
    content: String,
}

impl LogText {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}

/// Read the whole log file into memory.
///
/// Invalid UTF-8 sequences are replaced rather than rejected, since access
/// logs routinely carry raw bytes from clients.
pub fn load(path: &Path) -> Result<LogText, AnalyzerError> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => AnalyzerError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => AnalyzerError::ReadError {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    debug!(path = %path.display(), bytes = bytes.len(), "loaded log file");

    let content = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            warn!(
                path = %path.display(),
                offset = e.utf8_error().valid_up_to(),
                "log file is not valid UTF-8, replacing invalid sequences"
            );
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };

    Ok(LogText {
        path: path.to_path_buf(),
        content,
    })
}
