use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an analysis run
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The log file path does not exist
    #[error("the file '{}' does not exist", path.display())]
    FileNotFound { path: PathBuf },

    /// The log file exists but could not be read
    #[error("the file '{}' cannot be read: {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The CSV report could not be created or written
    #[error("failed to write report '{}': {source}", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The console tables could not be written to stdout
    #[error("failed to write to standard output: {0}")]
    Console(#[from] io::Error),
}
