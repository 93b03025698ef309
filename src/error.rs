//! Error types for the logger

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the logger
///
/// Only `CreateDirectory` and `OpenFile` reach callers during startup. The
/// rest are produced in the background and end up on the diagnostic stream.
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("failed to create log directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to open log file {path}: {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to clear old logs: cannot read {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to clear old logs: cannot remove {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to start log writer thread: {0}")]
    SpawnWriter(#[source] io::Error),

    #[error("logger is closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, LoggerError>;
