//! Error types for prn-split

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Spool parsing failed
    #[error(transparent)]
    Parse(#[from] prn_parser::Error),

    /// A plain input file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A page file could not be written
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Page files already exist and overwriting is disabled
    #[error("The following file(s) already exist:\n{}", join_paths(.0))]
    OutputExists(Vec<PathBuf>),

    /// Listing output failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

impl AppError {
    /// Whether running the whole read-and-write cycle again may succeed
    pub fn is_retryable(&self) -> bool {
        let io_error = match self {
            AppError::Parse(prn_parser::Error::Io(e))
            | AppError::Parse(prn_parser::Error::Open { source: e, .. })
            | AppError::Read { source: e, .. }
            | AppError::Write { source: e, .. }
            | AppError::Io(e) => e,
            _ => return false,
        };
        !matches!(
            io_error.kind(),
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
        )
    }
}
