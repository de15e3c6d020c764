//! Error types for spool parsing

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::reader::PageList;

/// Spool parser error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading the spool stream
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The spool file could not be opened
    #[error("Failed to open spool file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configured line break sequence has no bytes
    #[error("Line break sequence must contain at least one byte")]
    EmptyLineBreak,

    /// The caller cancelled the parse; carries the pages finalized so far
    #[error("Parse cancelled after {} finalized page(s)", .0.len())]
    Cancelled(PageList),
}

/// Result type for spool parsing
pub type Result<T> = std::result::Result<T, Error>;
