//! PJL marker table
//!
//! The fixed byte sequences that delimit PJL control constructs. Only the
//! line break is configurable; the derived start and end lines are computed
//! once when the table is built and never change afterwards.

use crate::error::{Error, Result};

/// Universal Exit Language sequence that opens and closes a PJL job
pub const IDENTIFIER: &[u8] = b"\x1b%-12345X";

/// Prefix of every PJL command line
pub const COMMAND_PREFIX: &[u8] = b"@PJL";

/// Line break used by most drivers
pub const DEFAULT_LINE_BREAK: &[u8] = b"\r\n";

/// Semantic role of a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// ESC "%-12345X"
    Identifier,
    /// "@PJL"
    CommandPrefix,
    /// Configured line break
    LineBreak,
    /// Identifier + command prefix + line break
    FileStartLine,
    /// Identifier + line break
    FileEndLine,
}

/// Marker table for one parser configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    line_break: Vec<u8>,
    file_start_line: Vec<u8>,
    file_end_line: Vec<u8>,
}

impl Markers {
    /// Build the table for the given line break
    pub fn new(line_break: &[u8]) -> Result<Self> {
        if line_break.is_empty() {
            return Err(Error::EmptyLineBreak);
        }

        let file_start_line = [IDENTIFIER, COMMAND_PREFIX, line_break].concat();
        let file_end_line = [IDENTIFIER, line_break].concat();

        Ok(Self {
            line_break: line_break.to_vec(),
            file_start_line,
            file_end_line,
        })
    }

    pub fn get(&self, kind: MarkerKind) -> &[u8] {
        match kind {
            MarkerKind::Identifier => IDENTIFIER,
            MarkerKind::CommandPrefix => COMMAND_PREFIX,
            MarkerKind::LineBreak => &self.line_break,
            MarkerKind::FileStartLine => &self.file_start_line,
            MarkerKind::FileEndLine => &self.file_end_line,
        }
    }

    pub fn identifier(&self) -> &[u8] {
        IDENTIFIER
    }

    pub fn command_prefix(&self) -> &[u8] {
        COMMAND_PREFIX
    }

    pub fn line_break(&self) -> &[u8] {
        &self.line_break
    }

    pub fn file_start_line(&self) -> &[u8] {
        &self.file_start_line
    }

    pub fn file_end_line(&self) -> &[u8] {
        &self.file_end_line
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            line_break: DEFAULT_LINE_BREAK.to_vec(),
            file_start_line: [IDENTIFIER, COMMAND_PREFIX, DEFAULT_LINE_BREAK].concat(),
            file_end_line: [IDENTIFIER, DEFAULT_LINE_BREAK].concat(),
        }
    }
}
