//! PJL line matcher
//!
//! Recognizes a single control construct at the current stream position.
//! The caller has already consumed the first byte and passes it in. On
//! success the construct's bytes are consumed and nothing more; on failure
//! every byte read while probing is handed back so it can be kept as page
//! data.

use std::io::{self, Read};

use crate::marker::Markers;
use crate::source::ByteSource;

/// Outcome of probing the stream for a control construct
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// The construct was recognized; carries its bytes (never page data)
    Matched(Vec<u8>),
    /// The construct was not present; carries every byte consumed while probing
    NotMatched(Vec<u8>),
}

impl MatchResult {
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchResult::Matched(_))
    }

    /// Bytes consumed from the stream, whichever way the match went
    pub fn bytes(&self) -> &[u8] {
        match self {
            MatchResult::Matched(bytes) | MatchResult::NotMatched(bytes) => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            MatchResult::Matched(bytes) | MatchResult::NotMatched(bytes) => bytes,
        }
    }
}

/// Matches PJL constructs against a marker table
#[derive(Debug, Clone, Copy)]
pub struct LineMatcher<'m> {
    markers: &'m Markers,
}

/// Printable ASCII allowed in the free text of a command line
fn is_printable(byte: u8) -> bool {
    (0x20..=0x7E).contains(&byte)
}

impl<'m> LineMatcher<'m> {
    pub fn new(markers: &'m Markers) -> Self {
        Self { markers }
    }

    pub fn markers(&self) -> &'m Markers {
        self.markers
    }

    /// Match `marker` exactly, starting from the already consumed `first` byte.
    ///
    /// Bytes are accumulated while they agree with the marker. A mismatching
    /// byte is appended to the accumulator before giving up, so the returned
    /// `NotMatched` payload is exactly what was taken from the stream. End of
    /// stream before the marker completes is also a failure.
    pub fn match_marker<R: Read>(
        &self,
        source: &mut ByteSource<R>,
        first: u8,
        marker: &[u8],
    ) -> io::Result<MatchResult> {
        let mut accumulated = Vec::with_capacity(marker.len());
        accumulated.push(first);

        if marker.first() != Some(&first) {
            return Ok(MatchResult::NotMatched(accumulated));
        }

        while accumulated.len() < marker.len() {
            let Some(byte) = source.next_byte()? else {
                return Ok(MatchResult::NotMatched(accumulated));
            };
            accumulated.push(byte);
            if byte != marker[accumulated.len() - 1] {
                return Ok(MatchResult::NotMatched(accumulated));
            }
        }

        Ok(MatchResult::Matched(accumulated))
    }

    /// Match the PJL identifier (UEL) sequence
    pub fn match_identifier<R: Read>(
        &self,
        source: &mut ByteSource<R>,
        first: u8,
    ) -> io::Result<MatchResult> {
        self.match_marker(source, first, self.markers.identifier())
    }

    /// Match the end-of-file line: identifier followed by the line break
    pub fn match_file_end<R: Read>(
        &self,
        source: &mut ByteSource<R>,
        first: u8,
    ) -> io::Result<MatchResult> {
        self.match_marker(source, first, self.markers.file_end_line())
    }

    /// Match a command line: "@PJL", printable text, then the line break.
    ///
    /// While no line break byte has been seen, printable bytes are text. Once
    /// the first line break byte matches, the remaining break bytes must follow
    /// in order; any other byte ends the match as `NotMatched`.
    pub fn match_command_line<R: Read>(
        &self,
        source: &mut ByteSource<R>,
        first: u8,
    ) -> io::Result<MatchResult> {
        let prefix = self.markers.command_prefix();
        let mut accumulated = match self.match_marker(source, first, prefix)? {
            MatchResult::Matched(prefix) => prefix,
            not_matched => return Ok(not_matched),
        };

        let line_break = self.markers.line_break();
        let mut break_index = 0;

        loop {
            let Some(byte) = source.next_byte()? else {
                return Ok(MatchResult::NotMatched(accumulated));
            };
            accumulated.push(byte);

            if break_index == 0 && is_printable(byte) {
                continue;
            }

            if byte != line_break[break_index] {
                return Ok(MatchResult::NotMatched(accumulated));
            }

            break_index += 1;
            if break_index == line_break.len() {
                if log::log_enabled!(log::Level::Trace) {
                    log::trace!(
                        "PJL command line found: \"{}\"",
                        accumulated.escape_ascii()
                    );
                }
                return Ok(MatchResult::Matched(accumulated));
            }
        }
    }
}
