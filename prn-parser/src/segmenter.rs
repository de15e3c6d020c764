//! Page segmenter
//!
//! Drives the line matcher across a PJL-framed stream. Every byte is either
//! part of a control construct (dropped from the output) or page data (kept).
//!
//! Page boundaries are detected after the fact: a run of at least `threshold`
//! consecutive command lines marks a page change, and the boundary is taken
//! at the first non-command step after that run. The bytes of that step open
//! the new page.

use std::io::Read;
use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Error, Result};
use crate::marker::Markers;
use crate::matcher::{LineMatcher, MatchResult};
use crate::reader::PageList;
use crate::source::ByteSource;

/// Classified span of the input, reported in stream order.
///
/// Concatenating the bytes of every token gives back the input exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// The start-of-file line that enables PJL segmentation
    FileStart(&'a [u8]),
    /// A complete PJL command line, line break included
    CommandLine(&'a [u8]),
    /// The end-of-file line; scanning stops after it
    FileEnd(&'a [u8]),
    /// Bytes kept as page data
    Data(&'a [u8]),
    /// Bytes after the end-of-file line, belonging to no page
    Trailing(&'a [u8]),
    /// A page was finalized
    PageEnd { index: usize, len: usize },
}

impl<'a> Token<'a> {
    /// Input bytes covered by this token (empty for `PageEnd`)
    pub fn bytes(&self) -> &'a [u8] {
        match *self {
            Token::FileStart(bytes)
            | Token::CommandLine(bytes)
            | Token::FileEnd(bytes)
            | Token::Data(bytes)
            | Token::Trailing(bytes) => bytes,
            Token::PageEnd { .. } => &[],
        }
    }
}

/// Mutable state of one segmentation run
#[derive(Debug, Default)]
struct SegmenterState {
    /// Bytes of the page in progress
    pending_page: Vec<u8>,
    /// Finished pages in stream order
    finalized: Vec<Vec<u8>>,
    /// Consecutive command lines seen since the last non-command step
    control_line_run_count: usize,
    end_of_input: bool,
}

impl SegmenterState {
    /// Move the pending page to the finalized list; empty pages are dropped
    fn finalize_page<F>(&mut self, on_token: &mut F)
    where
        F: FnMut(Token<'_>),
    {
        if self.pending_page.is_empty() {
            return;
        }

        let page = mem::take(&mut self.pending_page);
        let index = self.finalized.len();
        log::debug!("Page [{}] is ended ({} bytes)", index, page.len());
        on_token(Token::PageEnd {
            index,
            len: page.len(),
        });
        self.finalized.push(page);
    }

    /// Handle a non-command step: check the boundary, then keep `data`
    fn accept_data<F>(&mut self, data: &[u8], threshold: usize, on_token: &mut F)
    where
        F: FnMut(Token<'_>),
    {
        if self.control_line_run_count >= threshold {
            self.finalize_page(on_token);
        }
        self.control_line_run_count = 0;

        on_token(Token::Data(data));
        self.pending_page.extend_from_slice(data);
    }
}

/// Splits a PJL-framed stream into pages
#[derive(Debug, Clone, Copy)]
pub struct Segmenter<'m> {
    matcher: LineMatcher<'m>,
    threshold: usize,
}

impl<'m> Segmenter<'m> {
    /// Create a segmenter; `threshold` is the number of consecutive command
    /// lines that separates two pages
    pub fn new(markers: &'m Markers, threshold: usize) -> Self {
        Self {
            matcher: LineMatcher::new(markers),
            threshold,
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Segment the rest of `source` into pages.
    ///
    /// `cancel` is polled before every step; once set, the run stops with
    /// [`Error::Cancelled`] holding the pages finalized so far.
    pub fn run<R, F>(
        &self,
        source: &mut ByteSource<R>,
        cancel: Option<&AtomicBool>,
        mut on_token: F,
    ) -> Result<PageList>
    where
        R: Read,
        F: FnMut(Token<'_>),
    {
        let markers = self.matcher.markers();
        let command_first = markers.command_prefix()[0];
        let identifier_first = markers.identifier()[0];
        let mut state = SegmenterState::default();

        while !state.end_of_input {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                log::debug!(
                    "Cancelled at offset {} with {} finalized page(s)",
                    source.position(),
                    state.finalized.len()
                );
                return Err(Error::Cancelled(state.finalized.into()));
            }

            let Some(byte) = source.next_byte()? else {
                state.end_of_input = true;
                break;
            };

            if byte == command_first {
                match self.matcher.match_command_line(source, byte)? {
                    MatchResult::Matched(line) => {
                        state.control_line_run_count += 1;
                        on_token(Token::CommandLine(&line));
                    }
                    MatchResult::NotMatched(bytes) => {
                        state.accept_data(&bytes, self.threshold, &mut on_token);
                    }
                }
            } else if byte == identifier_first {
                match self.matcher.match_file_end(source, byte)? {
                    MatchResult::Matched(line) => {
                        log::debug!("PJL end-of-file line at offset {}", source.position());
                        on_token(Token::FileEnd(&line));
                        state.end_of_input = true;
                    }
                    MatchResult::NotMatched(bytes) => {
                        state.accept_data(&bytes, self.threshold, &mut on_token);
                    }
                }
            } else {
                state.accept_data(&[byte], self.threshold, &mut on_token);
            }
        }

        state.finalize_page(&mut on_token);

        let mut trailing = Vec::new();
        if source.read_to_end(&mut trailing)? > 0 {
            log::debug!("{} byte(s) after the end-of-file line ignored", trailing.len());
            on_token(Token::Trailing(&trailing));
        }

        log::debug!("{} page(s) found", state.finalized.len());
        Ok(state.finalized.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(input: &[u8], threshold: usize) -> Vec<Vec<u8>> {
        let markers = Markers::default();
        let segmenter = Segmenter::new(&markers, threshold);
        let mut source = ByteSource::new(input);
        segmenter.run(&mut source, None, |_| {}).unwrap().into_vec()
    }

    fn tokens(input: &[u8], threshold: usize) -> Vec<String> {
        let markers = Markers::default();
        let segmenter = Segmenter::new(&markers, threshold);
        let mut source = ByteSource::new(input);
        let mut out = Vec::new();
        segmenter
            .run(&mut source, None, |token| {
                out.push(match token {
                    Token::FileStart(_) => "start".to_string(),
                    Token::CommandLine(_) => "command".to_string(),
                    Token::FileEnd(_) => "end".to_string(),
                    Token::Data(bytes) => format!("data:{}", bytes.escape_ascii()),
                    Token::Trailing(bytes) => format!("trailing:{}", bytes.len()),
                    Token::PageEnd { index, len } => format!("page:{}:{}", index, len),
                })
            })
            .unwrap();
        out
    }

    #[test]
    fn test_command_line_splits_pages() {
        let pages = segment(b"AB@PJL SET\r\nCD", 1);
        assert_eq!(pages, vec![b"AB".to_vec(), b"CD".to_vec()]);
    }

    #[test]
    fn test_run_below_threshold_is_stripped() {
        let pages = segment(b"AB@PJL SET\r\nCD", 2);
        assert_eq!(pages, vec![b"ABCD".to_vec()]);
    }

    #[test]
    fn test_long_run_splits_once() {
        let pages = segment(b"AB@PJL A\r\n@PJL B\r\n@PJL C\r\nCD", 2);
        assert_eq!(pages, vec![b"AB".to_vec(), b"CD".to_vec()]);
    }

    #[test]
    fn test_leading_run_makes_no_empty_page() {
        let pages = segment(b"@PJL A\r\n@PJL B\r\nDATA", 1);
        assert_eq!(pages, vec![b"DATA".to_vec()]);
    }

    #[test]
    fn test_trailing_run_makes_no_empty_page() {
        let pages = segment(b"DATA@PJL EOJ\r\n", 1);
        assert_eq!(pages, vec![b"DATA".to_vec()]);
    }

    #[test]
    fn test_failed_match_resets_run() {
        // The broken line is page data and breaks the run before it qualifies
        let pages = segment(b"AB@PJL A\r\n@PJ!@PJL B\r\nCD", 2);
        assert_eq!(pages, vec![b"AB@PJ!CD".to_vec()]);
    }

    #[test]
    fn test_failed_match_opens_new_page() {
        let pages = segment(b"AB@PJL A\r\n@PJ!CD", 1);
        assert_eq!(pages, vec![b"AB".to_vec(), b"@PJ!CD".to_vec()]);
    }

    #[test]
    fn test_end_of_file_line_stops_scan() {
        let pages = segment(b"AB@PJL A\r\nCD\x1b%-12345X\r\n@PJL B\r\nEF", 1);
        assert_eq!(pages, vec![b"AB".to_vec(), b"CD".to_vec()]);
    }

    #[test]
    fn test_identifier_without_line_break_is_data() {
        let pages = segment(b"AB\x1b%-12345XCD", 1);
        assert_eq!(pages, vec![b"AB\x1b%-12345XCD".to_vec()]);
    }

    #[test]
    fn test_empty_input() {
        assert!(segment(b"", 1).is_empty());
    }

    #[test]
    fn test_token_order() {
        let out = tokens(b"A@PJL X\r\nB\x1b%-12345X\r\nZZ", 1);
        assert_eq!(
            out,
            vec![
                "data:A",
                "command",
                "page:0:1",
                "data:B",
                "end",
                "page:1:1",
                "trailing:2",
            ]
        );
    }

    #[test]
    fn test_cancel_returns_finalized_pages() {
        let markers = Markers::default();
        let segmenter = Segmenter::new(&markers, 1);
        let mut source = ByteSource::new(&b"AB@PJL X\r\nCD@PJL Y\r\nEF"[..]);
        let cancel = AtomicBool::new(false);

        let result = segmenter.run(&mut source, Some(&cancel), |token| {
            if let Token::PageEnd { .. } = token {
                cancel.store(true, Ordering::Relaxed);
            }
        });

        match result {
            Err(Error::Cancelled(pages)) => {
                assert_eq!(pages.len(), 1);
                assert_eq!(pages.get(0), Some(&b"AB"[..]));
            }
            other => panic!("Expected cancellation, got {:?}", other),
        }
    }

    #[test]
    fn test_cancel_before_start() {
        let markers = Markers::default();
        let segmenter = Segmenter::new(&markers, 1);
        let mut source = ByteSource::new(&b"AB"[..]);
        let cancel = AtomicBool::new(true);

        let result = segmenter.run(&mut source, Some(&cancel), |_| {});
        assert!(matches!(result, Err(Error::Cancelled(pages)) if pages.is_empty()));
        assert_eq!(source.position(), 0);
    }
}
