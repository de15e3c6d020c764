//! Spool reader
//!
//! Entry point over a whole spool file or stream. A stream that starts with
//! the PJL start-of-file line is segmented into pages; anything else is
//! returned unchanged as a single page.

use std::fs::File;
use std::io::Read;
use std::ops::Index;
use std::path::Path;
use std::sync::atomic::AtomicBool;

use crate::error::{Error, Result};
use crate::marker::Markers;
use crate::segmenter::{Segmenter, Token};
use crate::source::ByteSource;

/// Page payloads in the order they appear in the spool file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageList(Vec<Vec<u8>>);

impl PageList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.0.get(index).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.0.iter().map(Vec::as_slice)
    }

    /// Sum of all page lengths
    pub fn total_bytes(&self) -> usize {
        self.0.iter().map(Vec::len).sum()
    }

    pub fn into_vec(self) -> Vec<Vec<u8>> {
        self.0
    }
}

impl From<Vec<Vec<u8>>> for PageList {
    fn from(pages: Vec<Vec<u8>>) -> Self {
        Self(pages)
    }
}

impl Index<usize> for PageList {
    type Output = [u8];

    fn index(&self, index: usize) -> &[u8] {
        &self.0[index]
    }
}

impl IntoIterator for PageList {
    type Item = Vec<u8>;
    type IntoIter = std::vec::IntoIter<Vec<u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Reads spool files into page lists
#[derive(Debug, Clone)]
pub struct SpoolReader {
    markers: Markers,
    threshold: usize,
}

impl SpoolReader {
    /// Create a reader with the page-boundary threshold and line break
    pub fn new(threshold: usize, line_break: &[u8]) -> Result<Self> {
        Ok(Self::with_markers(Markers::new(line_break)?, threshold))
    }

    pub fn with_markers(markers: Markers, threshold: usize) -> Self {
        Self { markers, threshold }
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Read the spool file at `path`
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<PageList> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Reading spool file {}", path.display());
        self.read(file)
    }

    /// Read a complete spool stream
    pub fn read<R: Read>(&self, reader: R) -> Result<PageList> {
        self.read_with(reader, None, |_| {})
    }

    /// Read a complete spool stream, reporting every classified span to
    /// `on_token` and polling `cancel` between steps
    pub fn read_with<R, F>(
        &self,
        reader: R,
        cancel: Option<&AtomicBool>,
        mut on_token: F,
    ) -> Result<PageList>
    where
        R: Read,
        F: FnMut(Token<'_>),
    {
        let mut source = ByteSource::new(reader);
        let start_line = self.markers.file_start_line();
        let mut head = source.read_up_to(start_line.len())?;

        if head != start_line {
            log::debug!("No PJL start-of-file line; reading the whole stream as one page");
            source.read_to_end(&mut head)?;
            on_token(Token::Data(&head));
            on_token(Token::PageEnd {
                index: 0,
                len: head.len(),
            });
            return Ok(PageList(vec![head]));
        }

        on_token(Token::FileStart(&head));
        Segmenter::new(&self.markers, self.threshold).run(&mut source, cancel, on_token)
    }
}

/// Parse the spool file at `path` into pages.
///
/// `threshold` is the number of consecutive PJL command lines that separates
/// two pages, `line_break` the byte sequence ending each command line.
pub fn parse<P: AsRef<Path>>(path: P, threshold: usize, line_break: &[u8]) -> Result<PageList> {
    SpoolReader::new(threshold, line_break)?.read_path(path)
}
