//! Read a spool file and deliver its pages to a sink

use std::fs;
use std::path::{Path, PathBuf};

use prn_parser::{PageList, SpoolReader};

use crate::config::Config;
use crate::error::AppError;
use crate::sink::PageSink;

/// One spool file to split
pub struct App {
    config: Config,
    input: PathBuf,
}

impl App {
    pub fn new(config: Config, input: PathBuf) -> Self {
        Self { config, input }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Extract the pages of the input file
    pub fn read_pages(&self) -> Result<PageList, AppError> {
        if !self.config.pjl_aware {
            log::debug!("PJL segmentation disabled; reading {} as one page", self.input.display());
            let bytes = fs::read(&self.input).map_err(|source| AppError::Read {
                path: self.input.clone(),
                source,
            })?;
            return Ok(PageList::from(vec![bytes]));
        }

        let line_break = self.config.line_break_bytes()?;
        let reader = SpoolReader::new(self.config.commands_per_page, &line_break)?;
        Ok(reader.read_path(&self.input)?)
    }

    /// One read-and-deliver cycle; returns the number of pages delivered
    pub fn deliver<S: PageSink>(&self, sink: &mut S) -> Result<usize, AppError> {
        let pages = self.read_pages()?;
        let total = pages.len();
        if total == 0 {
            log::warn!("No page data found in {}", self.input.display());
        }

        sink.begin(total)?;
        for (index, page) in pages.iter().enumerate() {
            sink.send(index, page, index + 1 == total)?;
        }
        sink.finish()?;

        Ok(total)
    }

    /// Run the cycle, retrying transient I/O failures up to `max_attempts`
    pub fn run<S: PageSink>(&self, sink: &mut S) -> Result<usize, AppError> {
        let mut attempt = 1;
        loop {
            log::debug!("Attempt {} of {}", attempt, self.config.max_attempts);
            match self.deliver(sink) {
                Ok(total) => return Ok(total),
                Err(e) if e.is_retryable() && attempt < self.config.max_attempts => {
                    log::warn!("Attempt {} failed: {}; retrying", attempt, e);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
