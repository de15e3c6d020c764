//! Page sinks
//!
//! A sink receives the extracted pages in order, each tagged with its index
//! and whether it is the last one.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Destination for extracted pages
pub trait PageSink {
    /// Called once with the page count before any page is sent
    fn begin(&mut self, _total: usize) -> Result<(), AppError> {
        Ok(())
    }

    /// Deliver page `index` (0-based)
    fn send(&mut self, index: usize, page: &[u8], is_last: bool) -> Result<(), AppError>;

    fn finish(&mut self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Writes each page to `<stem>_<NNN>.<ext>`, numbering from 001
#[derive(Debug)]
pub struct DirectorySink {
    directory: PathBuf,
    stem: String,
    extension: String,
    overwrite: bool,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(directory: &Path, stem: &str, extension: &str, overwrite: bool) -> Self {
        Self {
            directory: directory.to_path_buf(),
            stem: stem.to_string(),
            extension: extension.to_string(),
            overwrite,
            written: Vec::new(),
        }
    }

    /// Path of page `index` (0-based)
    pub fn page_path(&self, index: usize) -> PathBuf {
        self.directory
            .join(format!("{}_{:03}.{}", self.stem, index + 1, self.extension))
    }

    /// Files written by the current delivery
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl PageSink for DirectorySink {
    fn begin(&mut self, total: usize) -> Result<(), AppError> {
        // A previous attempt failed partway; its pages are ours to replace
        for path in self.written.drain(..) {
            log::debug!("Removing partial output {}", path.display());
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(source) => return Err(AppError::Write { path, source }),
            }
        }

        fs::create_dir_all(&self.directory).map_err(|source| AppError::Write {
            path: self.directory.clone(),
            source,
        })?;

        if !self.overwrite {
            // Check every target before writing anything
            let existing: Vec<PathBuf> = (0..total)
                .map(|index| self.page_path(index))
                .filter(|path| path.exists())
                .collect();
            if !existing.is_empty() {
                return Err(AppError::OutputExists(existing));
            }
        }

        Ok(())
    }

    fn send(&mut self, index: usize, page: &[u8], _is_last: bool) -> Result<(), AppError> {
        let path = self.page_path(index);
        fs::write(&path, page).map_err(|source| AppError::Write {
            path: path.clone(),
            source,
        })?;
        log::info!("Wrote page {} ({} bytes) to {}", index + 1, page.len(), path.display());
        self.written.push(path);
        Ok(())
    }
}

/// Prints one summary line per page instead of writing files
#[derive(Debug)]
pub struct ListingSink<W> {
    out: W,
}

/// Leading bytes shown per page
const PREVIEW_LEN: usize = 8;

impl<W: Write> ListingSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> PageSink for ListingSink<W> {
    fn begin(&mut self, total: usize) -> Result<(), AppError> {
        writeln!(self.out, "{} page(s)", total)?;
        Ok(())
    }

    fn send(&mut self, index: usize, page: &[u8], is_last: bool) -> Result<(), AppError> {
        let preview: Vec<String> = page
            .iter()
            .take(PREVIEW_LEN)
            .map(|b| format!("{:02x}", b))
            .collect();
        let more = if page.len() > PREVIEW_LEN { " .." } else { "" };
        let last = if is_last { " (last)" } else { "" };
        writeln!(
            self.out,
            "[{:03}] {:>10} bytes  {}{}{}",
            index + 1,
            page.len(),
            preview.join(" "),
            more,
            last
        )?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), AppError> {
        self.out.flush()?;
        Ok(())
    }
}
