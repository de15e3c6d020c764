//! PRN Parser - PJL-aware printer spool parser
//!
//! This crate splits a printer spool capture ("PRN") into the raw image
//! payloads of its pages. It strips PJL (Printer Job Language) control lines
//! and framing, and keeps every other byte.
//!
//! The parser is designed to:
//! - Read the stream byte by byte, forward only
//! - Never drop a byte: a failed marker match is returned as page data
//! - Detect page boundaries from runs of consecutive PJL command lines
//! - Fall back to a single page when the file carries no PJL framing
//!
//! Reference: HP PJL Technical Reference Manual

mod error;
pub mod marker;
mod matcher;
mod reader;
mod segmenter;
mod source;

pub use error::{Error, Result};
pub use marker::{MarkerKind, Markers};
pub use matcher::{LineMatcher, MatchResult};
pub use reader::{parse, PageList, SpoolReader};
pub use segmenter::{Segmenter, Token};
pub use source::ByteSource;
