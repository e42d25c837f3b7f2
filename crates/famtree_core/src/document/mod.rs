//! Document collaborator contracts.
//!
//! # Responsibility
//! - Define the narrow interfaces the engine uses for raw text, paginated
//!   input and paginated output.
//! - Keep file formats and storage outside the parsing algorithms.
//!
//! # Invariants
//! - Page indices are 1-based.
//! - Sinks report usable page height; the writer decides page breaks.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod plain;

pub use plain::{PagedText, PagedTextSink, TextFile, PAGE_SEPARATOR};

pub type SourceResult<T> = Result<T, SourceError>;

#[derive(Debug)]
pub enum SourceError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    PageOutOfRange {
        page: usize,
        page_count: usize,
    },
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "document i/o failed for `{}`: {source}", path.display())
            }
            Self::PageOutOfRange { page, page_count } => {
                write!(f, "page {page} is out of range 1..={page_count}")
            }
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::PageOutOfRange { .. } => None,
        }
    }
}

/// Supplies the full narrative text of one document.
pub trait RawTextSource {
    fn read_text(&self) -> SourceResult<String>;
}

/// Supplies extracted plain text per page, top to bottom.
pub trait PaginatedSource {
    fn page_count(&self) -> SourceResult<usize>;
    /// `page` is 1-based.
    fn page_text(&self, page: usize) -> SourceResult<String>;
}

/// Accepts rendered lines and page breaks and produces a paginated artifact.
pub trait DocumentSink {
    /// Usable height of one page, in the same unit as the line height.
    fn usable_height(&self) -> f32;
    fn write_line(&mut self, line: &str) -> SourceResult<()>;
    fn page_break(&mut self) -> SourceResult<()>;
}

impl RawTextSource for str {
    fn read_text(&self) -> SourceResult<String> {
        Ok(self.to_string())
    }
}

impl RawTextSource for String {
    fn read_text(&self) -> SourceResult<String> {
        Ok(self.clone())
    }
}
