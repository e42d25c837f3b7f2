//! Plain-text document collaborators.
//!
//! Paginated artifacts are UTF-8 text with pages separated by a form feed,
//! which is what most PDF text extractors emit between pages.

use super::{DocumentSink, PaginatedSource, RawTextSource, SourceError, SourceResult};
use std::path::{Path, PathBuf};

/// Form feed between pages.
pub const PAGE_SEPARATOR: char = '\u{000C}';

/// Narrative text stored in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFile {
    path: PathBuf,
}

impl TextFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RawTextSource for TextFile {
    fn read_text(&self) -> SourceResult<String> {
        std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// In-memory paginated text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagedText {
    pages: Vec<String>,
}

impl PagedText {
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }

    /// Splits `text` into pages at every form feed.
    pub fn from_text(text: &str) -> Self {
        let mut pages = text
            .split(PAGE_SEPARATOR)
            .map(str::to_string)
            .collect::<Vec<_>>();
        if pages.len() > 1 && pages.last().is_some_and(|page| page.trim().is_empty()) {
            pages.pop();
        }
        Self { pages }
    }

    pub fn load(path: impl AsRef<Path>) -> SourceResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_text(&text))
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }
}

impl PaginatedSource for PagedText {
    fn page_count(&self) -> SourceResult<usize> {
        Ok(self.pages.len())
    }

    fn page_text(&self, page: usize) -> SourceResult<String> {
        if page == 0 || page > self.pages.len() {
            return Err(SourceError::PageOutOfRange {
                page,
                page_count: self.pages.len(),
            });
        }
        Ok(self.pages[page - 1].clone())
    }
}

/// Collects rendered lines into pages.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedTextSink {
    usable_height: f32,
    pages: Vec<Vec<String>>,
}

impl PagedTextSink {
    pub fn new(usable_height: f32) -> Self {
        Self {
            usable_height,
            pages: vec![Vec::new()],
        }
    }

    pub fn pages(&self) -> &[Vec<String>] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Renders every page, separated by form feeds.
    pub fn render(&self) -> String {
        let separator = PAGE_SEPARATOR.to_string();
        self.pages
            .iter()
            .map(|lines| {
                let mut page = lines.join("\n");
                page.push('\n');
                page
            })
            .collect::<Vec<_>>()
            .join(separator.as_str())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> SourceResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.render()).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reopens the collected pages as a paginated source.
    pub fn to_paged_text(&self) -> PagedText {
        PagedText::new(self.pages.iter().map(|lines| lines.join("\n")).collect())
    }
}

impl DocumentSink for PagedTextSink {
    fn usable_height(&self) -> f32 {
        self.usable_height
    }

    fn write_line(&mut self, line: &str) -> SourceResult<()> {
        if let Some(page) = self.pages.last_mut() {
            page.push(line.to_string());
        }
        Ok(())
    }

    fn page_break(&mut self) -> SourceResult<()> {
        self.pages.push(Vec::new());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{PagedText, PagedTextSink, PAGE_SEPARATOR};
    use crate::document::{DocumentSink, PaginatedSource, SourceError};

    #[test]
    fn paged_text_splits_on_form_feed_and_drops_trailing_blank_page() {
        let text = format!("one{PAGE_SEPARATOR}two{PAGE_SEPARATOR}\n");
        let pages = PagedText::from_text(&text);
        assert_eq!(pages.page_count().unwrap(), 2);
        assert_eq!(pages.page_text(2).unwrap(), "two");
    }

    #[test]
    fn page_indices_are_one_based() {
        let pages = PagedText::new(vec!["only".to_string()]);
        assert!(matches!(
            pages.page_text(0),
            Err(SourceError::PageOutOfRange { page: 0, page_count: 1 })
        ));
        assert!(pages.page_text(2).is_err());
    }

    #[test]
    fn sink_render_round_trips_through_paged_text() {
        let mut sink = PagedTextSink::new(100.0);
        sink.write_line("a").unwrap();
        sink.page_break().unwrap();
        sink.write_line("b").unwrap();
        sink.write_line("c").unwrap();
        let reopened = PagedText::from_text(&sink.render());
        assert_eq!(reopened.page_count().unwrap(), 2);
        assert_eq!(reopened.page_text(2).unwrap().trim(), "b\nc");
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("family.pages");
        let mut sink = PagedTextSink::new(100.0);
        sink.write_line("[1] Ann (\u{2013})").unwrap();
        sink.save(&path).unwrap();
        let pages = PagedText::load(&path).unwrap();
        assert_eq!(pages.pages().len(), 1);
        assert!(pages.pages()[0].contains("[1] Ann"));
    }
}
