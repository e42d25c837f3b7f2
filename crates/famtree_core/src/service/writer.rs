//! Paginated document writing (model -> document).
//!
//! # Invariants
//! - One rendered record per line; no wrapping or reflow.
//! - A page break is emitted before a line that would overflow the page,
//!   never before the first line of a page.

use crate::config::PageLayout;
use crate::document::DocumentSink;
use crate::error::{TemplateError, TemplateResult};
use crate::model::TemplateLine;
use log::{debug, info};
use std::time::Instant;

/// Counts reported after a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteSummary {
    pub lines: usize,
    pub pages: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct DocumentWriter {
    layout: PageLayout,
}

impl DocumentWriter {
    pub fn new(layout: PageLayout) -> Self {
        Self { layout }
    }

    /// Renders `lines` into `sink`, breaking pages at the sink's usable height.
    pub fn write<K: DocumentSink + ?Sized>(
        &self,
        lines: &[TemplateLine],
        sink: &mut K,
    ) -> TemplateResult<WriteSummary> {
        let started_at = Instant::now();
        let usable_height = sink.usable_height();
        let line_height = self.layout.line_height;
        if !(line_height > 0.0 && line_height <= usable_height) {
            return Err(TemplateError::structural(format!(
                "line height {line_height} does not fit usable height {usable_height}"
            )));
        }

        let mut summary = WriteSummary {
            lines: 0,
            pages: 1,
        };
        let mut current_height = 0.0_f32;
        for line in lines {
            if current_height > 0.0 && current_height + line_height > usable_height {
                sink.page_break()?;
                summary.pages += 1;
                current_height = 0.0;
                debug!(
                    "event=page_break module=writer status=ok page={} after_lines={}",
                    summary.pages, summary.lines
                );
            }
            sink.write_line(&line.to_string())?;
            current_height += line_height;
            summary.lines += 1;
        }

        info!(
            "event=document_write module=writer status=ok duration_ms={} lines={} pages={}",
            started_at.elapsed().as_millis(),
            summary.lines,
            summary.pages
        );
        Ok(summary)
    }
}

/// Groups rendered lines into pages of at most `layout.lines_per_page()`.
pub fn paginate(lines: &[TemplateLine], layout: &PageLayout) -> Vec<Vec<String>> {
    let per_page = layout.lines_per_page().max(1);
    lines
        .chunks(per_page)
        .map(|chunk| chunk.iter().map(ToString::to_string).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::DocumentWriter;
    use crate::config::PageLayout;
    use crate::document::PagedTextSink;

    #[test]
    fn rejects_line_taller_than_sink_page() {
        let writer = DocumentWriter::new(PageLayout {
            usable_height: 770.0,
            line_height: 36.0,
        });
        let mut sink = PagedTextSink::new(20.0);
        let err = writer.write(&[], &mut sink).unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn empty_input_is_one_blank_page() {
        let writer = DocumentWriter::new(PageLayout::default());
        let mut sink = PagedTextSink::new(770.0);
        let summary = writer.write(&[], &mut sink).unwrap();
        assert_eq!(summary.lines, 0);
        assert_eq!(summary.pages, 1);
        assert_eq!(sink.page_count(), 1);
    }
}
