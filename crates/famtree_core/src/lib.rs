//! Core engine for family-tree narrative documents.
//! Decomposes narrative text into a coordinate-addressed model, writes it as
//! paginated records and reads those records back.

pub mod config;
pub mod document;
pub mod error;
pub mod grammar;
pub mod logging;
pub mod model;
pub mod service;

pub use config::{ConfigError, PageLayout, TemplateConfig};
pub use document::{
    DocumentSink, PagedText, PagedTextSink, PaginatedSource, RawTextSource, SourceError,
    SourceResult, TextFile,
};
pub use error::{MissingAttribute, MissingAttributeWarning, TemplateError, TemplateResult};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::{
    FamilyDynamic, FamilyName, FamilyTreeDate, HierarchicalCoordinate, Person, Template,
    TemplateLine,
};
pub use service::{
    DocumentWriter, FamilyTree, PassOutput, PersonPool, TemplateGenerator, TemplateReader,
    WriteSummary,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
