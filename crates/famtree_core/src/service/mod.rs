//! Document pass services.
//!
//! # Responsibility
//! - Run the text and document passes over collaborator traits.
//! - Keep one person pool per pass; nothing is shared between passes.

use crate::error::MissingAttributeWarning;
use crate::model::Template;

pub mod family_tree;
pub mod generator;
pub mod person_pool;
pub mod reader;
pub mod writer;

pub use family_tree::{FamilyTree, FamilyTreeNode, NodeId, MAX_PARENT_NODES};
pub use generator::{decompose, narrate, normalize_whitespace, Content, Decomposition, TemplateGenerator};
pub use person_pool::PersonPool;
pub use reader::{normalize_page, parse_record, read_page, segment_page, TemplateReader};
pub use writer::{paginate, DocumentWriter, WriteSummary};

/// Result of one full pass: the model plus non-fatal diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassOutput {
    pub template: Template,
    pub warnings: Vec<MissingAttributeWarning>,
}
