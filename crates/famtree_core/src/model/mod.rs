//! Typed family-tree document model.
//!
//! # Responsibility
//! - Define the value types shared by text decomposition, document reading
//!   and document writing.
//! - Keep identity semantics (person equality, coordinate equality) in one
//!   place.
//!
//! # Invariants
//! - Coordinates and dates are immutable values, copied on read.
//! - People compare by identity key, never by generated id.

pub mod attributes;
pub mod coordinate;
pub mod date;
pub mod dynamic;
pub mod family_name;
pub mod person;
pub mod template;

pub use attributes::{AttributeError, ExtendedAttributes};
pub use coordinate::{CoordinateError, HierarchicalCoordinate};
pub use date::{DateParseError, FamilyTreeDate, Month};
pub use dynamic::{DynamicId, FamilyDynamic};
pub use family_name::{FamilyName, FamilyNameError};
pub use person::{render_lifespan, Person, PersonId, PersonKey, EN_DASH, PRESENT};
pub use template::{Template, TemplateLine};
