//! Header grammar and date-slot disambiguation.
//!
//! # Responsibility
//! - Recognize per-generation headers in narrative text.
//! - Assign captured dates to semantic slots.
//!
//! # See also
//! - `service::generator` for the traversal that drives both.

pub mod disambiguate;
pub mod patterns;

pub use disambiguate::{disambiguate, HeaderFields, InLawFields};
pub use patterns::{parse_body, Generation, HeaderMatch, RawHeader, MAX_LABELED_DEPTH};
