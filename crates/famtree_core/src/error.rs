//! Engine error taxonomy and non-fatal diagnostics.
//!
//! # Responsibility
//! - Classify failures of a decomposition/reading pass.
//! - Carry the raw fragment that caused a data-format failure.
//!
//! # Invariants
//! - Errors abort the current pass; no partial template is returned.
//! - Warnings never abort a pass.

use crate::document::SourceError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TemplateResult<T> = Result<T, TemplateError>;

#[derive(Debug)]
pub enum TemplateError {
    /// Input cannot be mapped to the model.
    DataFormat { reason: String, fragment: String },
    /// Input parsed, but the derived tree breaks a structural assumption.
    StructuralAssumption { reason: String },
    /// A document collaborator failed.
    Source(SourceError),
}

impl TemplateError {
    pub fn data_format(reason: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self::DataFormat {
            reason: reason.into(),
            fragment: fragment.into(),
        }
    }

    pub fn structural(reason: impl Into<String>) -> Self {
        Self::StructuralAssumption {
            reason: reason.into(),
        }
    }

    /// Raw input fragment attached to a data-format failure.
    pub fn fragment(&self) -> Option<&str> {
        match self {
            Self::DataFormat { fragment, .. } => Some(fragment.as_str()),
            _ => None,
        }
    }

    pub fn is_data_format(&self) -> bool {
        matches!(self, Self::DataFormat { .. })
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, Self::StructuralAssumption { .. })
    }
}

impl Display for TemplateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataFormat { reason, fragment } => {
                write!(f, "data format error: {reason} (in `{fragment}`)")
            }
            Self::StructuralAssumption { reason } => {
                write!(f, "structural assumption violated: {reason}")
            }
            Self::Source(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TemplateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Source(err) => Some(err),
            Self::DataFormat { .. } => None,
            Self::StructuralAssumption { .. } => None,
        }
    }
}

impl From<SourceError> for TemplateError {
    fn from(value: SourceError) -> Self {
        Self::Source(value)
    }
}

/// Which recognized-but-absent value a warning is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingAttribute {
    /// Header carried no dates at all.
    AllDates,
    BirthDate,
    DynamicStartDate,
}

impl Display for MissingAttribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AllDates => write!(f, "dates"),
            Self::BirthDate => write!(f, "birth_date"),
            Self::DynamicStartDate => write!(f, "dynamic_start_date"),
        }
    }
}

/// Non-fatal diagnostic: a field was left unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingAttributeWarning {
    pub attribute: MissingAttribute,
    /// Birth name of the person the record is about.
    pub subject: String,
}

impl MissingAttributeWarning {
    pub fn new(attribute: MissingAttribute, subject: impl Into<String>) -> Self {
        Self {
            attribute,
            subject: subject.into(),
        }
    }
}

impl Display for MissingAttributeWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "missing {} for `{}`", self.attribute, self.subject)
    }
}
