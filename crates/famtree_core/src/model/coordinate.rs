//! Hierarchical coordinate addressing for generation trees.
//!
//! # Responsibility
//! - Address a node by its 1-based position at every depth (`[1, 2, 1]`).
//! - Derive child/sibling addresses without mutating the source value.
//!
//! # Invariants
//! - A coordinate is never empty and every label is positive.
//! - Depth equals the number of labels.
//! - Equality and ordering are structural; lexicographic order is pre-order.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Errors produced while constructing or parsing coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    /// No labels were provided.
    Empty,
    /// A label was zero; labels are 1-based.
    ZeroLabel { position: usize },
    /// A label in the string form is not a positive integer.
    InvalidLabel(String),
}

impl Display for CoordinateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "coordinate must contain at least one label"),
            Self::ZeroLabel { position } => {
                write!(f, "coordinate label at position {position} must be positive")
            }
            Self::InvalidLabel(label) => write!(f, "invalid coordinate label: `{label}`"),
        }
    }
}

impl Error for CoordinateError {}

/// Immutable path addressing one node of a generation tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HierarchicalCoordinate(Vec<u32>);

impl HierarchicalCoordinate {
    /// Builds a coordinate from explicit labels.
    pub fn new(labels: Vec<u32>) -> Result<Self, CoordinateError> {
        if labels.is_empty() {
            return Err(CoordinateError::Empty);
        }
        if let Some(position) = labels.iter().position(|label| *label == 0) {
            return Err(CoordinateError::ZeroLabel { position });
        }
        Ok(Self(labels))
    }

    /// First node of the first generation: `[1]`.
    pub fn root() -> Self {
        Self(vec![1])
    }

    /// First child of this node: one extra trailing `1`.
    pub fn child(&self) -> Self {
        let mut labels = Vec::with_capacity(self.0.len() + 1);
        labels.extend_from_slice(&self.0);
        labels.push(1);
        Self(labels)
    }

    /// Next sibling of this node: last label incremented.
    ///
    /// `None` when the last label is already `u32::MAX`.
    pub fn sibling(&self) -> Option<Self> {
        let mut labels = self.0.clone();
        let last = labels.last_mut()?;
        *last = last.checked_add(1)?;
        Some(Self(labels))
    }

    /// Enclosing node, or `None` for a first-generation coordinate.
    pub fn parent(&self) -> Option<Self> {
        if self.0.len() < 2 {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn labels(&self) -> &[u32] {
        &self.0
    }

    /// Position of this node among its siblings.
    pub fn position(&self) -> u32 {
        self.0.last().copied().unwrap_or(1)
    }

    /// Whether `self` lies strictly inside the subtree of `ancestor`.
    pub fn is_descendant_of(&self, ancestor: &Self) -> bool {
        self.0.len() > ancestor.0.len() && self.0.starts_with(&ancestor.0)
    }
}

impl Default for HierarchicalCoordinate {
    fn default() -> Self {
        Self::root()
    }
}

impl Display for HierarchicalCoordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, label) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            write!(f, "{label}")?;
        }
        Ok(())
    }
}

impl FromStr for HierarchicalCoordinate {
    type Err = CoordinateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(CoordinateError::Empty);
        }
        let labels = trimmed
            .split('.')
            .map(|label| {
                label
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| CoordinateError::InvalidLabel(label.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(labels)
    }
}

impl TryFrom<String> for HierarchicalCoordinate {
    type Error = CoordinateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HierarchicalCoordinate> for String {
    fn from(value: HierarchicalCoordinate) -> Self {
        value.to_string()
    }
}
