//! Line-level and document-level template records.
//!
//! # Responsibility
//! - Define the unit shared by text decomposition and document reading.
//! - Render the bracketed record form that the document reader segments.
//!
//! # Invariants
//! - Rendered lines start with `[<coordinate>]`.
//! - The `: <start date>` suffix is rendered only when a start date is known.

use crate::model::coordinate::HierarchicalCoordinate;
use crate::model::dynamic::FamilyDynamic;
use crate::model::family_name::FamilyName;
use crate::model::person::Person;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateLine {
    pub coordinate: HierarchicalCoordinate,
    pub member: Person,
    pub in_law: Option<Person>,
    pub dynamic: FamilyDynamic,
}

impl TemplateLine {
    pub fn new(
        coordinate: HierarchicalCoordinate,
        member: Person,
        in_law: Option<Person>,
        dynamic: FamilyDynamic,
    ) -> Self {
        Self {
            coordinate,
            member,
            in_law,
            dynamic,
        }
    }

    pub fn depth(&self) -> usize {
        self.coordinate.depth()
    }
}

impl Display for TemplateLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.coordinate, self.member)?;
        if let Some(in_law) = &self.in_law {
            write!(f, " & {in_law}")?;
        }
        if self.dynamic.start_date.is_some() {
            write!(f, ": {}", self.dynamic)?;
        }
        Ok(())
    }
}

/// Whole-document result: family identity plus lines in pre-order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub family_name: FamilyName,
    pub lines: Vec<TemplateLine>,
}

impl Template {
    pub fn new(family_name: FamilyName, lines: Vec<TemplateLine>) -> Self {
        Self { family_name, lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Display for Template {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Inherited Family Name: {}", self.family_name)?;
        for line in &self.lines {
            write!(f, "\n{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::TemplateLine;
    use crate::model::{FamilyDynamic, HierarchicalCoordinate, Person};

    #[test]
    fn renders_bracketed_record_with_optional_parts() {
        let member = Person::new("John Smith", Some("1900".parse().unwrap()), None);
        let in_law = Person::new("Jane Doe", None, Some("1970".parse().unwrap()));
        let coordinate: HierarchicalCoordinate = "1.2".parse().unwrap();

        let dynamic = FamilyDynamic::for_union(&member, None, None);
        let single = TemplateLine::new(coordinate.clone(), member.clone(), None, dynamic);
        assert_eq!(single.to_string(), "[1.2] John Smith (1900 \u{2013} Present)");

        let dynamic =
            FamilyDynamic::for_union(&member, Some(&in_law), Some("12 Jun 1925".parse().unwrap()));
        let couple = TemplateLine::new(coordinate, member, Some(in_law), dynamic);
        assert_eq!(
            couple.to_string(),
            "[1.2] John Smith (1900 \u{2013} Present) & Jane Doe ( \u{2013} 1970): 12 Jun 1925"
        );
    }
}
