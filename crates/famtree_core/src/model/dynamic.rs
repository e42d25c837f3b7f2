//! Family dynamic (union) model.
//!
//! A dynamic describes the couple or sub-family headed by one member: when it
//! started and the page title used when it is rendered on its own.

use crate::model::attributes::{AttributeError, ExtendedAttributes};
use crate::model::date::FamilyTreeDate;
use crate::model::person::Person;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type DynamicId = Uuid;

const CORE_ATTRIBUTES: &[&str] = &["id", "familyDynamicStartDate", "pageTitle"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyDynamic {
    pub id: DynamicId,
    /// Union start date; legitimately unknown for many records.
    pub start_date: Option<FamilyTreeDate>,
    pub page_title: String,
    #[serde(default, skip_serializing_if = "ExtendedAttributes::is_empty")]
    pub extended: ExtendedAttributes,
}

impl FamilyDynamic {
    /// Builds the dynamic headed by `member`, titled after both partners.
    pub fn for_union(
        member: &Person,
        in_law: Option<&Person>,
        start_date: Option<FamilyTreeDate>,
    ) -> Self {
        let page_title = match in_law {
            Some(in_law) => format!(
                "This is the family of {} and {}.",
                member.birth_name, in_law.birth_name
            ),
            None => format!("This is the family of {}.", member.birth_name),
        };
        Self {
            id: Uuid::new_v4(),
            start_date,
            page_title,
            extended: ExtendedAttributes::default(),
        }
    }

    pub fn set_attribute(
        &mut self,
        name: &str,
        value: Value,
    ) -> Result<Option<Value>, AttributeError> {
        self.extended.set(CORE_ATTRIBUTES, name, value)
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.extended.get(name)
    }
}

impl PartialEq for FamilyDynamic {
    fn eq(&self, other: &Self) -> bool {
        self.start_date == other.start_date && self.page_title == other.page_title
    }
}

impl Eq for FamilyDynamic {}

impl PartialOrd for FamilyDynamic {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FamilyDynamic {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start_date
            .cmp(&other.start_date)
            .then_with(|| self.page_title.cmp(&other.page_title))
    }
}

impl Display for FamilyDynamic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.start_date {
            Some(start_date) => write!(f, "{start_date}"),
            None => Ok(()),
        }
    }
}
