//! Person domain model.
//!
//! # Responsibility
//! - Hold the identity fields of one individual in a family document.
//! - Define identity equality used by the person pool.
//!
//! # Invariants
//! - `birth_name` is never blank.
//! - Equality/hash use `(birth_name, birth_date, deceased_date)` only; `id`
//!   marks which instance is canonical inside one document pass.
//! - Ordering is birth date, deceased date, then name (unknown dates lowest).

use crate::model::attributes::{AttributeError, ExtendedAttributes};
use crate::model::date::FamilyTreeDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

pub type PersonId = Uuid;

/// Separator used between lifespan endpoints in rendered documents.
pub const EN_DASH: char = '\u{2013}';

/// Placeholder rendered for a living person's deceased date.
pub const PRESENT: &str = "Present";

const CORE_ATTRIBUTES: &[&str] = &["id", "birthName", "birthDate", "deceasedDate"];

/// Identity key of a person within one document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PersonKey {
    pub birth_name: String,
    pub birth_date: Option<FamilyTreeDate>,
    pub deceased_date: Option<FamilyTreeDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub birth_name: String,
    pub birth_date: Option<FamilyTreeDate>,
    pub deceased_date: Option<FamilyTreeDate>,
    #[serde(default, skip_serializing_if = "ExtendedAttributes::is_empty")]
    pub extended: ExtendedAttributes,
}

impl Person {
    /// Creates a person with a generated id.
    pub fn new(
        birth_name: impl Into<String>,
        birth_date: Option<FamilyTreeDate>,
        deceased_date: Option<FamilyTreeDate>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            birth_name: birth_name.into().trim().to_string(),
            birth_date,
            deceased_date,
            extended: ExtendedAttributes::default(),
        }
    }

    pub fn key(&self) -> PersonKey {
        PersonKey {
            birth_name: self.birth_name.clone(),
            birth_date: self.birth_date.clone(),
            deceased_date: self.deceased_date.clone(),
        }
    }

    /// Sets an extended attribute; core field names are rejected.
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

impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.birth_name == other.birth_name
            && self.birth_date == other.birth_date
            && self.deceased_date == other.deceased_date
    }
}

impl Eq for Person {}

impl Hash for Person {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.birth_name.hash(state);
        self.birth_date.hash(state);
        self.deceased_date.hash(state);
    }
}

impl PartialOrd for Person {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Person {
    fn cmp(&self, other: &Self) -> Ordering {
        self.birth_date
            .cmp(&other.birth_date)
            .then_with(|| self.deceased_date.cmp(&other.deceased_date))
            .then_with(|| self.birth_name.cmp(&other.birth_name))
    }
}

impl Display for Person {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}",
            self.birth_name,
            render_lifespan(self.birth_date.as_ref(), self.deceased_date.as_ref())
        )
    }
}

/// Renders `(B – D)`, `(B – Present)`, `( – D)` or `(–)`.
pub fn render_lifespan(
    birth_date: Option<&FamilyTreeDate>,
    deceased_date: Option<&FamilyTreeDate>,
) -> String {
    match (birth_date, deceased_date) {
        (None, None) => format!("({EN_DASH})"),
        (Some(birth), None) => format!("({birth} {EN_DASH} {PRESENT})"),
        (Some(birth), Some(deceased)) => format!("({birth} {EN_DASH} {deceased})"),
        (None, Some(deceased)) => format!("( {EN_DASH} {deceased})"),
    }
}

#[cfg(test)]
mod tests {
    use super::Person;
    use crate::model::attributes::AttributeError;
    use serde_json::json;

    fn date(text: &str) -> Option<crate::model::FamilyTreeDate> {
        Some(text.parse().unwrap())
    }

    #[test]
    fn display_covers_every_lifespan_shape() {
        assert_eq!(Person::new("Ann", None, None).to_string(), "Ann (\u{2013})");
        assert_eq!(
            Person::new("Ann", date("1900"), None).to_string(),
            "Ann (1900 \u{2013} Present)"
        );
        assert_eq!(
            Person::new("Ann", date("1900"), date("3 Mar 1950")).to_string(),
            "Ann (1900 \u{2013} 3 Mar 1950)"
        );
        assert_eq!(
            Person::new("Ann", None, date("1950")).to_string(),
            "Ann ( \u{2013} 1950)"
        );
    }

    #[test]
    fn equality_ignores_id_and_extended_attributes() {
        let mut a = Person::new("Ann", date("1900"), None);
        let b = Person::new("Ann", date("1900"), None);
        a.set_attribute("nickname", json!("Annie")).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a, b);
        assert_ne!(a, Person::new("Ann", date("1901"), None));
    }

    #[test]
    fn ordering_puts_unknown_birth_dates_first() {
        let unknown = Person::new("Zed", None, None);
        let early = Person::new("Bob", date("1850"), None);
        let late = Person::new("Amy", date("1900"), None);
        let mut people = vec![late.clone(), early.clone(), unknown.clone()];
        people.sort();
        assert_eq!(people, vec![unknown, early, late]);
    }

    #[test]
    fn core_attributes_are_not_extended() {
        let mut person = Person::new("Ann", None, None);
        assert_eq!(
            person.set_attribute("deceased_date", json!("1950")),
            Err(AttributeError::Reserved("deceased_date".to_string()))
        );
    }
}
