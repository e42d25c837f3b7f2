//! Per-document person deduplication.
//!
//! # Responsibility
//! - Keep at most one canonical `Person` per identity key within one pass.
//! - Answer name lookups in textual (insertion) order.
//!
//! # Invariants
//! - One pool per document pass; pools are never shared across documents.
//! - `resolve` never replaces an existing canonical instance.

use crate::model::person::{Person, PersonKey};
use log::debug;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct PersonPool {
    people: Vec<Person>,
    index: HashMap<PersonKey, usize>,
}

impl PersonPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the canonical instance equal to `candidate`, inserting the
    /// candidate when none exists yet.
    pub fn resolve(&mut self, candidate: Person) -> Person {
        let key = candidate.key();
        if let Some(position) = self.index.get(&key) {
            debug!("event=person_resolve module=pool status=ok outcome=existing");
            return self.people[*position].clone();
        }
        debug!("event=person_resolve module=pool status=ok outcome=inserted");
        self.index.insert(key, self.people.len());
        self.people.push(candidate.clone());
        candidate
    }

    /// First person with `birth_name`, in the order people were resolved.
    pub fn find_by_name(&self, birth_name: &str) -> Option<&Person> {
        self.people
            .iter()
            .find(|person| person.birth_name == birth_name)
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::PersonPool;
    use crate::model::Person;

    #[test]
    fn find_by_name_prefers_first_resolved() {
        let mut pool = PersonPool::new();
        let first = pool.resolve(Person::new("Ann", Some("1900".parse().unwrap()), None));
        pool.resolve(Person::new("Ann", Some("1950".parse().unwrap()), None));
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.find_by_name("Ann").map(|p| p.id), Some(first.id));
        assert!(pool.find_by_name("Bob").is_none());
    }
}
