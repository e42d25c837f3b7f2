//! Extended attribute bags for forward-compatible fields.
//!
//! Core fields live on the owning struct; anything else a document carries is
//! kept here. Writes that name a core field are rejected.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeError {
    /// Attribute name is blank after trim.
    EmptyName,
    /// Attribute name collides with a core field of the owner.
    Reserved(String),
}

impl Display for AttributeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "attribute name must not be blank"),
            Self::Reserved(name) => write!(
                f,
                "`{name}` is a required attribute, not an extended attribute"
            ),
        }
    }
}

impl Error for AttributeError {}

/// String-keyed side map of extended values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtendedAttributes(BTreeMap<String, Value>);

impl ExtendedAttributes {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name.trim())
    }

    /// Inserts `value` unless `name` matches one of `reserved`.
    ///
    /// Matching ignores ASCII case and underscores, so `birth_name` and
    /// `BirthName` both collide with `birthName`.
    pub fn set(
        &mut self,
        reserved: &[&str],
        name: &str,
        value: Value,
    ) -> Result<Option<Value>, AttributeError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AttributeError::EmptyName);
        }
        let folded = fold_name(name);
        if reserved.iter().any(|core| fold_name(core) == folded) {
            return Err(AttributeError::Reserved(name.to_string()));
        }
        Ok(self.0.insert(name.to_string(), value))
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name.trim())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }
}

fn fold_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{AttributeError, ExtendedAttributes};
    use serde_json::json;

    const RESERVED: &[&str] = &["id", "birthName"];

    #[test]
    fn set_rejects_core_names_in_any_spelling() {
        let mut attributes = ExtendedAttributes::default();
        for name in ["id", "ID", "birthName", "birth_name", "BIRTHNAME"] {
            let err = attributes.set(RESERVED, name, json!("x")).unwrap_err();
            assert_eq!(err, AttributeError::Reserved(name.to_string()));
        }
        assert!(attributes.is_empty());
    }

    #[test]
    fn set_returns_previous_value() {
        let mut attributes = ExtendedAttributes::default();
        assert_eq!(attributes.set(RESERVED, "nickname", json!("Bud")), Ok(None));
        assert_eq!(
            attributes.set(RESERVED, "nickname", json!("Buddy")),
            Ok(Some(json!("Bud")))
        );
        assert_eq!(attributes.get("nickname"), Some(&json!("Buddy")));
    }
}
