//! Inherited family name identity (`Smith-1754729228`).

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FamilyNameError {
    /// Identity text has no `-<id>` suffix.
    MissingId(String),
    /// Name part is blank.
    EmptyName(String),
    /// Id part is not a non-negative integer.
    InvalidId(String),
    /// Container path has too few segments to carry an identity.
    InvalidContainerPath(String),
}

impl Display for FamilyNameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingId(value) => write!(f, "family name `{value}` has no numeric id"),
            Self::EmptyName(value) => write!(f, "family name `{value}` has an empty name"),
            Self::InvalidId(value) => write!(f, "family name `{value}` has an invalid id"),
            Self::InvalidContainerPath(value) => {
                write!(f, "container path `{value}` does not name a family")
            }
        }
    }
}

impl Error for FamilyNameError {}

/// Family identity: display name plus numeric disambiguator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FamilyName {
    name: String,
    id: u32,
}

impl FamilyName {
    pub fn new(name: impl Into<String>, id: u32) -> Result<Self, FamilyNameError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(FamilyNameError::EmptyName(format!("{name}-{id}")));
        }
        Ok(Self { name, id })
    }

    /// Creates an identity for `name` with a fresh random id.
    pub fn generate(name: impl Into<String>) -> Result<Self, FamilyNameError> {
        let id = (Uuid::new_v4().as_u128() as u32) & (i32::MAX as u32);
        Self::new(name, id)
    }

    /// Parses the identity from a container path such as
    /// `templates/Smith-1754729228/20250419-154400.pdf`; the second-to-last
    /// segment carries it.
    pub fn from_container_path(path: &str) -> Result<Self, FamilyNameError> {
        let segments = path
            .trim_end_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>();
        if segments.len() < 2 {
            return Err(FamilyNameError::InvalidContainerPath(path.to_string()));
        }
        segments[segments.len() - 2].parse()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

impl FromStr for FamilyName {
    type Err = FamilyNameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let (name, id) = trimmed
            .rsplit_once('-')
            .ok_or_else(|| FamilyNameError::MissingId(trimmed.to_string()))?;
        if name.trim().is_empty() {
            return Err(FamilyNameError::EmptyName(trimmed.to_string()));
        }
        let id = id
            .parse::<u32>()
            .map_err(|_| FamilyNameError::InvalidId(trimmed.to_string()))?;
        Self::new(name, id)
    }
}

impl Display for FamilyName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.name, self.id)
    }
}

impl TryFrom<String> for FamilyName {
    type Error = FamilyNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FamilyName> for String {
    fn from(value: FamilyName) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{FamilyName, FamilyNameError};

    #[test]
    fn parses_name_and_id() {
        let family: FamilyName = "Pfingsten-1754729228".parse().unwrap();
        assert_eq!(family.name(), "Pfingsten");
        assert_eq!(family.id(), 1_754_729_228);
        assert_eq!(family.to_string(), "Pfingsten-1754729228");
    }

    #[test]
    fn hyphenated_names_split_on_last_dash() {
        let family: FamilyName = "Smith-Jones-42".parse().unwrap();
        assert_eq!(family.name(), "Smith-Jones");
        assert_eq!(family.id(), 42);
    }

    #[test]
    fn container_path_uses_second_to_last_segment() {
        let family = FamilyName::from_container_path(
            "https://storage.example.net/templates/Pfingsten-1754729228/20250419-154400.pdf",
        )
        .unwrap();
        assert_eq!(family.to_string(), "Pfingsten-1754729228");
        assert!(matches!(
            FamilyName::from_container_path("file.pdf"),
            Err(FamilyNameError::InvalidContainerPath(_))
        ));
    }

    #[test]
    fn rejects_missing_or_bad_id() {
        assert!(matches!(
            "Smith".parse::<FamilyName>(),
            Err(FamilyNameError::MissingId(_))
        ));
        assert!(matches!(
            "Smith-abc".parse::<FamilyName>(),
            Err(FamilyNameError::InvalidId(_))
        ));
    }

    #[test]
    fn generated_ids_fit_signed_range() {
        let family = FamilyName::generate("Doe").unwrap();
        assert!(family.id() <= i32::MAX as u32);
    }
}
