//! Genealogical date values.
//!
//! # Responsibility
//! - Parse the textual date precisions found in family narratives.
//! - Render dates back in canonical form for document output.
//!
//! # Invariants
//! - A date always has a year; day requires month.
//! - Ordering is year, month, day, range end (unknown components lowest).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const MONTHS: &str = "Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec";

/// Unanchored date token shared with the header grammar.
pub(crate) static DATE_PATTERN: Lazy<String> = Lazy::new(|| {
    format!(
        r"(?:\d{{1,2}}\s(?:{MONTHS})\s\d{{4}}(?:-\d{{4}})?|(?:{MONTHS})\s\d{{4}}(?:-\d{{4}})?|\d{{4}}(?:-\d{{4}})?)"
    )
});

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?:(?:(?P<day>\d{{1,2}})\s)?(?P<month>{MONTHS})\s)?(?P<year>\d{{4}})(?:-(?P<until>\d{{4}}))?$"
    ))
    .expect("valid date regex")
});

/// Date text could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParseError(pub String);

impl Display for DateParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid date: `{}`", self.0)
    }
}

impl Error for DateParseError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    fn from_abbreviation(value: &str) -> Option<Self> {
        let month = match value {
            "Jan" => Self::Jan,
            "Feb" => Self::Feb,
            "Mar" => Self::Mar,
            "Apr" => Self::Apr,
            "May" => Self::May,
            "Jun" => Self::Jun,
            "Jul" => Self::Jul,
            "Aug" => Self::Aug,
            "Sep" => Self::Sep,
            "Oct" => Self::Oct,
            "Nov" => Self::Nov,
            "Dec" => Self::Dec,
            _ => return None,
        };
        Some(month)
    }

    fn abbreviation(self) -> &'static str {
        match self {
            Self::Jan => "Jan",
            Self::Feb => "Feb",
            Self::Mar => "Mar",
            Self::Apr => "Apr",
            Self::May => "May",
            Self::Jun => "Jun",
            Self::Jul => "Jul",
            Self::Aug => "Aug",
            Self::Sep => "Sep",
            Self::Oct => "Oct",
            Self::Nov => "Nov",
            Self::Dec => "Dec",
        }
    }
}

/// A date as written in a family narrative: `8 Oct 1931`, `Oct 1931` or
/// `1931`, each optionally followed by `-YYYY` when only a range is known.
///
/// Field order drives the derived ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FamilyTreeDate {
    year: u16,
    month: Option<Month>,
    day: Option<u8>,
    until_year: Option<u16>,
}

impl FamilyTreeDate {
    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> Option<Month> {
        self.month
    }

    pub fn day(&self) -> Option<u8> {
        self.day
    }

    pub fn until_year(&self) -> Option<u16> {
        self.until_year
    }
}

impl FromStr for FamilyTreeDate {
    type Err = DateParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ");
        let caps = DATE_RE
            .captures(&normalized)
            .ok_or_else(|| DateParseError(value.to_string()))?;

        let invalid = || DateParseError(value.to_string());
        let year = caps["year"].parse::<u16>().map_err(|_| invalid())?;
        let month = match caps.name("month") {
            Some(m) => Some(Month::from_abbreviation(m.as_str()).ok_or_else(invalid)?),
            None => None,
        };
        let day = match caps.name("day") {
            Some(d) => {
                let day = d.as_str().parse::<u8>().map_err(|_| invalid())?;
                if !(1..=31).contains(&day) {
                    return Err(invalid());
                }
                Some(day)
            }
            None => None,
        };
        let until_year = match caps.name("until") {
            Some(u) => {
                let until = u.as_str().parse::<u16>().map_err(|_| invalid())?;
                if until < year {
                    return Err(invalid());
                }
                Some(until)
            }
            None => None,
        };

        Ok(Self {
            year,
            month,
            day,
            until_year,
        })
    }
}

impl Display for FamilyTreeDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(day) = self.day {
            write!(f, "{day} ")?;
        }
        if let Some(month) = self.month {
            write!(f, "{} ", month.abbreviation())?;
        }
        write!(f, "{:04}", self.year)?;
        if let Some(until) = self.until_year {
            write!(f, "-{until:04}")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for FamilyTreeDate {
    type Error = DateParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FamilyTreeDate> for String {
    fn from(value: FamilyTreeDate) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{FamilyTreeDate, Month};

    #[test]
    fn parses_all_precisions() {
        let full: FamilyTreeDate = "8 Oct 1931".parse().unwrap();
        assert_eq!(full.day(), Some(8));
        assert_eq!(full.month(), Some(Month::Oct));
        assert_eq!(full.year(), 1931);

        let month: FamilyTreeDate = "Mar 1991".parse().unwrap();
        assert_eq!(month.day(), None);
        assert_eq!(month.month(), Some(Month::Mar));

        let ranged: FamilyTreeDate = "1900-1910".parse().unwrap();
        assert_eq!(ranged.year(), 1900);
        assert_eq!(ranged.until_year(), Some(1910));
    }

    #[test]
    fn renders_canonical_form() {
        for text in ["8 Oct 1931", "Oct 1931", "1931", "14 Jan 1928-1929"] {
            let date: FamilyTreeDate = text.parse().unwrap();
            assert_eq!(date.to_string(), text);
        }
    }

    #[test]
    fn rejects_malformed_dates() {
        for text in ["", "Present", "8 1931", "32 Jan 1900", "Foo 1900", "1950-1900"] {
            assert!(text.parse::<FamilyTreeDate>().is_err(), "accepted `{text}`");
        }
    }

    #[test]
    fn orders_by_year_then_precision() {
        let year: FamilyTreeDate = "1931".parse().unwrap();
        let month: FamilyTreeDate = "Jan 1931".parse().unwrap();
        let day: FamilyTreeDate = "2 Jan 1931".parse().unwrap();
        let later: FamilyTreeDate = "1 Feb 1931".parse().unwrap();
        assert!(year < month && month < day && day < later);
    }
}
