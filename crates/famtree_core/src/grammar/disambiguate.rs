//! Field disambiguation for headers with fewer than the maximum dates.
//!
//! # Responsibility
//! - Decide which semantic slot (member birth/death, dynamic start, in-law
//!   birth/death) each captured date belongs to.
//!
//! # Invariants
//! - 3 member dates are positional: birth, dynamic start, deceased.
//! - Pool lookups use the first person of the same name in textual order;
//!   callers must disambiguate headers in textual order.
//! - More than 3 member dates or 2 in-law dates is a data-format error.

use crate::error::{MissingAttribute, MissingAttributeWarning, TemplateError, TemplateResult};
use crate::grammar::patterns::RawHeader;
use crate::model::date::FamilyTreeDate;
use crate::service::person_pool::PersonPool;
use log::{debug, warn};

/// Resolved in-law fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InLawFields {
    pub birth_name: String,
    pub birth_date: Option<FamilyTreeDate>,
    pub deceased_date: Option<FamilyTreeDate>,
}

/// Header fields after every date has been assigned a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderFields {
    pub member_name: String,
    pub member_birth_date: Option<FamilyTreeDate>,
    pub member_deceased_date: Option<FamilyTreeDate>,
    pub dynamic_start_date: Option<FamilyTreeDate>,
    pub in_law: Option<InLawFields>,
    pub warnings: Vec<MissingAttributeWarning>,
}

/// Assigns the captured dates of `raw` to semantic slots.
///
/// `fragment` is attached to errors for diagnosis.
pub fn disambiguate(
    raw: &RawHeader,
    pool: &PersonPool,
    fragment: &str,
) -> TemplateResult<HeaderFields> {
    let member_name = raw.member_name.trim().to_string();
    if member_name.is_empty() {
        return Err(TemplateError::data_format(
            "member birth name is missing",
            fragment,
        ));
    }

    let in_law_name = raw
        .in_law_name
        .as_deref()
        .map(str::trim)
        .filter(|name| is_plausible_name(name));
    if raw.in_law_name.is_some() && in_law_name.is_none() {
        debug!("event=disambiguate module=grammar status=ok detail=in_law_discarded_as_noise");
    }
    let has_in_law = in_law_name.is_some();

    let dates = parse_dates(&raw.member_dates, fragment)?;
    let prior = pool.find_by_name(&member_name);
    let mut fields = HeaderFields {
        member_name,
        member_birth_date: None,
        member_deceased_date: None,
        dynamic_start_date: None,
        in_law: None,
        warnings: Vec::new(),
    };
    let mut keep_in_law = has_in_law;

    match dates.as_slice() {
        [] => {
            warn!("event=disambiguate module=grammar status=warn detail=no_dates");
            fields.warnings.push(MissingAttributeWarning::new(
                MissingAttribute::AllDates,
                fields.member_name.as_str(),
            ));
        }
        [only] => {
            let known_birth = prior.is_some_and(|p| p.birth_date.as_ref() == Some(only));
            let known_deceased = prior.is_some_and(|p| p.deceased_date.as_ref() == Some(only));
            if has_in_law && known_birth {
                fields.member_birth_date = Some(only.clone());
                fields.warnings.push(missing_dynamic_start(&fields.member_name));
            } else if has_in_law && known_deceased {
                fields.member_deceased_date = Some(only.clone());
                fields.warnings.push(missing_dynamic_start(&fields.member_name));
            } else if has_in_law {
                debug!("event=disambiguate module=grammar status=ok detail=single_date_is_dynamic_start");
                fields.dynamic_start_date = Some(only.clone());
            } else if known_birth {
                fields.member_birth_date = Some(only.clone());
            } else {
                debug!("event=disambiguate module=grammar status=ok detail=single_date_is_deceased");
                fields.member_deceased_date = Some(only.clone());
            }
        }
        [first, second] => {
            fields.member_birth_date = Some(first.clone());
            let known_deceased =
                prior.is_some_and(|p| p.deceased_date.as_ref() == Some(second));
            if !has_in_law {
                debug!("event=disambiguate module=grammar status=ok detail=second_date_is_deceased");
                fields.member_deceased_date = Some(second.clone());
            } else if known_deceased {
                // Second date closes the member's life; the union is not recorded.
                debug!("event=disambiguate module=grammar status=ok detail=in_law_dropped_with_deceased_date");
                fields.member_deceased_date = Some(second.clone());
                fields.warnings.push(missing_dynamic_start(&fields.member_name));
                keep_in_law = false;
            } else {
                fields.dynamic_start_date = Some(second.clone());
            }
        }
        [birth, start, deceased] => {
            fields.member_birth_date = Some(birth.clone());
            fields.dynamic_start_date = Some(start.clone());
            fields.member_deceased_date = Some(deceased.clone());
        }
        _ => {
            return Err(TemplateError::data_format(
                format!("invalid date arrangement: {} member dates", dates.len()),
                fragment,
            ));
        }
    }

    if let Some(name) = in_law_name.filter(|_| keep_in_law) {
        let in_law_dates = parse_dates(&raw.in_law_dates, fragment)?;
        let (birth_date, deceased_date) = match in_law_dates.as_slice() {
            [] => (None, None),
            [birth] => (Some(birth.clone()), None),
            [birth, deceased] => (Some(birth.clone()), Some(deceased.clone())),
            _ => {
                return Err(TemplateError::data_format(
                    format!("invalid date arrangement: {} in-law dates", in_law_dates.len()),
                    fragment,
                ));
            }
        };
        fields.in_law = Some(InLawFields {
            birth_name: name.to_string(),
            birth_date,
            deceased_date,
        });
    }

    Ok(fields)
}

fn missing_dynamic_start(member_name: &str) -> MissingAttributeWarning {
    warn!("event=disambiguate module=grammar status=warn detail=missing_dynamic_start_date");
    MissingAttributeWarning::new(MissingAttribute::DynamicStartDate, member_name)
}

/// A real name mixes upper and lower case; all-caps tokens are noise.
fn is_plausible_name(name: &str) -> bool {
    name.chars().any(|c| c.is_ascii_uppercase()) && name.chars().any(|c| c.is_ascii_lowercase())
}

fn parse_dates(values: &[String], fragment: &str) -> TemplateResult<Vec<FamilyTreeDate>> {
    values
        .iter()
        .map(|value| {
            value
                .parse::<FamilyTreeDate>()
                .map_err(|err| TemplateError::data_format(err.to_string(), fragment))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::disambiguate;
    use crate::error::MissingAttribute;
    use crate::grammar::patterns::RawHeader;
    use crate::model::Person;
    use crate::service::person_pool::PersonPool;

    fn raw(member_dates: &[&str], in_law: Option<&str>) -> RawHeader {
        RawHeader {
            member_name: "John Smith".to_string(),
            member_dates: member_dates.iter().map(|d| d.to_string()).collect(),
            in_law_name: in_law.map(str::to_string),
            in_law_dates: Vec::new(),
        }
    }

    #[test]
    fn all_caps_in_law_is_noise() {
        let pool = PersonPool::new();
        let fields = disambiguate(&raw(&["1900", "1950"], Some("JR")), &pool, "x").unwrap();
        assert!(fields.in_law.is_none());
        assert_eq!(fields.member_deceased_date, Some("1950".parse().unwrap()));
    }

    #[test]
    fn single_date_matching_known_birth_with_in_law_warns() {
        let mut pool = PersonPool::new();
        pool.resolve(Person::new("John Smith", Some("1900".parse().unwrap()), None));
        let fields = disambiguate(&raw(&["1900"], Some("Mary Jones")), &pool, "x").unwrap();
        assert_eq!(fields.member_birth_date, Some("1900".parse().unwrap()));
        assert_eq!(fields.dynamic_start_date, None);
        assert_eq!(fields.warnings.len(), 1);
        assert_eq!(fields.warnings[0].attribute, MissingAttribute::DynamicStartDate);
    }

    fn pool_with_john(birth: &str, deceased: Option<&str>) -> PersonPool {
        let mut pool = PersonPool::new();
        pool.resolve(Person::new(
            "John Smith",
            Some(birth.parse().unwrap()),
            deceased.map(|d| d.parse().unwrap()),
        ));
        pool
    }

    #[test]
    fn single_date_without_in_law_is_deceased() {
        let pool = PersonPool::new();
        let fields = disambiguate(&raw(&["1950"], None), &pool, "x").unwrap();
        assert_eq!(fields.member_birth_date, None);
        assert_eq!(fields.member_deceased_date, Some("1950".parse().unwrap()));
        assert_eq!(fields.dynamic_start_date, None);
        assert!(fields.warnings.is_empty());
    }

    #[test]
    fn single_date_matching_known_birth_without_in_law_is_birth() {
        let pool = pool_with_john("1900", None);
        let fields = disambiguate(&raw(&["1900"], None), &pool, "x").unwrap();
        assert_eq!(fields.member_birth_date, Some("1900".parse().unwrap()));
        assert_eq!(fields.member_deceased_date, None);
        assert!(fields.warnings.is_empty());
    }

    #[test]
    fn single_date_matching_known_deceased_with_in_law_warns() {
        let pool = pool_with_john("1900", Some("1950"));
        let fields = disambiguate(&raw(&["1950"], Some("Mary Jones")), &pool, "x").unwrap();
        assert_eq!(fields.member_birth_date, None);
        assert_eq!(fields.member_deceased_date, Some("1950".parse().unwrap()));
        assert_eq!(fields.dynamic_start_date, None);
        assert!(fields.in_law.is_some());
        assert_eq!(fields.warnings.len(), 1);
        assert_eq!(fields.warnings[0].attribute, MissingAttribute::DynamicStartDate);
    }

    #[test]
    fn two_dates_ending_at_known_deceased_drop_the_in_law() {
        let pool = pool_with_john("1900", Some("1950"));
        let mut header = raw(&["1900", "1950"], Some("Mary Jones"));
        header.in_law_dates = vec!["1902".into()];
        let fields = disambiguate(&header, &pool, "x").unwrap();
        assert_eq!(fields.member_birth_date, Some("1900".parse().unwrap()));
        assert_eq!(fields.member_deceased_date, Some("1950".parse().unwrap()));
        assert_eq!(fields.dynamic_start_date, None);
        assert!(fields.in_law.is_none());
        assert_eq!(fields.warnings.len(), 1);
        assert_eq!(fields.warnings[0].attribute, MissingAttribute::DynamicStartDate);
    }

    #[test]
    fn two_dates_with_unknown_second_date_keep_the_in_law() {
        let pool = pool_with_john("1900", Some("1950"));
        let fields = disambiguate(&raw(&["1900", "1925"], Some("Mary Jones")), &pool, "x").unwrap();
        assert_eq!(fields.dynamic_start_date, Some("1925".parse().unwrap()));
        assert_eq!(fields.member_deceased_date, None);
        assert_eq!(fields.in_law.map(|in_law| in_law.birth_name), Some("Mary Jones".to_string()));
        assert!(fields.warnings.is_empty());
    }

    #[test]
    fn too_many_in_law_dates_is_invalid() {
        let pool = PersonPool::new();
        let mut header = raw(&["1900"], Some("Mary Jones"));
        header.in_law_dates = vec!["1901".into(), "1950".into(), "1960".into()];
        let err = disambiguate(&header, &pool, "frag").unwrap_err();
        assert!(err.is_data_format());
        assert_eq!(err.fragment(), Some("frag"));
    }
}
