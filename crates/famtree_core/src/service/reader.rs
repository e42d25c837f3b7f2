//! Paginated document reading (document -> model).
//!
//! # Responsibility
//! - Normalize extracted page text and split it into bracketed records.
//! - Parse each record positionally and rebuild template lines.
//!
//! # Invariants
//! - Records run from one `[` to the next `[` or to the end of the page.
//! - Every person passes through the pass-local pool before it is attached.
//! - Any malformed record aborts the whole pass.

use crate::document::PaginatedSource;
use crate::error::{MissingAttribute, MissingAttributeWarning, TemplateError, TemplateResult};
use crate::model::date::DATE_PATTERN;
use crate::model::person::{EN_DASH, PRESENT};
use crate::model::{FamilyDynamic, FamilyName, FamilyTreeDate, HierarchicalCoordinate, Person, Template, TemplateLine};
use crate::service::generator::normalize_whitespace;
use crate::service::person_pool::PersonPool;
use crate::service::PassOutput;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::time::Instant;

const RECORD_START: char = '[';
const DELIMITERS: [char; 7] = ['[', ']', '(', ')', EN_DASH, '&', ':'];
/// Delimiter expected to open each positional segment.
const EXPECTED_DELIMITERS: [char; 10] = ['[', ']', '(', EN_DASH, ')', '&', '(', EN_DASH, ')', ':'];

const COORDINATE: usize = 0;
const MEMBER_NAME: usize = 1;
const MEMBER_BIRTH: usize = 2;
const MEMBER_DECEASED: usize = 3;
const MEMBER_CLOSE: usize = 4;
const IN_LAW_NAME: usize = 5;
const IN_LAW_BIRTH: usize = 6;
const IN_LAW_DECEASED: usize = 7;
const IN_LAW_CLOSE: usize = 8;
const DYNAMIC_START: usize = 9;

static LIFESPAN_RE: Lazy<Regex> = Lazy::new(|| {
    let date = DATE_PATTERN.as_str();
    Regex::new(&format!(
        r"\(\s*(?P<birth>{date})?\s*[-\u{{2013}}\u{{2014}}]\s*(?P<deceased>{PRESENT}|{date})?\s*\)"
    ))
    .expect("valid lifespan regex")
});

/// One delimiter-opened piece of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
    delimiter: char,
    text: String,
}

/// Rebuilds templates of one family from paginated documents.
#[derive(Debug, Clone)]
pub struct TemplateReader {
    family_name: FamilyName,
}

impl TemplateReader {
    pub fn new(family_name: FamilyName) -> Self {
        Self { family_name }
    }

    pub fn family_name(&self) -> &FamilyName {
        &self.family_name
    }

    /// Reads every page in order with a fresh person pool.
    pub fn read<S: PaginatedSource + ?Sized>(&self, source: &S) -> TemplateResult<PassOutput> {
        let started_at = Instant::now();
        let page_count = source.page_count()?;
        info!(
            "event=template_read module=reader status=start family={} pages={}",
            self.family_name, page_count
        );
        let mut pool = PersonPool::new();
        let mut lines = Vec::new();
        let mut warnings = Vec::new();
        for page in 1..=page_count {
            let text = source.page_text(page)?;
            let page_lines = match read_page(&text, &mut pool, &mut warnings) {
                Ok(page_lines) => page_lines,
                Err(err) => {
                    warn!(
                        "event=template_read module=reader status=error page={} duration_ms={} error={}",
                        page,
                        started_at.elapsed().as_millis(),
                        err
                    );
                    return Err(err);
                }
            };
            debug!(
                "event=page_read module=reader status=ok page={} records={}",
                page,
                page_lines.len()
            );
            lines.extend(page_lines);
        }
        info!(
            "event=template_read module=reader status=ok duration_ms={} lines={} people={} warnings={}",
            started_at.elapsed().as_millis(),
            lines.len(),
            pool.len(),
            warnings.len()
        );
        Ok(PassOutput {
            template: Template::new(self.family_name.clone(), lines),
            warnings,
        })
    }
}

/// Normalizes whitespace and rewrites every lifespan into canonical form.
pub fn normalize_page(text: &str) -> String {
    let text = normalize_whitespace(text);
    LIFESPAN_RE
        .replace_all(&text, |caps: &Captures<'_>| {
            let birth = caps.name("birth").map(|m| m.as_str());
            let deceased = caps
                .name("deceased")
                .map(|m| m.as_str())
                .filter(|value| *value != PRESENT);
            match (birth, deceased) {
                (None, None) => format!("({EN_DASH})"),
                (Some(birth), None) => format!("({birth} {EN_DASH} {PRESENT})"),
                (Some(birth), Some(deceased)) => format!("({birth} {EN_DASH} {deceased})"),
                (None, Some(deceased)) => format!("( {EN_DASH} {deceased})"),
            }
        })
        .into_owned()
}

/// Splits normalized page text into records starting at each `[`.
///
/// Text before the first `[` is page furniture and is dropped.
pub fn segment_page(text: &str) -> Vec<String> {
    let starts = text
        .char_indices()
        .filter(|(_, ch)| *ch == RECORD_START)
        .map(|(index, _)| index)
        .collect::<Vec<_>>();
    starts
        .iter()
        .enumerate()
        .map(|(position, start)| {
            let end = starts.get(position + 1).copied().unwrap_or(text.len());
            text[*start..end].trim().to_string()
        })
        .collect()
}

/// Reads one page of text into template lines.
pub fn read_page(
    text: &str,
    pool: &mut PersonPool,
    warnings: &mut Vec<MissingAttributeWarning>,
) -> TemplateResult<Vec<TemplateLine>> {
    let normalized = normalize_page(text);
    segment_page(&normalized)
        .iter()
        .map(|record| parse_record(record, pool, warnings))
        .collect()
}

/// Parses one bracketed record.
pub fn parse_record(
    record: &str,
    pool: &mut PersonPool,
    warnings: &mut Vec<MissingAttributeWarning>,
) -> TemplateResult<TemplateLine> {
    let segments = split_segments(record);
    validate_delimiters(&segments, record)?;
    let slot = |index: usize| segments.get(index).map(|segment| segment.text.as_str());

    let coordinate = slot(COORDINATE)
        .filter(|text| !text.is_empty())
        .and_then(|text| text.parse::<HierarchicalCoordinate>().ok())
        .ok_or_else(|| TemplateError::data_format("coordinate missing", record))?;

    let member_name = slot(MEMBER_NAME)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| TemplateError::data_format("member name missing", record))?;
    if segments.len() <= MEMBER_CLOSE {
        return Err(TemplateError::data_format("member lifespan incomplete", record));
    }
    let member = pool.resolve(Person::new(
        member_name,
        birth_slot(slot(MEMBER_BIRTH), record)?,
        deceased_slot(slot(MEMBER_DECEASED), record)?,
    ));
    if member.birth_date.is_none() {
        warn!("event=record_parse module=reader status=warn detail=member_birth_date_missing coordinate={coordinate}");
        warnings.push(MissingAttributeWarning::new(
            MissingAttribute::BirthDate,
            member.birth_name.as_str(),
        ));
    }

    let in_law = match slot(IN_LAW_NAME) {
        None => None,
        Some("") => return Err(TemplateError::data_format("in-law name missing", record)),
        Some(name) => {
            if segments.len() <= IN_LAW_CLOSE {
                return Err(TemplateError::data_format("in-law lifespan incomplete", record));
            }
            let in_law = pool.resolve(Person::new(
                name,
                birth_slot(slot(IN_LAW_BIRTH), record)?,
                deceased_slot(slot(IN_LAW_DECEASED), record)?,
            ));
            if in_law.birth_date.is_none() {
                warn!("event=record_parse module=reader status=warn detail=in_law_birth_date_missing coordinate={coordinate}");
                warnings.push(MissingAttributeWarning::new(
                    MissingAttribute::BirthDate,
                    in_law.birth_name.as_str(),
                ));
            }
            Some(in_law)
        }
    };

    let start_date = match slot(DYNAMIC_START) {
        None => None,
        Some("") => {
            return Err(TemplateError::data_format(
                "dynamic start date missing",
                record,
            ))
        }
        Some(text) => Some(parse_date(text, record)?),
    };

    debug!("event=record_parse module=reader status=ok coordinate={coordinate}");
    let dynamic = FamilyDynamic::for_union(&member, in_law.as_ref(), start_date);
    Ok(TemplateLine::new(coordinate, member, in_law, dynamic))
}

fn split_segments(record: &str) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    for ch in record.chars() {
        if DELIMITERS.contains(&ch) {
            segments.push(Segment {
                delimiter: ch,
                text: String::new(),
            });
        } else if let Some(segment) = segments.last_mut() {
            segment.text.push(ch);
        }
    }
    for segment in &mut segments {
        segment.text = segment.text.trim().to_string();
    }
    segments
}

fn validate_delimiters(segments: &[Segment], record: &str) -> TemplateResult<()> {
    if segments.len() > EXPECTED_DELIMITERS.len() {
        return Err(TemplateError::data_format("unexpected trailing segments", record));
    }
    for (index, (segment, expected)) in segments.iter().zip(EXPECTED_DELIMITERS).enumerate() {
        if segment.delimiter == expected {
            continue;
        }
        if index == IN_LAW_NAME && segment.delimiter == ':' {
            return Err(TemplateError::data_format(
                "in-law must exist if a dynamic is defined",
                record,
            ));
        }
        return Err(TemplateError::data_format(
            format!(
                "unexpected delimiter `{}` at segment {index}, expected `{expected}`",
                segment.delimiter
            ),
            record,
        ));
    }
    for index in [MEMBER_CLOSE, IN_LAW_CLOSE] {
        if segments.get(index).is_some_and(|segment| !segment.text.is_empty()) {
            return Err(TemplateError::data_format(
                "unexpected text after lifespan",
                record,
            ));
        }
    }
    Ok(())
}

fn parse_date(text: &str, record: &str) -> TemplateResult<FamilyTreeDate> {
    text.parse::<FamilyTreeDate>()
        .map_err(|err| TemplateError::data_format(err.to_string(), record))
}

fn birth_slot(text: Option<&str>, record: &str) -> TemplateResult<Option<FamilyTreeDate>> {
    match text {
        None | Some("") => Ok(None),
        Some(text) => parse_date(text, record).map(Some),
    }
}

fn deceased_slot(text: Option<&str>, record: &str) -> TemplateResult<Option<FamilyTreeDate>> {
    match text {
        None | Some("") | Some(PRESENT) => Ok(None),
        Some(text) => parse_date(text, record).map(Some),
    }
}
