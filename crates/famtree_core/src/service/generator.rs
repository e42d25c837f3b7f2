//! Narrative text decomposition (text -> model).
//!
//! # Responsibility
//! - Split normalized narrative text into per-generation headers and the
//!   sub-text each header owns.
//! - Emit template lines in pre-order using an explicit stack of queues.
//!
//! # Invariants
//! - Traversal never recurses on the call stack; memory grows with depth and
//!   sibling count only.
//! - Every header of one generation is resolved (in textual order) before
//!   any of its children.
//! - Siblings are emitted only after the full subtree of earlier siblings.

use crate::document::RawTextSource;
use crate::error::{MissingAttribute, MissingAttributeWarning, TemplateError, TemplateResult};
use crate::grammar::{disambiguate, parse_body, Generation, RawHeader};
use crate::model::{FamilyDynamic, FamilyName, HierarchicalCoordinate, Person, Template, TemplateLine};
use crate::service::person_pool::PersonPool;
use crate::service::PassOutput;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::VecDeque;
use std::time::Instant;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// A matched header plus the unparsed text it owns; lives for one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub header: TemplateLine,
    pub sub_content: String,
}

/// Ordered lines of one decomposition plus its diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decomposition {
    pub lines: Vec<TemplateLine>,
    pub warnings: Vec<MissingAttributeWarning>,
}

/// Builds templates for one family from narrative sources.
#[derive(Debug, Clone)]
pub struct TemplateGenerator {
    family_name: FamilyName,
}

impl TemplateGenerator {
    pub fn new(family_name: FamilyName) -> Self {
        Self { family_name }
    }

    pub fn family_name(&self) -> &FamilyName {
        &self.family_name
    }

    /// Reads `source` and decomposes it with a fresh person pool.
    pub fn generate<S: RawTextSource + ?Sized>(&self, source: &S) -> TemplateResult<PassOutput> {
        let started_at = Instant::now();
        info!(
            "event=template_generate module=generator status=start family={}",
            self.family_name
        );
        let text = source.read_text()?;
        let mut pool = PersonPool::new();
        let decomposition = match decompose(&text, &mut pool) {
            Ok(decomposition) => decomposition,
            Err(err) => {
                warn!(
                    "event=template_generate module=generator status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err);
            }
        };
        info!(
            "event=template_generate module=generator status=ok duration_ms={} lines={} people={} warnings={}",
            started_at.elapsed().as_millis(),
            decomposition.lines.len(),
            pool.len(),
            decomposition.warnings.len()
        );
        Ok(PassOutput {
            template: Template::new(self.family_name.clone(), decomposition.lines),
            warnings: decomposition.warnings,
        })
    }
}

/// Collapses every whitespace run to one space and trims the ends.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// Decomposes narrative text into pre-ordered template lines.
pub fn decompose(text: &str, pool: &mut PersonPool) -> TemplateResult<Decomposition> {
    let text = normalize_whitespace(text);
    let mut decomposition = Decomposition::default();
    let mut stack: Vec<VecDeque<Content>> = Vec::new();

    stack.push(generation_contents(
        &text,
        &HierarchicalCoordinate::root(),
        pool,
        &mut decomposition.warnings,
    )?);

    while let Some(mut siblings) = stack.pop() {
        let Some(content) = siblings.pop_front() else {
            continue;
        };
        let first_child = content.header.coordinate.child();
        debug!(
            "event=decompose_emit module=generator status=ok coordinate={} pending_siblings={}",
            content.header.coordinate,
            siblings.len()
        );
        decomposition.lines.push(content.header);
        // Later siblings wait beneath this node's children.
        stack.push(siblings);
        stack.push(generation_contents(
            &content.sub_content,
            &first_child,
            pool,
            &mut decomposition.warnings,
        )?);
    }

    Ok(decomposition)
}

/// Matches the headers of the generation at `start.depth()` inside `text`.
fn generation_contents(
    text: &str,
    start: &HierarchicalCoordinate,
    pool: &mut PersonPool,
    warnings: &mut Vec<MissingAttributeWarning>,
) -> TemplateResult<VecDeque<Content>> {
    let mut contents = VecDeque::new();
    let text = text.trim();
    if text.is_empty() {
        return Ok(contents);
    }
    let Some(generation) = Generation::new(start.depth()) else {
        return Ok(contents);
    };

    if !generation.is_labeled() {
        let raw = parse_body(text).unwrap_or_else(|| RawHeader {
            member_name: text.to_string(),
            member_dates: Vec::new(),
            in_law_name: None,
            in_law_dates: Vec::new(),
        });
        let header = build_header(&raw, start.clone(), pool, text, warnings)?;
        contents.push_back(Content {
            header,
            sub_content: String::new(),
        });
        return Ok(contents);
    }

    let headers = generation.find_headers(text);
    debug!(
        "event=decompose_generation module=generator status=ok depth={} headers={}",
        generation.depth(),
        headers.len()
    );
    let mut coordinate = start.clone();
    for (index, matched) in headers.iter().enumerate() {
        if index > 0 {
            coordinate = coordinate.sibling().ok_or_else(|| {
                TemplateError::structural(format!("too many siblings after {coordinate}"))
            })?;
        }
        let header = build_header(&matched.raw, coordinate.clone(), pool, &matched.text, warnings)?;
        let sub_end = headers
            .get(index + 1)
            .map(|next| next.start)
            .unwrap_or(text.len());
        let sub_content = text[matched.end..sub_end].trim().to_string();
        contents.push_back(Content {
            header,
            sub_content,
        });
    }
    Ok(contents)
}

fn build_header(
    raw: &RawHeader,
    coordinate: HierarchicalCoordinate,
    pool: &mut PersonPool,
    fragment: &str,
    warnings: &mut Vec<MissingAttributeWarning>,
) -> TemplateResult<TemplateLine> {
    let fields = disambiguate(raw, pool, fragment)?;
    let no_dates = fields
        .warnings
        .iter()
        .any(|warning| warning.attribute == MissingAttribute::AllDates);

    let member = pool.resolve(Person::new(
        fields.member_name,
        fields.member_birth_date,
        fields.member_deceased_date,
    ));
    if member.birth_date.is_none() && !no_dates {
        warn!("event=build_header module=generator status=warn detail=member_birth_date_missing coordinate={coordinate}");
        warnings.push(MissingAttributeWarning::new(
            MissingAttribute::BirthDate,
            member.birth_name.as_str(),
        ));
    }

    let in_law = fields.in_law.map(|in_law| {
        pool.resolve(Person::new(
            in_law.birth_name,
            in_law.birth_date,
            in_law.deceased_date,
        ))
    });
    if let Some(in_law) = in_law.as_ref().filter(|p| p.birth_date.is_none()) {
        warn!("event=build_header module=generator status=warn detail=in_law_birth_date_missing coordinate={coordinate}");
        warnings.push(MissingAttributeWarning::new(
            MissingAttribute::BirthDate,
            in_law.birth_name.as_str(),
        ));
    }

    warnings.extend(fields.warnings);
    let dynamic = FamilyDynamic::for_union(&member, in_law.as_ref(), fields.dynamic_start_date);
    Ok(TemplateLine::new(coordinate, member, in_law, dynamic))
}

/// Renders lines back into narrative header form, one header per line.
///
/// Dates are written in slot order (birth, dynamic start, deceased) with
/// unknown slots omitted, so only fully dated records reparse identically.
pub fn narrate(lines: &[TemplateLine]) -> String {
    lines
        .iter()
        .map(narrate_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn narrate_line(line: &TemplateLine) -> String {
    let mut parts = Vec::new();
    if let Some(generation) = Generation::new(line.depth()).filter(|g| g.is_labeled()) {
        parts.push(generation.label(line.coordinate.position()));
    }
    parts.push(line.member.birth_name.clone());
    for date in [
        line.member.birth_date.as_ref(),
        line.dynamic.start_date.as_ref(),
        line.member.deceased_date.as_ref(),
    ]
    .into_iter()
    .flatten()
    {
        parts.push(date.to_string());
    }
    if let Some(in_law) = &line.in_law {
        parts.push(in_law.birth_name.clone());
        for date in [in_law.birth_date.as_ref(), in_law.deceased_date.as_ref()]
            .into_iter()
            .flatten()
        {
            parts.push(date.to_string());
        }
    }
    parts.join(" ")
}
