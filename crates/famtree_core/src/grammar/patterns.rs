//! Per-generation header patterns.
//!
//! # Responsibility
//! - Recognize generation headers (`label name dates [in-law dates]`) in
//!   normalized narrative text.
//! - Reproduce the same label conventions when rendering narrative text.
//!
//! # Invariants
//! - Depth 1..=6 each own one label family, in fixed order.
//! - A header ends exactly where whitespace plus the next label of any depth
//!   begins, or at end of text.
//! - Label punctuation never appears inside a header body, so the nearest
//!   boundary is the only candidate end.

use crate::model::date::DATE_PATTERN;
use once_cell::sync::Lazy;
use regex::Regex;

/// Deepest generation with its own label convention.
pub const MAX_LABELED_DEPTH: usize = 6;

const ROMAN_UPPER: &str = r"[IVXLCDM]+:\s";
const UPPER: &str = r"[A-Z]+\.\s";
const NUMERICAL: &str = r"\d+\.\s";
const LOWER: &str = r"[a-z]+\.\s";
const PARENTHESIZED_NUMERICAL: &str = r"\(\d+\)\s";
const ROMAN_LOWER: &str = r"[ivxlcdm]+\)\s";
const NAME_PATTERN: &str = r"[A-Z][A-Za-z,\-]*(?:\s[A-Z][A-Za-z,\-]*)*";

static LABEL_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        ROMAN_UPPER,
        UPPER,
        NUMERICAL,
        LOWER,
        PARENTHESIZED_NUMERICAL,
        ROMAN_LOWER,
    ]
    .iter()
    .map(|label| Regex::new(label).expect("valid label regex"))
    .collect()
});

static BOUNDARY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\s(?:{LOWER}|{NUMERICAL}|{PARENTHESIZED_NUMERICAL}|{ROMAN_LOWER}|{ROMAN_UPPER}|{UPPER})"
    ))
    .expect("valid boundary regex")
});

// Date runs are unbounded here so over-long runs reach the disambiguator and
// fail loudly instead of silently not matching.
static BODY_RE: Lazy<Regex> = Lazy::new(|| {
    let date = DATE_PATTERN.as_str();
    Regex::new(&format!(
        r"^(?P<member>{NAME_PATTERN})(?P<member_dates>(?:\s{date})*)(?:\s(?P<in_law>{NAME_PATTERN})(?P<in_law_dates>(?:\s{date})*))?$"
    ))
    .expect("valid header body regex")
});

static DATE_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(DATE_PATTERN.as_str()).expect("valid date token regex"));

/// Unresolved captures of one header, in textual order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHeader {
    pub member_name: String,
    pub member_dates: Vec<String>,
    pub in_law_name: Option<String>,
    pub in_law_dates: Vec<String>,
}

/// One recognized header inside a larger text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMatch {
    /// Byte offset of the label.
    pub start: usize,
    /// Byte offset one past the last header character.
    pub end: usize,
    /// Label plus body as written.
    pub text: String,
    pub raw: RawHeader,
}

/// Label convention of one generation depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(usize);

impl Generation {
    /// Returns `None` for depth 0.
    pub fn new(depth: usize) -> Option<Self> {
        if depth == 0 {
            return None;
        }
        Some(Self(depth))
    }

    pub fn depth(self) -> usize {
        self.0
    }

    /// Whether this depth has a label family; deeper text is one line.
    pub fn is_labeled(self) -> bool {
        self.0 <= MAX_LABELED_DEPTH
    }

    /// Finds every header of this generation in `text`, in textual order.
    ///
    /// Returns an empty list for unlabeled depths.
    pub fn find_headers(self, text: &str) -> Vec<HeaderMatch> {
        if !self.is_labeled() {
            return Vec::new();
        }
        let label_re = &LABEL_RES[self.0 - 1];
        let mut headers = Vec::new();
        let mut cursor = 0;
        while cursor <= text.len() {
            let Some(label) = label_re.find_at(text, cursor) else {
                break;
            };
            let body_start = label.end();
            let body_end = BOUNDARY_RE
                .find_at(text, body_start)
                .map(|boundary| boundary.start())
                .unwrap_or(text.len());

            match parse_body(&text[body_start..body_end]) {
                Some(raw) => {
                    headers.push(HeaderMatch {
                        start: label.start(),
                        end: body_end,
                        text: text[label.start()..body_end].to_string(),
                        raw,
                    });
                    cursor = body_end;
                }
                None => cursor = next_char_boundary(text, label.start()),
            }
        }
        headers
    }

    /// Renders the label of the `position`-th (1-based) node at this depth.
    pub fn label(self, position: u32) -> String {
        match self.0 {
            1 => format!("{}:", to_roman(position)),
            2 => format!("{}.", to_letters(position)),
            3 => format!("{position}."),
            4 => format!("{}.", to_letters(position).to_ascii_lowercase()),
            5 => format!("({position})"),
            6 => format!("{})", to_roman(position).to_ascii_lowercase()),
            _ => String::new(),
        }
    }
}

/// Applies the header body grammar to a whole string (no label).
pub fn parse_body(body: &str) -> Option<RawHeader> {
    let caps = BODY_RE.captures(body)?;
    let dates = |name: &str| -> Vec<String> {
        caps.name(name)
            .map(|span| {
                DATE_TOKEN_RE
                    .find_iter(span.as_str())
                    .map(|date| date.as_str().to_string())
                    .collect()
            })
            .unwrap_or_default()
    };
    Some(RawHeader {
        member_name: caps["member"].to_string(),
        member_dates: dates("member_dates"),
        in_law_name: caps.name("in_law").map(|name| name.as_str().to_string()),
        in_law_dates: dates("in_law_dates"),
    })
}

fn next_char_boundary(text: &str, index: usize) -> usize {
    let mut next = index + 1;
    while next < text.len() && !text.is_char_boundary(next) {
        next += 1;
    }
    next
}

fn to_roman(mut value: u32) -> String {
    const NUMERALS: &[(u32, &str)] = &[
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut roman = String::new();
    for (weight, numeral) in NUMERALS {
        while value >= *weight {
            roman.push_str(numeral);
            value -= weight;
        }
    }
    roman
}

// Bijective base-26: 1 -> A, 26 -> Z, 27 -> AA.
fn to_letters(mut value: u32) -> String {
    let mut letters = Vec::new();
    while value > 0 {
        value -= 1;
        letters.push(b'A' + (value % 26) as u8);
        value /= 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}
