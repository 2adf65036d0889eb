//! Common regex patterns for driver's license extraction.
//!
//! All patterns expect upper-cased input unless noted otherwise.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Labeled license-number fields, tried in order
    pub static ref LICENSE_PREFIXES: Vec<Regex> = [
        r"LIC#?\s*:?\s*([A-Z0-9]+)",
        r"LICENSE#?\s*:?\s*([A-Z0-9]+)",
        r"DL#?\s*:?\s*([A-Z0-9]+)",
        r"DRIVER\s*LICENSE#?\s*:?\s*([A-Z0-9]+)",
        r"ID#?\s*:?\s*([A-Z0-9]+)",
        r"NUMBER#?\s*:?\s*([A-Z0-9]+)",
        r"LICENSE\s+NUMBER\s*:?\s*([A-Z0-9]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();

    // Bare numeric shapes common across many states, tried in order
    pub static ref NUMERIC_SHAPES: Vec<Regex> = [
        r"\b\d{9}\b",
        r"\b\d{8}\b",
        r"\b[A-Z]\d{7}\b",
        r"\b[A-Z]\d{12}\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();

    pub static ref NINE_DIGIT_RUN: Regex = Regex::new(r"\b\d{9}\b").unwrap();

    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    // Explicit name labels
    pub static ref NAME_LABELS: Vec<Regex> = [
        r"(?m)NAME[:\s]+([A-Z\s]+?)(?:\n|$)",
        r"(?m)FULL\s*NAME[:\s]+([A-Z\s]+?)(?:\n|$)",
        r"(?m)DRIVER[:\s]+([A-Z\s]+?)(?:\n|$)",
        r"(?m)LICENSEE[:\s]+([A-Z\s]+?)(?:\n|$)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();

    // Two consecutive capitalized or all-caps words, on original-case text
    pub static ref CAPITALIZED_PAIR: Regex = Regex::new(
        r"\b([A-Z][a-z]+|[A-Z]{2,})[ \t]+([A-Z][a-z]+|[A-Z]{2,})\b"
    ).unwrap();

    // Date-shaped tokens
    pub static ref DATE_MDY: Regex = Regex::new(
        r"\b(\d{1,2}[/\-]\d{1,2}[/\-]\d{4})\b"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4}[/\-]\d{1,2}[/\-]\d{1,2})\b"
    ).unwrap();

    pub static ref DATE_TOKEN: Regex = Regex::new(
        r"^(?:\d{1,2}[/\-]\d{1,2}[/\-]\d{4}|\d{4}[/\-]\d{1,2}[/\-]\d{1,2})$"
    ).unwrap();

    // Labeled birth dates
    pub static ref DOB_LABELS: Vec<Regex> = [
        r"DOB[:\s]*(\d{1,2}[/\-]\d{1,2}[/\-]\d{4})",
        r"DATE\s*OF\s*BIRTH[:\s]*(\d{1,2}[/\-]\d{1,2}[/\-]\d{4})",
        r"BIRTH[:\s]*(\d{1,2}[/\-]\d{1,2}[/\-]\d{4})",
        r"BORN[:\s]*(\d{1,2}[/\-]\d{1,2}[/\-]\d{4})",
        r"D\.?O\.?B\.?[:\s]*(\d{1,2}[/\-]\d{1,2}[/\-]\d{4})",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();

    // Field 7 (date of birth), inline on the same line
    pub static ref FIELD_7_INLINE: Regex = Regex::new(
        r"(?m)(?:^|[^0-9A-Z])7:[ \t]*(\d{1,2}[/\-]\d{1,2}[/\-]\d{4})\b"
    ).unwrap();
}

/// Inline field-code pattern: `N:` or `N ` followed by a run up to the next
/// digit or end of line.
pub fn field_inline(field: u8) -> Regex {
    Regex::new(&format!(r"(?:^|[^0-9A-Z]){}(?::|[ \t])[ \t]*([^0-9]+)", field)).unwrap()
}

/// Anchored field-code pattern: `N` at the very start of a line, then the
/// name run to end of line.
pub fn field_anchored(field: u8) -> Regex {
    Regex::new(&format!(r"^{}[.:]?[ \t]*([A-Z][^0-9]*)$", field)).unwrap()
}

lazy_static! {
    pub static ref FIELD_1_INLINE: Regex = field_inline(1);
    pub static ref FIELD_2_INLINE: Regex = field_inline(2);
    pub static ref FIELD_1_ANCHORED: Regex = field_anchored(1);
    pub static ref FIELD_2_ANCHORED: Regex = field_anchored(2);
}
