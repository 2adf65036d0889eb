//! License-number extraction.
//!
//! Stages run in order; each is tried only when every earlier stage produced
//! no accepted candidate.

use tracing::debug;

use super::jurisdiction::{Jurisdiction, GENERIC_SHAPE};
use super::patterns::{LICENSE_PREFIXES, NINE_DIGIT_RUN, NUMERIC_SHAPES, WHITESPACE};
use super::validator::Candidate;

type Stage = fn(&str, Option<Jurisdiction>) -> Option<String>;

const STAGES: [(&str, Stage); 5] = [
    ("prefix field", prefixed_field),
    ("jurisdiction shape", jurisdiction_shape),
    ("nine-digit jurisdiction", nine_digit_jurisdiction),
    ("numeric shape", numeric_shape),
    ("generic shape", generic_shape),
];

/// Extract the most likely license number from document text.
pub fn extract_license_number(text: &str, jurisdiction: Option<Jurisdiction>) -> Option<String> {
    let upper = text.to_uppercase();

    let found = STAGES.iter().find_map(|(name, stage)| {
        let hit = stage(&upper, jurisdiction)?;
        debug!("License number {} found by {} stage", hit, name);
        Some(hit)
    });

    if found.is_none() {
        debug!("No license number found");
    }
    found
}

fn accept(token: &str, jurisdiction: Option<Jurisdiction>) -> bool {
    Candidate::new(token, jurisdiction).is_valid()
}

fn strip_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, "").into_owned()
}

/// Labeled fields such as `LIC#`, `DL:` or `LICENSE NUMBER:`.
fn prefixed_field(text: &str, jurisdiction: Option<Jurisdiction>) -> Option<String> {
    LICENSE_PREFIXES.iter().find_map(|pattern| {
        pattern
            .captures_iter(text)
            .map(|caps| strip_whitespace(&caps[1]))
            .find(|token| accept(token, jurisdiction))
    })
}

/// The jurisdiction's own shape, in the text as-is and with whitespace removed.
fn jurisdiction_shape(text: &str, jurisdiction: Option<Jurisdiction>) -> Option<String> {
    let shape = jurisdiction?.shape()?;

    if let Some(hit) = shape.find_all(text).find(|t| accept(t, jurisdiction)) {
        return Some(hit.to_string());
    }

    let stripped = strip_whitespace(text);
    shape
        .find_all(&stripped)
        .find(|t| accept(t, jurisdiction))
        .map(str::to_string)
}

/// Bare 9-digit runs for jurisdictions issuing 9-digit numbers.
fn nine_digit_jurisdiction(text: &str, jurisdiction: Option<Jurisdiction>) -> Option<String> {
    if !jurisdiction?.uses_nine_digit_numbers() {
        return None;
    }

    NINE_DIGIT_RUN
        .find_iter(text)
        .map(|m| m.as_str())
        .find(|t| accept(t, jurisdiction))
        .map(str::to_string)
}

/// Common bare shapes: 9 digits, 8 digits, letter + 7 digits, letter + 12 digits.
fn numeric_shape(text: &str, jurisdiction: Option<Jurisdiction>) -> Option<String> {
    NUMERIC_SHAPES.iter().find_map(|pattern| {
        pattern
            .find_iter(text)
            .map(|m| m.as_str())
            .find(|t| accept(t, jurisdiction))
            .map(str::to_string)
    })
}

/// Any generic alphanumeric run in the whitespace-stripped text, preferring
/// the candidate with the most digits (earliest wins ties).
fn generic_shape(text: &str, jurisdiction: Option<Jurisdiction>) -> Option<String> {
    let stripped = strip_whitespace(text);
    let mut best: Option<(&str, usize)> = None;

    for token in GENERIC_SHAPE.find_all(&stripped) {
        if !accept(token, jurisdiction) {
            continue;
        }
        let digits = token.chars().filter(|c| c.is_ascii_digit()).count();
        if best.is_none_or(|(_, most)| digits > most) {
            best = Some((token, digits));
        }
    }

    best.map(|(token, _)| token.to_string())
}
