//! License-number candidate validation.
//!
//! A candidate is a token proposed by one of the extraction stages together
//! with the jurisdiction it was proposed under. Rejections are ordinary
//! outcomes: the caller discards the token and moves on.

use std::collections::HashSet;

use lazy_static::lazy_static;
use thiserror::Error;
use tracing::trace;

use super::jurisdiction::{Jurisdiction, NINE_DIGITS};

lazy_static! {
    /// Exact tokens known to be OCR false positives.
    static ref BLOCKLIST: HashSet<String> = {
        let mut set: HashSet<String> = [
            "LICENSE", "DRIVER", "CLASS", "EXPIRES", "ISSUED", "BIRTH", "DATE",
            "HEIGHT", "WEIGHT", "EYES", "HAIR", "SEX", "MALE", "FEMALE",
            "RESTRICTIONS", "ENDORSEMENTS", "VETERAN", "ORGAN", "DONOR",
            "ADDRESS", "CITY", "STATE", "ZIP", "COUNTRY", "USA", "UNITED",
            "STATES", "AMERICA", "DEPARTMENT", "MOTOR", "VEHICLES", "DMV",
            "NOVALIDLICENSEH", "EXPIRES12", "ANTOSIO", "SCHONGLE", "NAME",
            "FIRST", "LAST", "MIDDLE", "SIGNATURE",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        // Jurisdiction names as they appear once whitespace is stripped
        for j in Jurisdiction::priority_order() {
            set.insert(j.name().replace(' ', ""));
        }
        set
    };
}

const FALSE_POSITIVE_PREFIXES: [&str; 5] = ["EXPIRES", "NOVALID", "INVALID", "CLASS", "BIRTH"];

/// Field labels that never occur inside a real license number.
const EMBEDDED_LABELS: [&str; 6] = ["EXPIRES", "CLASS", "BIRTH", "ISSUED", "LICENSE", "DRIVER"];

const CENTURIES: [&str; 3] = ["19", "20", "21"];

/// Why a candidate was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("shorter than 4 characters")]
    TooShort,
    #[error("known false positive")]
    Blocklisted,
    #[error("starts with a field label")]
    LabelPrefix,
    #[error("contains a field label")]
    EmbeddedLabel,
    #[error("contains no digits")]
    NoDigits,
    #[error("looks like a name")]
    Alphabetic,
    #[error("too few digits for its letters")]
    MostlyLetters,
    #[error("looks like a date")]
    DateLike,
    #[error("no alphanumeric characters")]
    NotAlphanumeric,
    #[error("single repeated character")]
    RepeatedCharacter,
    #[error("length {len} outside {min}..={max}")]
    Length { len: usize, min: usize, max: usize },
    #[error("does not match the jurisdiction shape")]
    Shape,
}

/// A proposed license number and the jurisdiction it was produced under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub token: &'a str,
    pub jurisdiction: Option<Jurisdiction>,
}

impl<'a> Candidate<'a> {
    pub fn new(token: &'a str, jurisdiction: Option<Jurisdiction>) -> Self {
        Self { token, jurisdiction }
    }

    /// Run the rejection rules in order; the first failing rule wins.
    pub fn check(&self) -> Result<(), Rejection> {
        let token = self.token;
        let len = token.chars().count();

        if len < 4 {
            return Err(Rejection::TooShort);
        }

        if BLOCKLIST.contains(token) {
            return Err(Rejection::Blocklisted);
        }

        if FALSE_POSITIVE_PREFIXES.iter().any(|p| token.starts_with(p)) {
            return Err(Rejection::LabelPrefix);
        }

        if EMBEDDED_LABELS.iter().any(|l| token.contains(l)) {
            return Err(Rejection::EmbeddedLabel);
        }

        let digits = token.chars().filter(|c| c.is_ascii_digit()).count();
        let letters = token.chars().filter(|c| c.is_alphabetic()).count();

        if digits == 0 {
            return Err(Rejection::NoDigits);
        }

        if letters == len && len > 3 {
            return Err(Rejection::Alphabetic);
        }

        if letters > digits && digits < 3 {
            return Err(Rejection::MostlyLetters);
        }

        if looks_like_date(token) {
            return Err(Rejection::DateLike);
        }

        if !token.chars().any(|c| c.is_ascii_alphanumeric()) {
            return Err(Rejection::NotAlphanumeric);
        }

        let mut chars = token.chars();
        if let Some(first) = chars.next() {
            if chars.all(|c| c == first) {
                return Err(Rejection::RepeatedCharacter);
            }
        }

        let (min, max) = Jurisdiction::length_window(self.jurisdiction);
        if len < min || len > max {
            return Err(Rejection::Length { len, min, max });
        }

        if let Some(shape) = self.jurisdiction.and_then(|j| j.shape()) {
            let nine_digit_exception = self
                .jurisdiction
                .is_some_and(|j| j.uses_nine_digit_numbers() && NINE_DIGITS.is_match(token));

            if !shape.matches(token) && !nine_digit_exception {
                return Err(Rejection::Shape);
            }
        }

        Ok(())
    }

    /// Whether the candidate plausibly is a license number.
    pub fn is_valid(&self) -> bool {
        match self.check() {
            Ok(()) => true,
            Err(reason) => {
                trace!("Rejected license candidate {:?}: {}", self.token, reason);
                false
            }
        }
    }
}

/// Validate a license-number candidate under an optional jurisdiction.
pub fn validate_license_number(token: &str, jurisdiction: Option<Jurisdiction>) -> bool {
    Candidate::new(token, jurisdiction).is_valid()
}

/// Eight digits that start with a century, or end with a four-digit year.
fn looks_like_date(token: &str) -> bool {
    if token.len() != 8 || !token.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    CENTURIES
        .iter()
        .any(|century| token.starts_with(century) || token[4..6] == **century)
}
