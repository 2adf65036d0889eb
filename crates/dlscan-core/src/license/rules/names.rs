//! First and last name extraction.
//!
//! Standardized field codes come first (field 1 = last name, field 2 = first
//! name). Whatever they leave empty is backfilled from labeled names, a scored
//! scan of the top lines, and finally any pair of capitalized words.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::jurisdiction::Jurisdiction;
use super::patterns::{
    CAPITALIZED_PAIR, FIELD_1_ANCHORED, FIELD_1_INLINE, FIELD_2_ANCHORED, FIELD_2_INLINE,
    NAME_LABELS,
};

lazy_static! {
    /// Words that mark a field value as license vocabulary rather than a name.
    static ref FIELD_VOCABULARY: HashSet<&'static str> = [
        "LICENSE", "DRIVER", "DRIVERS", "CLASS", "EXPIRES", "EXP", "ISS", "ISSUED",
        "DOB", "BIRTH", "DATE", "SEX", "HGT", "WGT", "EYES", "HAIR", "ADDRESS",
        "STATE", "DL", "ID", "REST", "RESTR", "END", "RESTRICTIONS", "ENDORSEMENTS",
        "NONE", "USA",
    ]
    .into_iter()
    .collect();

    /// Words that disqualify a line from being a name line.
    static ref LINE_VOCABULARY: HashSet<&'static str> = [
        "LICENSE", "DRIVER", "CLASS", "EXPIRES", "ISSUED", "BIRTH", "DATE",
        "HEIGHT", "WEIGHT", "EYES", "HAIR", "SEX", "RESTRICTIONS", "ADDRESS",
        "CITY", "STATE", "ZIP", "COUNTRY", "VETERAN", "ORGAN", "DONOR",
        "CONNECTICUT", "CALIFORNIA", "TEXAS", "FLORIDA", "DOB", "LIC#", "LIC",
        "ID#", "NUMBER", "FULL", "NAME", "BORN",
    ]
    .into_iter()
    .collect();

    /// Words at which a labeled name stops.
    static ref LABEL_STOP_WORDS: HashSet<&'static str> = [
        "LIC", "LICENSE", "DOB", "CLASS", "EXPIRES", "STATE", "CT", "CA", "TX", "FL", "NY",
    ]
    .into_iter()
    .collect();
}

/// Extracted name parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameParts {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl NameParts {
    fn is_complete(&self) -> bool {
        self.first_name.is_some() && self.last_name.is_some()
    }

    /// Split a validated name into first/last parts.
    ///
    /// One word is a first name only; three or more keep the first and last word.
    pub fn parse(name: &str) -> Self {
        let words: Vec<&str> = name.split_whitespace().collect();
        match words.as_slice() {
            [] => Self::default(),
            [only] => Self {
                first_name: Some(only.to_string()),
                last_name: None,
            },
            [first, .., last] => Self {
                first_name: Some(first.to_string()),
                last_name: Some(last.to_string()),
            },
        }
    }
}

/// Name extractor.
pub struct NameExtractor {
    scan_lines: usize,
}

impl NameExtractor {
    /// Create a new name extractor scanning the first 8 lines for name-like lines.
    pub fn new() -> Self {
        Self { scan_lines: 8 }
    }

    /// Set how many leading lines the name-line scan considers.
    pub fn with_scan_lines(mut self, scan_lines: usize) -> Self {
        self.scan_lines = scan_lines;
        self
    }

    /// Extract first and last name from document text.
    pub fn extract(&self, text: &str) -> NameParts {
        let upper = text.to_uppercase();
        let lines: Vec<&str> = upper.lines().map(str::trim).collect();

        let primary = NameParts {
            first_name: field_value(&lines, 2, &FIELD_2_INLINE, &FIELD_2_ANCHORED),
            last_name: field_value(&lines, 1, &FIELD_1_INLINE, &FIELD_1_ANCHORED),
        };

        if primary.is_complete() {
            debug!("Names found by field codes");
            return primary;
        }

        let fallback = self.fallback(&upper, &lines, text);
        let names = NameParts {
            first_name: primary.first_name.or(fallback.first_name),
            last_name: primary.last_name.or(fallback.last_name),
        };

        if names.first_name.is_none() && names.last_name.is_none() {
            debug!("No name found");
        }
        names
    }

    fn fallback(&self, upper: &str, lines: &[&str], original: &str) -> NameParts {
        if let Some(name) = labeled_name(upper) {
            debug!("Name found by label");
            return NameParts::parse(&name);
        }

        if let Some(name) = self.best_name_line(lines) {
            debug!("Name found by line scan");
            return NameParts::parse(&name);
        }

        if let Some(name) = capitalized_pair(original) {
            debug!("Name found by capitalized word pair");
            return NameParts::parse(&name);
        }

        NameParts::default()
    }

    /// Highest-scoring name-like line among the leading lines.
    fn best_name_line(&self, lines: &[&str]) -> Option<String> {
        let mut best: Option<(&str, usize)> = None;

        for (index, line) in lines.iter().take(self.scan_lines).enumerate() {
            if !looks_like_name_line(line) || !is_plausible_name(line) {
                continue;
            }

            let words: Vec<&str> = line.split_whitespace().collect();
            let mut score = self.scan_lines - index;
            if words.len() == 2 {
                score += 10;
            }
            if words.iter().all(|w| w.chars().all(char::is_alphabetic)) {
                score += 5;
            }
            if (4..=30).contains(&line.len()) {
                score += 3;
            }

            if best.is_none_or(|(_, top)| score > top) {
                best = Some((line, score));
            }
        }

        best.map(|(line, _)| line.split_whitespace().collect::<Vec<_>>().join(" "))
    }
}

impl Default for NameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract first and last name with default settings.
pub fn extract_names(text: &str) -> NameParts {
    NameExtractor::new().extract(text)
}

/// Value of a numbered document field, in inline, split-line or anchored form.
fn field_value(lines: &[&str], field: u8, inline: &Regex, anchored: &Regex) -> Option<String> {
    let inline_hit = lines.iter().find_map(|line| {
        inline
            .captures_iter(line)
            .map(|caps| clean_run(&caps[1]))
            .find(|run| is_field_name(run))
    });
    if inline_hit.is_some() {
        return inline_hit;
    }

    let label = field.to_string();
    let split_hit = lines.windows(2).find_map(|pair| {
        if pair[0] != label {
            return None;
        }
        let run = clean_run(pair[1]);
        is_field_name(&run).then_some(run)
    });
    if split_hit.is_some() {
        return split_hit;
    }

    lines.iter().find_map(|line| {
        let run = clean_run(&anchored.captures(line)?[1]);
        is_field_name(&run).then_some(run)
    })
}

fn clean_run(run: &str) -> String {
    run.trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '.' | ':' | ';'))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Validity check for a field-coded name value.
fn is_field_name(run: &str) -> bool {
    // Single letters are initials or OCR noise
    if run.chars().count() < 2 || run.len() > 30 {
        return false;
    }
    if !run.chars().any(char::is_alphabetic) || run.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }

    let words: Vec<&str> = run.split_whitespace().collect();
    if words.is_empty() || words.len() > 3 {
        return false;
    }
    if words.iter().any(|w| FIELD_VOCABULARY.contains(w)) {
        return false;
    }

    !is_repeated_character(run)
}

fn is_repeated_character(text: &str) -> bool {
    let mut chars = text.chars().filter(|c| !c.is_whitespace());
    match chars.next() {
        Some(first) => chars.all(|c| c == first),
        None => true,
    }
}

/// General plausibility check applied to every fallback candidate.
fn is_plausible_name(name: &str) -> bool {
    let name = name.trim();
    if name.len() < 2 || name.len() > 50 {
        return false;
    }
    if !name.chars().any(|c| c.is_ascii_uppercase()) || name.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }

    let words: Vec<&str> = name.split_whitespace().collect();
    if words.is_empty() || words.len() > 4 {
        return false;
    }
    if words.iter().any(|w| LINE_VOCABULARY.contains(w.trim_end_matches(':'))) {
        return false;
    }

    !Jurisdiction::priority_order().iter().any(|j| j.name() == name)
}

/// Name following an explicit label such as `NAME:` or `LICENSEE:`.
fn labeled_name(upper: &str) -> Option<String> {
    NAME_LABELS.iter().find_map(|pattern| {
        let caps = pattern.captures(upper)?;
        let words: Vec<&str> = caps[1]
            .split_whitespace()
            .take_while(|w| !LABEL_STOP_WORDS.contains(w))
            .collect();

        if words.is_empty() {
            return None;
        }
        let name = words.join(" ");
        is_plausible_name(&name).then_some(name)
    })
}

/// Whether a line is shaped like a person's name.
fn looks_like_name_line(line: &str) -> bool {
    let len = line.chars().count();
    if len < 3 {
        return false;
    }

    if line
        .split_whitespace()
        .any(|w| LINE_VOCABULARY.contains(w.trim_end_matches(':')))
    {
        return false;
    }

    let digits = line.chars().filter(|c| c.is_ascii_digit()).count();
    if digits * 2 > len {
        return false;
    }

    if !line
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_whitespace() || matches!(c, '-' | '.' | '\''))
    {
        return false;
    }

    let alpha = line.chars().filter(|c| c.is_alphabetic()).count();
    if (alpha as f32) < len as f32 * 0.7 {
        return false;
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() || words.len() > 4 {
        return false;
    }

    words.iter().all(|w| {
        w.chars().count() >= 2 && w.chars().next().is_some_and(|c| c.is_ascii_uppercase())
    })
}

/// Last resort: two consecutive capitalized or all-caps words in the original text.
fn capitalized_pair(original: &str) -> Option<String> {
    CAPITALIZED_PAIR.captures_iter(original).find_map(|caps| {
        let name = format!("{} {}", &caps[1], &caps[2]).to_uppercase();
        is_plausible_name(&name).then_some(name)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(first: Option<&str>, last: Option<&str>) -> NameParts {
        NameParts {
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
        }
    }

    #[test]
    fn test_field_codes_inline() {
        let text = "CALIFORNIA\nDL A1234567\n1 SAMPLE\n2 ALEXANDER JOSEPH\n8 2570 24TH STREET";
        assert_eq!(extract_names(text), names(Some("ALEXANDER JOSEPH"), Some("SAMPLE")));
    }

    #[test]
    fn test_field_codes_with_colon_on_one_line() {
        let text = "1:DOE 2:JANE\n4D 123456789";
        assert_eq!(extract_names(text), names(Some("JANE"), Some("DOE")));
    }

    #[test]
    fn test_field_codes_split_line() {
        let text = "TEXAS\n1\nGARCIA\n2\nMARIA\n4D 12345678";
        assert_eq!(extract_names(text), names(Some("MARIA"), Some("GARCIA")));
    }

    #[test]
    fn test_field_codes_anchored() {
        let text = "1.O'NEIL\n2.SEAN";
        assert_eq!(extract_names(text), names(Some("SEAN"), Some("O'NEIL")));
    }

    #[test]
    fn test_field_value_rejects_vocabulary() {
        let text = "1 CLASS\n2 DRIVER LICENSE";
        assert_eq!(extract_names(text), NameParts::default());
    }

    #[test]
    fn test_backfill_missing_first_name() {
        // Field 1 present, field 2 missing: the line scan supplies the first name
        let text = "1 SCHONGLE\nANTOSIO SCHONGLE\n123456789";
        assert_eq!(extract_names(text), names(Some("ANTOSIO"), Some("SCHONGLE")));
    }

    #[test]
    fn test_labeled_name() {
        let text = "CT DRIVER LICENSE\nNAME: JOHN DOE\nLIC: 111222333\nCLASS: D";
        assert_eq!(extract_names(text), names(Some("JOHN"), Some("DOE")));
    }

    #[test]
    fn test_labeled_name_stops_at_keyword() {
        let text = "LICENSEE: MARY ANN SMITH CLASS C";
        assert_eq!(extract_names(text), names(Some("MARY"), Some("SMITH")));
    }

    #[test]
    fn test_labeled_name_keeps_particles() {
        let text = "NAME: MARY DE LA CRUZ\nLIC# A1234567";
        assert_eq!(extract_names(text), names(Some("MARY"), Some("CRUZ")));
    }

    #[test]
    fn test_labeled_name_stops_at_state_code() {
        let text = "NAME: JOHN DOE CT\nLIC# 123456789";
        assert_eq!(extract_names(text), names(Some("JOHN"), Some("DOE")));
    }

    #[test]
    fn test_single_letter_field_value_is_rejected() {
        let text = "1 X\n2 JOHN";
        assert_eq!(extract_names(text), names(Some("JOHN"), None));
        let text = "1 XX\n2 JOHN";
        assert_eq!(extract_names(text), names(Some("JOHN"), None));
        let text = "1 NG\n2 JOHN";
        assert_eq!(extract_names(text), names(Some("JOHN"), Some("NG")));
    }

    #[test]
    fn test_name_line_scan() {
        let text = "CONNECTICUT\nDRIVER LICENSE\nANTOSIO SCHONGLE\n123456789\nCLASS D";
        assert_eq!(extract_names(text), names(Some("ANTOSIO"), Some("SCHONGLE")));
    }

    #[test]
    fn test_two_word_line_beats_earlier_single_word() {
        let text = "WELCOME\nJOHN SMITH";
        assert_eq!(extract_names(text), names(Some("JOHN"), Some("SMITH")));
    }

    #[test]
    fn test_capitalized_pair_fallback() {
        let text = "Issued to Jane Roe, 12 Elm St 55555";
        assert_eq!(extract_names(text), names(Some("JANE"), Some("ROE")));
    }

    #[test]
    fn test_no_name() {
        let text = "Lic# A1234567 CLASS C\nEXPIRES 01/15/2025";
        assert_eq!(extract_names(text), NameParts::default());
    }

    #[test]
    fn test_parse_name() {
        assert_eq!(NameParts::parse("CHER"), names(Some("CHER"), None));
        assert_eq!(NameParts::parse("JOHN DOE"), names(Some("JOHN"), Some("DOE")));
        assert_eq!(NameParts::parse("JOHN Q PUBLIC"), names(Some("JOHN"), Some("PUBLIC")));
        assert_eq!(NameParts::parse(""), NameParts::default());
    }

    #[test]
    fn test_scan_depth() {
        let text = "A1\nB2\nC3\nJOHN SMITH";
        let shallow = NameExtractor::new().with_scan_lines(2);
        assert_eq!(shallow.best_name_line(&text.lines().collect::<Vec<_>>()), None);
    }
}
