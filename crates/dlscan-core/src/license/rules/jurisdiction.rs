//! Jurisdiction table: the closed set of US license issuers and their
//! license-number shape rules.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A US state or the District of Columbia.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Jurisdiction {
    Al, Ak, Az, Ar, Ca, Co, Ct, De, Fl, Ga,
    Hi, Id, Il, In, Ia, Ks, Ky, La, Me, Md,
    Ma, Mi, Mn, Ms, Mo, Mt, Ne, Nv, Nh, Nj,
    Nm, Ny, Nc, Nd, Oh, Ok, Or, Pa, Ri, Sc,
    Sd, Tn, Tx, Ut, Vt, Va, Wa, Wv, Wi, Wy,
    Dc,
}

use Jurisdiction as J;

/// Detection order used when scanning text for a jurisdiction.
///
/// Earlier entries win when several codes appear in the same document.
const PRIORITY: [Jurisdiction; 51] = [
    J::Al, J::Ak, J::Az, J::Ar, J::Ca, J::Co, J::Ct, J::De, J::Fl, J::Ga,
    J::Hi, J::Id, J::Il, J::In, J::Ia, J::Ks, J::Ky, J::La, J::Me, J::Md,
    J::Ma, J::Mi, J::Mn, J::Ms, J::Mo, J::Mt, J::Ne, J::Nv, J::Nh, J::Nj,
    J::Nm, J::Ny, J::Nc, J::Nd, J::Oh, J::Ok, J::Or, J::Pa, J::Ri, J::Sc,
    J::Sd, J::Tn, J::Tx, J::Ut, J::Vt, J::Va, J::Wa, J::Wv, J::Wi, J::Wy,
    J::Dc,
];

/// (code, full name), indexed by discriminant.
const NAMES: [(&str, &str); 51] = [
    ("AL", "ALABAMA"), ("AK", "ALASKA"), ("AZ", "ARIZONA"), ("AR", "ARKANSAS"),
    ("CA", "CALIFORNIA"), ("CO", "COLORADO"), ("CT", "CONNECTICUT"), ("DE", "DELAWARE"),
    ("FL", "FLORIDA"), ("GA", "GEORGIA"), ("HI", "HAWAII"), ("ID", "IDAHO"),
    ("IL", "ILLINOIS"), ("IN", "INDIANA"), ("IA", "IOWA"), ("KS", "KANSAS"),
    ("KY", "KENTUCKY"), ("LA", "LOUISIANA"), ("ME", "MAINE"), ("MD", "MARYLAND"),
    ("MA", "MASSACHUSETTS"), ("MI", "MICHIGAN"), ("MN", "MINNESOTA"), ("MS", "MISSISSIPPI"),
    ("MO", "MISSOURI"), ("MT", "MONTANA"), ("NE", "NEBRASKA"), ("NV", "NEVADA"),
    ("NH", "NEW HAMPSHIRE"), ("NJ", "NEW JERSEY"), ("NM", "NEW MEXICO"), ("NY", "NEW YORK"),
    ("NC", "NORTH CAROLINA"), ("ND", "NORTH DAKOTA"), ("OH", "OHIO"), ("OK", "OKLAHOMA"),
    ("OR", "OREGON"), ("PA", "PENNSYLVANIA"), ("RI", "RHODE ISLAND"), ("SC", "SOUTH CAROLINA"),
    ("SD", "SOUTH DAKOTA"), ("TN", "TENNESSEE"), ("TX", "TEXAS"), ("UT", "UTAH"),
    ("VT", "VERMONT"), ("VA", "VIRGINIA"), ("WA", "WASHINGTON"), ("WV", "WEST VIRGINIA"),
    ("WI", "WISCONSIN"), ("WY", "WYOMING"), ("DC", "DISTRICT OF COLUMBIA"),
];

impl Jurisdiction {
    /// Two-letter code, e.g. `"CT"`.
    pub fn code(self) -> &'static str {
        NAMES[self as usize].0
    }

    /// Full upper-case name, e.g. `"CONNECTICUT"`.
    pub fn name(self) -> &'static str {
        NAMES[self as usize].1
    }

    /// All jurisdictions in detection priority order.
    pub fn priority_order() -> &'static [Jurisdiction] {
        &PRIORITY
    }

    /// License-number shape rule, if this jurisdiction has one.
    pub fn shape(self) -> Option<&'static ShapePattern> {
        shape_pattern(self)
    }

    /// Length window `(min, max)` a license number must fall in.
    pub fn length_window(jurisdiction: Option<Self>) -> (usize, usize) {
        match jurisdiction {
            Some(J::Fl) => (6, 13),
            Some(J::Ca) | Some(J::Ny) | Some(J::Tx) => (6, 12),
            Some(J::Ct) => (8, 10),
            _ => (6, 15),
        }
    }

    /// Whether this jurisdiction issues strict 9-digit numeric identifiers.
    pub fn uses_nine_digit_numbers(self) -> bool {
        self == J::Ct
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Unknown jurisdiction code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown jurisdiction code: {0}")]
pub struct UnknownJurisdiction(pub String);

impl FromStr for Jurisdiction {
    type Err = UnknownJurisdiction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        PRIORITY
            .iter()
            .copied()
            .find(|j| j.code() == code)
            .ok_or_else(|| UnknownJurisdiction(s.to_string()))
    }
}

/// Expected character-class sequence and length of a license number.
#[derive(Debug)]
pub struct ShapePattern {
    /// Jurisdiction this rule belongs to, `None` for the generic rule.
    pub jurisdiction: Option<Jurisdiction>,
    /// Regex source of the shape, unanchored.
    pub source: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    search: Regex,
    exact: Regex,
}

impl ShapePattern {
    fn new(jurisdiction: Option<Jurisdiction>, source: &'static str, description: &'static str) -> Self {
        Self {
            jurisdiction,
            source,
            description,
            search: Regex::new(source).unwrap(),
            exact: Regex::new(&format!("^(?:{})$", source)).unwrap(),
        }
    }

    /// Whether the whole token has this shape.
    pub fn matches(&self, token: &str) -> bool {
        self.exact.is_match(token)
    }

    /// All non-overlapping runs in `text` having this shape, in order.
    pub fn find_all<'t>(&self, text: &'t str) -> impl Iterator<Item = &'t str> {
        self.search.find_iter(text).map(|m| m.as_str())
    }
}

lazy_static! {
    static ref SHAPES: Vec<ShapePattern> = vec![
        ShapePattern::new(Some(J::Ca), r"[A-Z]\d{7}", "1 letter + 7 digits"),
        ShapePattern::new(Some(J::Tx), r"\d{8}", "8 digits"),
        ShapePattern::new(Some(J::Fl), r"[A-Z]\d{12,13}", "1 letter + 12-13 digits"),
        ShapePattern::new(Some(J::Ny), r"\d{9}", "9 digits"),
        ShapePattern::new(Some(J::Pa), r"\d{8}", "8 digits"),
        ShapePattern::new(Some(J::Il), r"[A-Z]\d{11}", "1 letter + 11 digits"),
        ShapePattern::new(Some(J::Oh), r"[A-Z]{2}\d{6}", "2 letters + 6 digits"),
        ShapePattern::new(Some(J::Ga), r"\d{9}", "9 digits"),
        ShapePattern::new(Some(J::Nc), r"\d{12}", "12 digits"),
        ShapePattern::new(Some(J::Mi), r"[A-Z]\d{12}", "1 letter + 12 digits"),
        ShapePattern::new(Some(J::Ct), r"\d{9}", "9 digits"),
    ];

    /// Fallback shape for unknown jurisdictions.
    pub static ref GENERIC_SHAPE: ShapePattern =
        ShapePattern::new(None, r"[A-Z0-9]{6,15}", "6-15 letters or digits");

    /// Strict 9-digit rule accepted for nine-digit jurisdictions.
    pub static ref NINE_DIGITS: Regex = Regex::new(r"^\d{9}$").unwrap();
}

/// Shape rule for a jurisdiction, if one is declared.
pub fn shape_pattern(jurisdiction: Jurisdiction) -> Option<&'static ShapePattern> {
    SHAPES.iter().find(|s| s.jurisdiction == Some(jurisdiction))
}

/// All supported jurisdictions, sorted by code.
pub fn supported_jurisdictions() -> Vec<Jurisdiction> {
    let mut all = PRIORITY.to_vec();
    all.sort_by_key(|j| j.code());
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_table_is_complete() {
        assert_eq!(supported_jurisdictions().len(), 51);
        for (i, j) in PRIORITY.iter().enumerate() {
            assert_eq!(*j as usize, i, "priority list must follow declaration order");
        }
    }

    #[test]
    fn test_code_and_name() {
        assert_eq!(J::Ct.code(), "CT");
        assert_eq!(J::Ct.name(), "CONNECTICUT");
        assert_eq!(J::Dc.name(), "DISTRICT OF COLUMBIA");
        assert_eq!(J::Ny.to_string(), "NY");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("ca".parse::<Jurisdiction>(), Ok(J::Ca));
        assert_eq!(" WY ".parse::<Jurisdiction>(), Ok(J::Wy));
        assert!("XX".parse::<Jurisdiction>().is_err());
    }

    #[test]
    fn test_serde_uses_code() {
        assert_eq!(serde_json::to_string(&J::Nh).unwrap(), "\"NH\"");
        let parsed: Jurisdiction = serde_json::from_str("\"DC\"").unwrap();
        assert_eq!(parsed, J::Dc);
    }

    #[test]
    fn test_shape_patterns() {
        let ca = shape_pattern(J::Ca).unwrap();
        assert!(ca.matches("A1234567"));
        assert!(!ca.matches("A12345678"));
        assert!(!ca.matches("XA1234567"));

        let fl = J::Fl.shape().unwrap();
        assert!(fl.matches("B123456789012"));
        assert!(fl.matches("B1234567890123"));

        assert!(shape_pattern(J::Wy).is_none());
    }

    #[test]
    fn test_find_all_is_unanchored() {
        let ct = shape_pattern(J::Ct).unwrap();
        let runs: Vec<&str> = ct.find_all("A 123456789 B 987654321").collect();
        assert_eq!(runs, vec!["123456789", "987654321"]);
    }

    #[test]
    fn test_length_windows() {
        assert_eq!(Jurisdiction::length_window(None), (6, 15));
        assert_eq!(Jurisdiction::length_window(Some(J::Fl)), (6, 13));
        assert_eq!(Jurisdiction::length_window(Some(J::Tx)), (6, 12));
        assert_eq!(Jurisdiction::length_window(Some(J::Ct)), (8, 10));
        assert_eq!(Jurisdiction::length_window(Some(J::Oh)), (6, 15));
    }
}
