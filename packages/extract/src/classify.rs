//! Per-line role assignment for PDF-extracted report text.
//!
//! Each non-blank line gets exactly one [`LineClass`]. The checks run in a
//! fixed order: registration id, phone, serial counter, officer marker,
//! and finally name fragment. A line holding both a GSTIN and a phone
//! number is therefore a [`LineClass::RegistrationId`], since the GSTIN is
//! what opens a new record.

use std::sync::LazyLock;

use gst_contacts_contact_models::REGISTRATION_ID_PATTERN;
use regex::Regex;

use crate::config::DEFAULT_OFFICER_MARKER;

static REGISTRATION_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(REGISTRATION_ID_PATTERN).expect("valid regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{10}").expect("valid regex"));

/// The role a single text line plays in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// The line contains a GSTIN. `remainder` is the text after it.
    RegistrationId {
        /// The matched 15-character GSTIN.
        id: &'a str,
        /// Trimmed text following the GSTIN on the same line.
        remainder: &'a str,
    },
    /// The line contains a ten-digit run (the first one is kept).
    Phone(&'a str),
    /// The line is nothing but digits, i.e. a row counter.
    PureSerial,
    /// The line names an officer rather than a business.
    Noise,
    /// Anything else: possible business-name text.
    NameFragment(&'a str),
}

/// Decides whether a line (or token) belongs to an officer name.
///
/// Reports print the assessing officer next to each business; the only
/// reliable tell is a document-specific marker. Closures taking `&str`
/// implement this trait, so callers can swap in their own heuristic.
pub trait OfficerPredicate {
    /// Returns `true` if `text` looks like officer-name text.
    fn is_officer_line(&self, text: &str) -> bool;
}

impl<F> OfficerPredicate for F
where
    F: Fn(&str) -> bool,
{
    fn is_officer_line(&self, text: &str) -> bool {
        self(text)
    }
}

/// Matches text containing a literal marker substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfficerMarker {
    marker: String,
}

impl OfficerMarker {
    /// Creates a predicate matching text that contains `marker`.
    #[must_use]
    pub fn new(marker: &str) -> Self {
        Self {
            marker: marker.to_owned(),
        }
    }
}

impl Default for OfficerMarker {
    fn default() -> Self {
        Self::new(DEFAULT_OFFICER_MARKER)
    }
}

impl OfficerPredicate for OfficerMarker {
    fn is_officer_line(&self, text: &str) -> bool {
        text.contains(&self.marker)
    }
}

/// Returns the first ten-digit run in `text`, if any.
#[must_use]
pub fn find_phone(text: &str) -> Option<regex::Match<'_>> {
    PHONE_RE.find(text)
}

/// Classifies report lines using a pluggable officer predicate.
#[derive(Debug, Clone)]
pub struct LineClassifier<P = OfficerMarker> {
    officer: P,
}

impl Default for LineClassifier<OfficerMarker> {
    fn default() -> Self {
        Self::new(OfficerMarker::default())
    }
}

impl LineClassifier<OfficerMarker> {
    /// Creates a classifier whose officer lines contain `marker`.
    #[must_use]
    pub fn with_marker(marker: &str) -> Self {
        Self {
            officer: OfficerMarker::new(marker),
        }
    }
}

impl<P: OfficerPredicate> LineClassifier<P> {
    /// Creates a classifier with a custom officer predicate.
    #[must_use]
    pub const fn new(officer: P) -> Self {
        Self { officer }
    }

    /// Whether `text` trips the officer predicate.
    #[must_use]
    pub fn is_officer_line(&self, text: &str) -> bool {
        self.officer.is_officer_line(text)
    }

    /// Assigns exactly one role to `line`. Surrounding whitespace is ignored.
    #[must_use]
    pub fn classify<'a>(&self, line: &'a str) -> LineClass<'a> {
        let line = line.trim();

        if let Some(m) = REGISTRATION_ID_RE.find(line) {
            return LineClass::RegistrationId {
                id: m.as_str(),
                remainder: line[m.end()..].trim(),
            };
        }

        if let Some(m) = find_phone(line) {
            return LineClass::Phone(m.as_str());
        }

        if !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit()) {
            return LineClass::PureSerial;
        }

        if self.is_officer_line(line) {
            return LineClass::Noise;
        }

        LineClass::NameFragment(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(line: &str) -> LineClass<'_> {
        LineClassifier::<OfficerMarker>::default().classify(line)
    }

    #[test]
    fn detects_registration_id_with_remainder() {
        assert_eq!(
            classify("27ABCDE1234F1Z5 M/S ACME TRADERS"),
            LineClass::RegistrationId {
                id: "27ABCDE1234F1Z5",
                remainder: "M/S ACME TRADERS",
            }
        );
    }

    #[test]
    fn registration_id_may_follow_a_serial() {
        assert_eq!(
            classify("12 27ABCDE1234F1Z5"),
            LineClass::RegistrationId {
                id: "27ABCDE1234F1Z5",
                remainder: "",
            }
        );
    }

    #[test]
    fn registration_id_wins_over_phone() {
        assert_eq!(
            classify("27ABCDE1234F1Z5 ACME 9876543210"),
            LineClass::RegistrationId {
                id: "27ABCDE1234F1Z5",
                remainder: "ACME 9876543210",
            }
        );
    }

    #[test]
    fn detects_phone_anywhere_in_line() {
        assert_eq!(classify("Mob: 9876543210"), LineClass::Phone("9876543210"));
        assert_eq!(classify("9876543210"), LineClass::Phone("9876543210"));
    }

    #[test]
    fn short_digit_runs_are_serials() {
        assert_eq!(classify("17"), LineClass::PureSerial);
        assert_eq!(classify("123456789"), LineClass::PureSerial);
    }

    #[test]
    fn officer_marker_is_noise() {
        assert_eq!(classify("RAMESH KUMAR JI"), LineClass::Noise);
    }

    #[test]
    fn officer_marker_does_not_hide_a_phone() {
        assert_eq!(
            classify("RAMESH JI 9876543210"),
            LineClass::Phone("9876543210")
        );
    }

    #[test]
    fn everything_else_is_a_name_fragment() {
        assert_eq!(
            classify("  ENTERPRISES PVT LTD "),
            LineClass::NameFragment("ENTERPRISES PVT LTD")
        );
    }

    #[test]
    fn custom_predicate_replaces_marker() {
        let classifier = LineClassifier::new(|line: &str| line.starts_with("SHRI "));
        assert_eq!(classifier.classify("SHRI GUPTA"), LineClass::Noise);
        assert_eq!(
            classifier.classify("RAMESH JI"),
            LineClass::NameFragment("RAMESH JI")
        );
    }

    #[test]
    fn configured_marker_is_used() {
        let classifier = LineClassifier::with_marker("(STO)");
        assert_eq!(classifier.classify("A. SHARMA (STO)"), LineClass::Noise);
        assert_eq!(
            classifier.classify("RAMESH JI"),
            LineClass::NameFragment("RAMESH JI")
        );
    }

    #[test]
    fn default_marker_is_ji() {
        let marker = OfficerMarker::default();
        assert!(marker.is_officer_line("SUNIL JI"));
        assert!(!marker.is_officer_line("ACME TRADERS"));
    }
}
