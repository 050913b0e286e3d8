#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Contact record types shared across the GST contacts toolkit.
//!
//! [`CandidateContact`] is the only thing the extraction engine hands to the
//! rest of the system. The field predicates ([`is_valid_phone`] and
//! [`is_registration_id`]) live here so that the engine, the document loaders
//! and the contact store all agree on what a valid record looks like.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Name assigned to a contact when no usable name text was recovered.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Number of digits in a phone number.
pub const PHONE_DIGITS: usize = 10;

/// Unanchored GSTIN pattern: 2 digits, 5 letters, 4 digits, 1 letter,
/// 1 alphanumeric, a literal `Z`, 1 alphanumeric.
pub const REGISTRATION_ID_PATTERN: &str = r"[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][0-9A-Z]Z[0-9A-Z]";

static REGISTRATION_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{REGISTRATION_ID_PATTERN}$")).expect("valid regex")
});

/// Returns `true` if `value` is exactly ten ASCII digits.
#[must_use]
pub fn is_valid_phone(value: &str) -> bool {
    value.len() == PHONE_DIGITS && value.bytes().all(|b| b.is_ascii_digit())
}

/// Returns `true` if `value` is a complete 15-character GSTIN.
#[must_use]
pub fn is_registration_id(value: &str) -> bool {
    REGISTRATION_ID_RE.is_match(value)
}

/// A contact recovered from a source document.
///
/// `phone_number` is the natural key: one extraction batch never contains
/// two candidates with the same phone number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateContact {
    /// Display name, or [`UNKNOWN_NAME`] when none was found.
    pub name: String,
    /// Exactly ten ASCII digits.
    pub phone_number: String,
    /// GSTIN of the business, or an empty string if absent.
    #[serde(default)]
    pub registration_id: String,
}

impl CandidateContact {
    /// Builds a candidate, substituting [`UNKNOWN_NAME`] for a blank name.
    #[must_use]
    pub fn new(name: &str, phone_number: &str, registration_id: &str) -> Self {
        let name = name.trim();
        Self {
            name: if name.is_empty() {
                UNKNOWN_NAME.to_owned()
            } else {
                name.to_owned()
            },
            phone_number: phone_number.to_owned(),
            registration_id: registration_id.to_owned(),
        }
    }

    /// Whether the candidate satisfies the output invariant.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        is_valid_phone(&self.phone_number)
    }
}
