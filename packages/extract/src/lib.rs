#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Contact extraction engine for GST registration reports.
//!
//! Registration reports reach us either as the text layer of a PDF or as
//! spreadsheet rows, and neither has a stable layout. This crate turns
//! both into a deduplicated list of [`CandidateContact`]s:
//!
//! - **Text**: lines are classified ([`classify`]) and folded through the
//!   record state machine in [`reassemble`], which stitches wrapped names
//!   and displaced phone numbers back onto the right GSTIN.
//! - **Rows**: columns are located by header text ([`tabular`]) and each
//!   row maps to at most one candidate.
//!
//! Both paths clean names with [`normalize::normalize_name`] and finish in
//! [`dedup::dedup_contacts`]. The engine is synchronous and holds no shared
//! mutable state, so one [`Extractor`] can serve any number of documents.
//!
//! ```
//! use gst_contacts_extract::Extractor;
//!
//! let text = "HEADER\n27ABCDE1234F1Z5 M/S ACME TRADERS\n9876543210\n";
//! let extraction = Extractor::default().extract_text(text);
//!
//! let contacts = extraction.contacts();
//! assert_eq!(contacts.len(), 1);
//! assert_eq!(contacts[0].name, "ACME TRADERS");
//! assert_eq!(contacts[0].registration_id, "27ABCDE1234F1Z5");
//! ```

pub mod classify;
pub mod config;
pub mod dedup;
pub mod normalize;
pub mod reassemble;
pub mod tabular;

pub use config::{ExtractionConfig, TabularConfig};
pub use gst_contacts_contact_models::CandidateContact;
pub use tabular::rows_from_json;

use classify::{LineClass, LineClassifier, OfficerMarker, OfficerPredicate};
use reassemble::Reassembler;

/// Errors raised for structurally unusable input or configuration.
///
/// Data-quality problems (no matches, malformed rows) are never errors;
/// they show up as [`Extraction::NoContacts`] or skipped records.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The input does not have the expected shape.
    #[error("Invalid input shape: {0}")]
    InvalidShape(String),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what went wrong.
        message: String,
    },

    /// The configuration file is not valid TOML.
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Reading the configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of running one document through the engine.
///
/// Separates "the document was empty" from "the document had content but
/// nothing in it could be used", so callers can tell users which one
/// happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// No non-blank lines (or no data rows) to look at.
    EmptyDocument,
    /// Content was scanned but no valid contact came out of it.
    NoContacts {
        /// Number of lines or data rows examined.
        scanned: usize,
    },
    /// Validated, deduplicated contacts in document order.
    Contacts(Vec<CandidateContact>),
}

impl Extraction {
    /// Validates and deduplicates `raw` and picks the matching outcome.
    #[must_use]
    pub fn from_candidates(scanned: usize, raw: Vec<CandidateContact>) -> Self {
        if scanned == 0 {
            return Self::EmptyDocument;
        }
        let contacts = dedup::dedup_contacts(raw);
        if contacts.is_empty() {
            Self::NoContacts { scanned }
        } else {
            Self::Contacts(contacts)
        }
    }

    /// The extracted contacts (empty for the two no-result outcomes).
    #[must_use]
    pub fn contacts(&self) -> &[CandidateContact] {
        match self {
            Self::Contacts(contacts) => contacts,
            Self::EmptyDocument | Self::NoContacts { .. } => &[],
        }
    }

    /// Consumes the outcome, returning its contacts.
    #[must_use]
    pub fn into_contacts(self) -> Vec<CandidateContact> {
        match self {
            Self::Contacts(contacts) => contacts,
            Self::EmptyDocument | Self::NoContacts { .. } => Vec::new(),
        }
    }

    /// Number of contacts extracted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contacts().len()
    }

    /// Whether no contacts were extracted, for either reason.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contacts().is_empty()
    }
}

/// Splits document text into trimmed, non-blank lines.
#[must_use]
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Runs both pipelines with one configuration and officer predicate.
#[derive(Debug, Clone)]
pub struct Extractor<P = OfficerMarker> {
    config: ExtractionConfig,
    classifier: LineClassifier<P>,
}

impl Default for Extractor<OfficerMarker> {
    fn default() -> Self {
        let config = ExtractionConfig::default();
        let classifier = LineClassifier::with_marker(&config.officer_marker);
        Self { config, classifier }
    }
}

impl Extractor<OfficerMarker> {
    /// Creates an extractor whose officer predicate is the configured
    /// marker substring.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidConfig`] if `config` fails
    /// validation.
    pub fn new(config: ExtractionConfig) -> Result<Self, ExtractError> {
        config.validate()?;
        let classifier = LineClassifier::with_marker(&config.officer_marker);
        Ok(Self { config, classifier })
    }
}

impl<P: OfficerPredicate> Extractor<P> {
    /// Creates an extractor with a custom officer predicate. The
    /// configured `officer_marker` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidConfig`] if `config` fails
    /// validation.
    pub fn with_officer_predicate(
        config: ExtractionConfig,
        predicate: P,
    ) -> Result<Self, ExtractError> {
        config.validate()?;
        Ok(Self {
            config,
            classifier: LineClassifier::new(predicate),
        })
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Lines the text pipeline actually looks at, after blank-line removal
    /// and header skipping.
    fn data_lines<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut lines = split_lines(text);
        let skip = self.config.skip_header_lines.min(lines.len());
        lines.drain(..skip);
        lines
    }

    /// Extracts contacts from the text layer of a document.
    #[must_use]
    pub fn extract_text(&self, text: &str) -> Extraction {
        let lines = self.data_lines(text);
        let raw = Reassembler::new(&self.classifier, self.config.lookahead).reassemble(&lines);
        log::debug!(
            "Reassembled {} raw candidates from {} lines",
            raw.len(),
            lines.len()
        );
        Extraction::from_candidates(lines.len(), raw)
    }

    /// Extracts contacts from a row matrix whose first row is the header.
    #[must_use]
    pub fn extract_rows(&self, rows: &[Vec<String>]) -> Extraction {
        let data_rows = rows.len().saturating_sub(1);
        let raw = tabular::extract_rows(rows, &self.config.tabular);
        log::debug!("Read {} raw candidates from {data_rows} rows", raw.len());
        Extraction::from_candidates(data_rows, raw)
    }

    /// Extracts contacts from a JSON row matrix.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidShape`] if `value` is not an array of
    /// arrays of scalars.
    pub fn extract_json_rows(&self, value: &serde_json::Value) -> Result<Extraction, ExtractError> {
        let rows = rows_from_json(value)?;
        Ok(self.extract_rows(&rows))
    }

    /// Classifies every line the text pipeline would look at.
    #[must_use]
    pub fn classify_text<'a>(&self, text: &'a str) -> Vec<(&'a str, LineClass<'a>)> {
        self.data_lines(text)
            .into_iter()
            .map(|line| (line, self.classifier.classify(line)))
            .collect()
    }
}
