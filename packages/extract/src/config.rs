//! Tunable extraction settings.
//!
//! Every field has a default, so an empty TOML document (or no file at all)
//! yields the stock heuristics:
//!
//! ```toml
//! lookahead = 3
//! officer_marker = "JI"
//! skip_header_lines = 0
//!
//! [tabular]
//! registration_column = 1
//! name_column = 2
//! phone_column = 6
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::ExtractError;

/// Default number of lines scanned ahead for a wrapped phone number.
pub const DEFAULT_LOOKAHEAD: usize = 3;

/// Upper bound accepted for [`ExtractionConfig::lookahead`].
pub const MAX_LOOKAHEAD: usize = 50;

/// Default substring identifying an officer-name line.
pub const DEFAULT_OFFICER_MARKER: &str = "JI";

/// Settings for both extraction pipelines.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractionConfig {
    /// How many lines past a record to search for its phone number. A
    /// record with no phone inside this window is dropped.
    pub lookahead: usize,
    /// Literal substring that marks an officer-name line.
    pub officer_marker: String,
    /// Number of leading non-blank text lines to drop before classification.
    pub skip_header_lines: usize,
    /// Fixed column positions used when header lookup fails.
    pub tabular: TabularConfig,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            lookahead: DEFAULT_LOOKAHEAD,
            officer_marker: DEFAULT_OFFICER_MARKER.to_owned(),
            skip_header_lines: 0,
            tabular: TabularConfig::default(),
        }
    }
}

/// Zero-based fallback column positions for spreadsheet input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TabularConfig {
    /// Column holding the GSTIN.
    pub registration_column: usize,
    /// Column holding the trade name.
    pub name_column: usize,
    /// Column holding the mobile number.
    pub phone_column: usize,
}

impl Default for TabularConfig {
    fn default() -> Self {
        Self {
            registration_column: 1,
            name_column: 2,
            phone_column: 6,
        }
    }
}

impl ExtractionConfig {
    /// Parses and validates a TOML configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Toml`] if the document does not parse, or
    /// [`ExtractError::InvalidConfig`] if a value is out of range.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ExtractError> {
        let config: Self = toml::de::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`Self::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ExtractError> {
        let contents = std::fs::read_to_string(path)?;
        log::debug!("Loaded extraction config from {}", path.display());
        Self::from_toml_str(&contents)
    }

    /// Checks that every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidConfig`] if `lookahead` exceeds
    /// [`MAX_LOOKAHEAD`] or `officer_marker` is blank.
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.lookahead > MAX_LOOKAHEAD {
            return Err(ExtractError::InvalidConfig {
                message: format!(
                    "lookahead {} exceeds the maximum of {MAX_LOOKAHEAD}",
                    self.lookahead
                ),
            });
        }
        if self.officer_marker.trim().is_empty() {
            return Err(ExtractError::InvalidConfig {
                message: "officer_marker must not be blank".to_owned(),
            });
        }
        Ok(())
    }
}
