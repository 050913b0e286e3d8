#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Document loading for GST contact extraction.
//!
//! Registration reports arrive as PDFs, plain-text dumps of a PDF's text
//! layer, or spreadsheet exports (CSV, TSV, JSON row matrices). This crate
//! reads a file from disk, picks the matching reader by extension, and
//! hands the result to a [`gst_contacts_extract::Extractor`].
//!
//! The primary entry points are [`extract_file`] for a single document and
//! [`batch::extract_files`] for several at once.

pub mod batch;
pub mod progress;
pub mod read;

use std::path::Path;
use std::str::FromStr as _;

use gst_contacts_extract::classify::OfficerPredicate;
use gst_contacts_extract::{ExtractError, Extraction, Extractor};
use strum_macros::{AsRefStr, Display, EnumString};

/// Errors specific to loading a document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// PDF text extraction failed.
    #[error("PDF extraction error: {0}")]
    Pdf(String),

    /// A CSV/TSV record could not be decoded.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON document could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The extraction engine rejected the input.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// The file extension does not map to a supported format.
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),
}

/// Supported input formats, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DocumentKind {
    /// PDF report; its text layer is extracted.
    Pdf,
    /// Text layer already dumped to a file.
    Txt,
    /// Comma-separated spreadsheet export.
    Csv,
    /// Tab-separated spreadsheet export.
    Tsv,
    /// JSON array of row arrays.
    Json,
}

impl DocumentKind {
    /// Determines the format from a file's extension.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::UnsupportedFormat`] if the extension is
    /// missing or unknown.
    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| DocumentError::UnsupportedFormat(path.display().to_string()))?;

        Self::from_str(ext).map_err(|_| DocumentError::UnsupportedFormat(ext.to_owned()))
    }
}

/// A loaded document, before extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    /// Free-form text layer.
    Text(String),
    /// Row matrix; the header row, if any, is at index 0.
    Rows(Vec<Vec<String>>),
}

/// Decodes file bytes of the given kind.
///
/// # Errors
///
/// Returns a [`DocumentError`] if the bytes cannot be decoded as `kind`.
pub fn decode_document(kind: DocumentKind, bytes: &[u8]) -> Result<Document, DocumentError> {
    Ok(match kind {
        DocumentKind::Pdf => Document::Text(read::read_pdf_text(bytes)?),
        DocumentKind::Txt => Document::Text(read::read_plain_text(bytes)),
        DocumentKind::Csv => Document::Rows(read::read_csv_rows(bytes, b',')?),
        DocumentKind::Tsv => Document::Rows(read::read_csv_rows(bytes, b'\t')?),
        DocumentKind::Json => Document::Rows(read::read_json_rows(bytes)?),
    })
}

/// Reads and decodes a document from disk.
///
/// # Errors
///
/// Returns a [`DocumentError`] if the format is unsupported, the file
/// cannot be read, or its contents cannot be decoded.
pub fn load_document(path: &Path) -> Result<Document, DocumentError> {
    let kind = DocumentKind::from_path(path)?;
    let bytes = std::fs::read(path)?;

    log::debug!("Loaded {} bytes from {} as {kind}", bytes.len(), path.display());

    decode_document(kind, &bytes)
}

/// Runs a decoded document through the matching pipeline.
#[must_use]
pub fn extract_document<P: OfficerPredicate>(
    document: &Document,
    extractor: &Extractor<P>,
) -> Extraction {
    match document {
        Document::Text(text) => extractor.extract_text(text),
        Document::Rows(rows) => extractor.extract_rows(rows),
    }
}

/// Loads a document from disk and extracts its contacts.
///
/// # Errors
///
/// Returns a [`DocumentError`] if the document cannot be loaded or has an
/// unusable shape.
pub fn extract_file<P: OfficerPredicate>(
    path: &Path,
    extractor: &Extractor<P>,
) -> Result<Extraction, DocumentError> {
    let document = load_document(path)?;
    let extraction = extract_document(&document, extractor);

    log::info!("{}: {} contacts", path.display(), extraction.len());

    Ok(extraction)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;

    /// Writes `contents` to a uniquely named file in the temp dir.
    pub fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gst_contacts_document_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::temp_file;
    use super::*;

    #[test]
    fn kind_from_extension_is_case_insensitive() {
        assert_eq!(
            DocumentKind::from_path(Path::new("report.PDF")).unwrap(),
            DocumentKind::Pdf
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("export.tsv")).unwrap(),
            DocumentKind::Tsv
        );
    }

    #[test]
    fn unknown_or_missing_extension_is_unsupported() {
        assert!(matches!(
            DocumentKind::from_path(Path::new("sheet.xlsx")),
            Err(DocumentError::UnsupportedFormat(ext)) if ext == "xlsx"
        ));
        assert!(matches!(
            DocumentKind::from_path(Path::new("README")),
            Err(DocumentError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn kind_displays_as_extension() {
        assert_eq!(DocumentKind::Json.to_string(), "json");
    }

    #[test]
    fn extracts_text_file() {
        let path = temp_file(
            "report.txt",
            b"HEADER\n27ABCDE1234F1Z5 M/S ACME TRADERS\n9876543210\n",
        );
        let extraction = extract_file(&path, &Extractor::default()).unwrap();
        assert_eq!(extraction.contacts().len(), 1);
        assert_eq!(extraction.contacts()[0].name, "ACME TRADERS");
    }

    #[test]
    fn extracts_csv_file() {
        let path = temp_file(
            "export.csv",
            b"GSTIN,TRADE NAME,MOBILE\n27ABCDE1234F1Z5,ACME,9876543210\n29PQRST6789K1Z2,BHARAT,9123456780\n",
        );
        let extraction = extract_file(&path, &Extractor::default()).unwrap();
        let phones: Vec<&str> = extraction
            .contacts()
            .iter()
            .map(|c| c.phone_number.as_str())
            .collect();
        assert_eq!(phones, vec!["9876543210", "9123456780"]);
    }

    #[test]
    fn extracts_json_file() {
        let path = temp_file(
            "export.json",
            br#"[["GSTIN","NAME","MOBILE"],["27ABCDE1234F1Z5","ACME",9876543210]]"#,
        );
        let extraction = extract_file(&path, &Extractor::default()).unwrap();
        assert_eq!(extraction.contacts()[0].phone_number, "9876543210");
    }

    #[test]
    fn json_object_is_a_shape_error() {
        let path = temp_file("export.json", br#"{"rows": []}"#);
        assert!(matches!(
            extract_file(&path, &Extractor::default()),
            Err(DocumentError::Extract(ExtractError::InvalidShape(_)))
        ));
    }

    #[test]
    fn empty_text_file_is_an_empty_document() {
        let path = temp_file("empty.txt", b"  \n\n");
        assert_eq!(
            extract_file(&path, &Extractor::default()).unwrap(),
            Extraction::EmptyDocument
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join("gst_contacts_document_missing.txt");
        assert!(matches!(
            extract_file(&path, &Extractor::default()),
            Err(DocumentError::Io(_))
        ));
    }
}
