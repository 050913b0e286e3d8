//! Format-specific readers.
//!
//! Each reader takes the raw file bytes and produces either a text layer
//! (PDF, plain text) or a row matrix (CSV, TSV, JSON). Nothing here knows
//! about contacts.

use gst_contacts_extract::rows_from_json;

use crate::DocumentError;

/// Extracts the text layer of a PDF.
///
/// # Errors
///
/// Returns [`DocumentError::Pdf`] if the PDF cannot be parsed.
pub fn read_pdf_text(bytes: &[u8]) -> Result<String, DocumentError> {
    let text =
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| DocumentError::Pdf(e.to_string()))?;

    log::debug!("Extracted {} chars of text from PDF", text.len());

    Ok(text)
}

/// Decodes a plain-text file, replacing invalid UTF-8 sequences.
#[must_use]
pub fn read_plain_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Reads delimited rows with no header interpretation.
///
/// The header row, if any, stays at index 0 so the tabular extractor can
/// inspect it. Rows may have differing lengths and every cell is trimmed.
///
/// # Errors
///
/// Returns [`DocumentError::Csv`] if a record cannot be decoded.
pub fn read_csv_rows(bytes: &[u8], delimiter: u8) -> Result<Vec<Vec<String>>, DocumentError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(false)
        .from_reader(bytes);

    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(|cell| cell.trim().to_owned()).collect());
    }

    log::debug!("Read {} delimited rows", rows.len());

    Ok(rows)
}

/// Reads a JSON array of row arrays.
///
/// # Errors
///
/// Returns [`DocumentError::Json`] if the bytes are not valid JSON, or
/// [`DocumentError::Extract`] if the JSON is not a row matrix.
pub fn read_json_rows(bytes: &[u8]) -> Result<Vec<Vec<String>>, DocumentError> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    Ok(rows_from_json(&value)?)
}
