//! Row-based extraction for spreadsheet exports.
//!
//! Spreadsheet exports of the same report come with different column
//! orders, so columns are located by header text first:
//!
//! | Field           | Header contains (first hit wins)      |
//! |-----------------|----------------------------------------|
//! | registration id | `GSTIN`                                |
//! | name            | `TRADE NAME`, `NAME`, `BUSINESS`       |
//! | phone           | `MOBILE`, `PHONE`, `CONTACT`           |
//!
//! Anything not found falls back to the fixed positions in
//! [`TabularConfig`]. Each data row yields at most one candidate.

use gst_contacts_contact_models::{CandidateContact, is_registration_id, is_valid_phone};

use crate::ExtractError;
use crate::config::TabularConfig;
use crate::normalize::normalize_name;

const REGISTRATION_HEADERS: &[&str] = &["GSTIN"];
const NAME_HEADERS: &[&str] = &["TRADE NAME", "NAME", "BUSINESS"];
const PHONE_HEADERS: &[&str] = &["MOBILE", "PHONE", "CONTACT"];

/// Resolved zero-based column positions for one sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    /// Column read for the GSTIN.
    pub registration: usize,
    /// Column read for the trade name.
    pub name: usize,
    /// Column tried first for the phone number.
    pub phone: usize,
}

/// Finds the first header cell containing one of `needles`, trying the
/// needles in priority order and never returning `exclude`.
fn find_column(header: &[String], needles: &[&str], exclude: Option<usize>) -> Option<usize> {
    let upper: Vec<String> = header.iter().map(|cell| cell.trim().to_uppercase()).collect();

    needles.iter().find_map(|needle| {
        upper
            .iter()
            .enumerate()
            .find(|(i, cell)| Some(*i) != exclude && cell.contains(needle))
            .map(|(i, _)| i)
    })
}

/// Locates the GSTIN, name and phone columns from the header row.
#[must_use]
pub fn locate_columns(header: &[String], fallback: &TabularConfig) -> ColumnLayout {
    let registration = find_column(header, REGISTRATION_HEADERS, None);
    let name = find_column(header, NAME_HEADERS, registration);
    let phone = find_column(header, PHONE_HEADERS, registration);

    if registration.is_none() || name.is_none() || phone.is_none() {
        log::debug!(
            "Header lookup incomplete (gstin: {registration:?}, name: {name:?}, phone: {phone:?}); using fixed positions for the rest"
        );
    }

    ColumnLayout {
        registration: registration.unwrap_or(fallback.registration_column),
        name: name.unwrap_or(fallback.name_column),
        phone: phone.unwrap_or(fallback.phone_column),
    }
}

/// Reads a phone number out of one cell.
///
/// Accepts exactly ten digits after trimming; numeric cells rendered as
/// floats (`9876543210.0`) are accepted too.
#[must_use]
pub fn phone_from_cell(cell: &str) -> Option<String> {
    let value = cell.trim();
    let value = value.strip_suffix(".0").unwrap_or(value);
    is_valid_phone(value).then(|| value.to_owned())
}

/// Turns data rows (header at index 0) into raw candidates.
///
/// Returns the candidates in row order, not yet deduplicated.
#[must_use]
pub fn extract_rows(rows: &[Vec<String>], fallback: &TabularConfig) -> Vec<CandidateContact> {
    let Some((header, data)) = rows.split_first() else {
        return Vec::new();
    };
    let layout = locate_columns(header, fallback);
    log::debug!("Using column layout {layout:?}");

    let mut candidates = Vec::new();

    for (index, row) in data.iter().enumerate() {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let phone = row
            .get(layout.phone)
            .and_then(|cell| phone_from_cell(cell))
            .or_else(|| row.iter().find_map(|cell| phone_from_cell(cell)));

        let Some(phone) = phone else {
            log::debug!("Row {}: no ten-digit phone, skipping", index + 1);
            continue;
        };

        let name = row
            .get(layout.name)
            .map(|cell| normalize_name(cell))
            .unwrap_or_default();

        let registration_id = row
            .get(layout.registration)
            .map(|cell| cell.trim().to_uppercase())
            .filter(|id| is_registration_id(id))
            .unwrap_or_default();

        candidates.push(CandidateContact::new(&name, &phone, &registration_id));
    }

    candidates
}

/// Converts a JSON row matrix into string cells.
///
/// Cells may be strings, numbers, booleans or `null` (read as an empty
/// cell).
///
/// # Errors
///
/// Returns [`ExtractError::InvalidShape`] if `value` is not an array of
/// arrays of scalars.
pub fn rows_from_json(value: &serde_json::Value) -> Result<Vec<Vec<String>>, ExtractError> {
    let serde_json::Value::Array(rows) = value else {
        return Err(ExtractError::InvalidShape(format!(
            "expected an array of rows, found {}",
            json_kind(value)
        )));
    };

    rows.iter()
        .enumerate()
        .map(|(row_index, row)| {
            let serde_json::Value::Array(cells) = row else {
                return Err(ExtractError::InvalidShape(format!(
                    "row {row_index} is {}, expected an array of cells",
                    json_kind(row)
                )));
            };
            cells
                .iter()
                .enumerate()
                .map(|(col, cell)| match cell {
                    serde_json::Value::Null => Ok(String::new()),
                    serde_json::Value::String(s) => Ok(s.clone()),
                    serde_json::Value::Number(n) => Ok(n.to_string()),
                    serde_json::Value::Bool(b) => Ok(b.to_string()),
                    other => Err(ExtractError::InvalidShape(format!(
                        "cell ({row_index}, {col}) is {}, expected a scalar",
                        json_kind(other)
                    ))),
                })
                .collect::<Result<Vec<String>, ExtractError>>()
        })
        .collect()
}

const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|&c| c.to_owned()).collect()
    }

    #[test]
    fn extracts_from_standard_export() {
        let rows = vec![
            row(&["SR", "GSTIN", "TRADE NAME", "STATUS", "", "OFFICER", "MOBILE"]),
            row(&[
                "1",
                "27ABCDE1234F1Z5",
                "M/S ACME",
                "FILED",
                "",
                "OFFICER JI",
                "9876543210",
            ]),
        ];
        let out = extract_rows(&rows, &TabularConfig::default());
        assert_eq!(
            out,
            vec![CandidateContact::new("ACME", "9876543210", "27ABCDE1234F1Z5")]
        );
    }

    #[test]
    fn locates_columns_case_insensitively_in_any_order() {
        let header = row(&["Mobile No", "Business Name", "gstin"]);
        let layout = locate_columns(&header, &TabularConfig::default());
        assert_eq!(
            layout,
            ColumnLayout {
                registration: 2,
                name: 1,
                phone: 0,
            }
        );
    }

    #[test]
    fn trade_name_beats_officer_name() {
        let header = row(&["OFFICER NAME", "GSTIN", "TRADE NAME", "PHONE"]);
        let layout = locate_columns(&header, &TabularConfig::default());
        assert_eq!(layout.name, 2);
        assert_eq!(layout.phone, 3);
    }

    #[test]
    fn missing_headers_fall_back_to_fixed_positions() {
        let header = row(&["A", "B", "C", "D", "E", "F", "G"]);
        let layout = locate_columns(&header, &TabularConfig::default());
        assert_eq!(
            layout,
            ColumnLayout {
                registration: 1,
                name: 2,
                phone: 6,
            }
        );
    }

    #[test]
    fn scans_row_when_phone_column_is_wrong() {
        let rows = vec![
            row(&["GSTIN", "NAME", "MOBILE"]),
            row(&["27ABCDE1234F1Z5", "ACME", "N/A", "9876543210"]),
        ];
        let out = extract_rows(&rows, &TabularConfig::default());
        assert_eq!(out[0].phone_number, "9876543210");
    }

    #[test]
    fn skips_rows_without_phone_and_blank_rows() {
        let rows = vec![
            row(&["GSTIN", "NAME", "MOBILE"]),
            row(&["27ABCDE1234F1Z5", "ACME", "98765"]),
            row(&["", "", ""]),
            row(&["29PQRST6789K1Z2", "BHARAT", "9123456780"]),
        ];
        let out = extract_rows(&rows, &TabularConfig::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "BHARAT");
    }

    #[test]
    fn absent_name_defaults_to_unknown_and_bad_gstin_is_dropped() {
        let rows = vec![
            row(&["GSTIN", "NAME", "MOBILE"]),
            row(&["NOT-A-GSTIN", "", "9876543210"]),
        ];
        let out = extract_rows(&rows, &TabularConfig::default());
        assert_eq!(out, vec![CandidateContact::new("Unknown", "9876543210", "")]);
    }

    #[test]
    fn accepts_float_rendered_phone_and_lowercase_gstin() {
        let rows = vec![
            row(&["GSTIN", "NAME", "MOBILE"]),
            row(&["27abcde1234f1z5", "ACME", "9876543210.0"]),
        ];
        let out = extract_rows(&rows, &TabularConfig::default());
        assert_eq!(
            out,
            vec![CandidateContact::new("ACME", "9876543210", "27ABCDE1234F1Z5")]
        );
    }

    #[test]
    fn header_only_sheet_yields_nothing() {
        let rows = vec![row(&["GSTIN", "NAME", "MOBILE"])];
        assert!(extract_rows(&rows, &TabularConfig::default()).is_empty());
        assert!(extract_rows(&[], &TabularConfig::default()).is_empty());
    }

    #[test]
    fn converts_json_matrix() {
        let value = serde_json::json!([
            ["GSTIN", "MOBILE"],
            ["27ABCDE1234F1Z5", 9_876_543_210_u64, null]
        ]);
        let rows = rows_from_json(&value).unwrap();
        assert_eq!(rows[1], row(&["27ABCDE1234F1Z5", "9876543210", ""]));
    }

    #[test]
    fn rejects_non_matrix_json() {
        assert!(matches!(
            rows_from_json(&serde_json::json!({"rows": []})),
            Err(ExtractError::InvalidShape(_))
        ));
        assert!(matches!(
            rows_from_json(&serde_json::json!([["a"], "b"])),
            Err(ExtractError::InvalidShape(_))
        ));
        assert!(matches!(
            rows_from_json(&serde_json::json!([[{"a": 1}]])),
            Err(ExtractError::InvalidShape(_))
        ));
    }
}
