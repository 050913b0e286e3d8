//! Rendering of contacts and line classes for the terminal.

use std::io::Write;

use clap::ValueEnum;
use gst_contacts_contact_models::CandidateContact;
use gst_contacts_extract::classify::LineClass;
use gst_contacts_store::StoredContact;

/// Output format for contact lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns for reading.
    #[default]
    Table,
    /// Pretty-printed JSON array.
    Json,
    /// CSV with a header row.
    Csv,
}

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Writes extracted candidates in the requested format.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_candidates(
    out: &mut impl Write,
    contacts: &[CandidateContact],
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Table => {
            writeln!(out, "{:<12} {:<17} NAME", "PHONE", "GSTIN")?;
            writeln!(out, "{}", "-".repeat(60))?;
            for c in contacts {
                writeln!(
                    out,
                    "{:<12} {:<17} {}",
                    c.phone_number, c.registration_id, c.name
                )?;
            }
            writeln!(out, "\n{} contact(s)", contacts.len())?;
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(contacts)?)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record(["name", "phone_number", "registration_id"])?;
            for c in contacts {
                writer.write_record([&c.name, &c.phone_number, &c.registration_id])?;
            }
            writer.flush()?;
        }
    }

    Ok(())
}

/// Writes stored contacts in the requested format.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_stored(
    out: &mut impl Write,
    contacts: &[&StoredContact],
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Table => {
            writeln!(
                out,
                "{:<8} {:<12} {:<17} {:<17} NAME",
                "STATUS", "PHONE", "GSTIN", "CALLED AT"
            )?;
            writeln!(out, "{}", "-".repeat(80))?;
            for c in contacts {
                let called_at = c
                    .call_date
                    .map(|d| d.format(DATE_FORMAT).to_string())
                    .unwrap_or_default();
                writeln!(
                    out,
                    "{:<8} {:<12} {:<17} {:<17} {}",
                    c.status().as_ref(),
                    c.phone_number,
                    c.registration_id,
                    called_at,
                    c.name
                )?;
            }
            writeln!(out, "\n{} contact(s)", contacts.len())?;
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(contacts)?)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record([
                "name",
                "phone_number",
                "registration_id",
                "status",
                "call_date",
            ])?;
            for c in contacts {
                let call_date = c.call_date.map(|d| d.to_rfc3339()).unwrap_or_default();
                writer.write_record([
                    c.name.as_str(),
                    c.phone_number.as_str(),
                    c.registration_id.as_str(),
                    c.status().as_ref(),
                    call_date.as_str(),
                ])?;
            }
            writer.flush()?;
        }
    }

    Ok(())
}

/// Short label and detail text for a classified line.
#[must_use]
pub fn class_label(class: &LineClass<'_>) -> (&'static str, String) {
    match class {
        LineClass::RegistrationId { id, remainder } => ("GSTIN", format!("{id} | {remainder}")),
        LineClass::Phone(number) => ("PHONE", (*number).to_owned()),
        LineClass::PureSerial => ("SERIAL", String::new()),
        LineClass::Noise => ("NOISE", String::new()),
        LineClass::NameFragment(text) => ("NAME", (*text).to_owned()),
    }
}
