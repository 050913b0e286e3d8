#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for GST contact extraction.
//!
//! ```text
//! gst_contacts extract report.pdf export.csv [--format json|csv|table]
//! gst_contacts classify report.pdf
//! gst_contacts import report.pdf [--store contacts.json]
//! gst_contacts list [--status pending]
//! gst_contacts mark 9876543210 called
//! gst_contacts remove 9876543210
//! gst_contacts archive
//! gst_contacts archives [<id>]
//! ```
//!
//! Running `gst_contacts` with no subcommand enters interactive mode.
//!
//! Uses `indicatif-log-bridge` (via [`gst_contacts_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.

mod interactive;
mod output;

use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use gst_contacts_cli_utils::{IndicatifProgress, MultiProgress};
use gst_contacts_document::batch::{BatchReport, extract_files};
use gst_contacts_document::{Document, load_document};
use gst_contacts_extract::{Extraction, ExtractionConfig, Extractor};
use gst_contacts_store::{ContactStatus, ContactStore as _, MemoryContactStore, StoreError};
use output::{OutputFormat, class_label, write_candidates, write_stored};

/// Default location of the contact store snapshot.
const DEFAULT_STORE_PATH: &str = "contacts.json";

#[derive(Parser)]
#[command(
    name = "gst_contacts",
    about = "Extract business contacts from GST registration reports"
)]
struct Cli {
    /// Contact store file
    #[arg(long, global = true, env = "GST_CONTACTS_STORE", default_value = DEFAULT_STORE_PATH)]
    store: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct EngineArgs {
    /// TOML file with extraction settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Lines to scan past a GSTIN for its phone number (overrides config)
    #[arg(long)]
    lookahead: Option<usize>,
}

impl EngineArgs {
    fn extractor(&self) -> Result<Extractor, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => ExtractionConfig::load(path)?,
            None => ExtractionConfig::default(),
        };
        if let Some(lookahead) = self.lookahead {
            config.lookahead = lookahead;
        }
        log::debug!("Extraction config: {config:?}");
        Ok(Extractor::new(config)?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract contacts from documents and print them
    Extract {
        /// PDF, TXT, CSV, TSV or JSON documents
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Print how each line of a text document is classified
    Classify {
        /// PDF or TXT document
        file: PathBuf,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Extract contacts and merge them into the store
    Import {
        /// PDF, TXT, CSV, TSV or JSON documents
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// List stored contacts, uncalled first
    List {
        /// Only show contacts with this status
        #[arg(long)]
        status: Option<ContactStatus>,
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Set the call status of a contact
    Mark {
        /// Ten-digit phone number
        phone: String,
        /// `pending` or `called`
        status: ContactStatus,
    },
    /// Delete a contact from the store
    Remove {
        /// Ten-digit phone number
        phone: String,
    },
    /// Snapshot the current contact list
    Archive,
    /// List archives, or show one
    Archives {
        /// Archive ID
        id: Option<uuid::Uuid>,
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = gst_contacts_cli_utils::init_logger();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run(&multi, &cli.store);
    };

    match command {
        Commands::Extract {
            files,
            format,
            engine,
        } => {
            let report = run_batch(&multi, &files, &engine.extractor()?);
            exit_if_all_failed(&report);
            write_candidates(&mut std::io::stdout().lock(), &report.contacts, format)?;
        }
        Commands::Classify { file, engine } => {
            let extractor = engine.extractor()?;
            let Document::Text(text) = load_document(&file)? else {
                eprintln!("{} is a tabular document; classify only reads text", file.display());
                std::process::exit(1);
            };

            let mut out = std::io::stdout().lock();
            for (index, (line, class)) in extractor.classify_text(&text).iter().enumerate() {
                let (label, detail) = class_label(class);
                writeln!(out, "{:>5} {label:<7} {line}", index + 1)?;
                if !detail.is_empty() {
                    writeln!(out, "{:>13} {detail}", "->")?;
                }
            }
        }
        Commands::Import { files, engine } => {
            let report = run_batch(&multi, &files, &engine.extractor()?);
            exit_if_all_failed(&report);

            let mut store = MemoryContactStore::load(&cli.store)?;
            let summary = store.upsert_batch(&report.contacts, Utc::now());
            store.save(&cli.store)?;

            println!(
                "{} new, {} refreshed, {} skipped ({} total in {})",
                summary.inserted,
                summary.updated,
                summary.skipped,
                store.len(),
                cli.store.display()
            );
        }
        Commands::List { status, format } => {
            let store = MemoryContactStore::load(&cli.store)?;
            let contacts: Vec<_> = store
                .list()
                .into_iter()
                .filter(|c| status.is_none_or(|s| c.status() == s))
                .collect();

            if contacts.is_empty() && format == OutputFormat::Table {
                println!("No contacts found.");
                return Ok(());
            }
            write_stored(&mut std::io::stdout().lock(), &contacts, format)?;
        }
        Commands::Mark { phone, status } => {
            with_store(&cli.store, |store| {
                let contact = store.set_status(&phone, status, Utc::now())?;
                println!("{} ({}) is now {status}", contact.name, contact.phone_number);
                Ok(())
            })?;
        }
        Commands::Remove { phone } => {
            with_store(&cli.store, |store| {
                let contact = store.remove(&phone)?;
                println!("Removed {} ({})", contact.name, contact.phone_number);
                Ok(())
            })?;
        }
        Commands::Archive => {
            with_store(&cli.store, |store| {
                let archive = store.archive(Utc::now());
                println!(
                    "Archived {} contact(s) as {}",
                    archive.contacts.len(),
                    archive.id
                );
                Ok(())
            })?;
        }
        Commands::Archives { id, format } => {
            let store = MemoryContactStore::load(&cli.store)?;
            match id {
                Some(id) => {
                    let archive = store.get_archive(id)?;
                    let contacts: Vec<_> = archive.contacts.iter().collect();
                    write_stored(&mut std::io::stdout().lock(), &contacts, format)?;
                }
                None => {
                    if store.archives().is_empty() {
                        println!("No archives found.");
                        return Ok(());
                    }
                    println!("{:<38} {:<17} CONTACTS", "ID", "CREATED");
                    println!("{}", "-".repeat(66));
                    for archive in store.archives() {
                        println!(
                            "{:<38} {:<17} {}",
                            archive.id,
                            archive.created_at.format("%Y-%m-%d %H:%M"),
                            archive.contacts.len()
                        );
                    }
                }
            }
        }
    }

    Ok(())
}

/// Runs the extractor over `files` with a progress bar and prints a
/// per-document summary to stderr.
fn run_batch(multi: &MultiProgress, files: &[PathBuf], extractor: &Extractor) -> BatchReport {
    let progress = IndicatifProgress::documents_bar(multi, "Extracting contacts");
    let report = extract_files(files, extractor, progress.as_ref());

    for outcome in &report.outcomes {
        let path = outcome.path.display();
        match &outcome.result {
            Ok(Extraction::Contacts(contacts)) => {
                eprintln!("{path}: {} contact(s)", contacts.len());
            }
            Ok(Extraction::EmptyDocument) => eprintln!("{path}: document has no text or rows"),
            Ok(Extraction::NoContacts { scanned }) => {
                eprintln!("{path}: no contacts found in {scanned} line(s)/row(s)");
            }
            Err(e) => eprintln!("{path}: {e}"),
        }
    }

    report
}

/// Exits with status 1 when no document in the batch could be read.
fn exit_if_all_failed(report: &BatchReport) {
    if !report.outcomes.is_empty() && report.failed() == report.outcomes.len() {
        eprintln!("No document could be read");
        std::process::exit(1);
    }
}

/// Loads the store, applies `f`, and saves it back if `f` succeeds.
fn with_store(
    path: &Path,
    f: impl FnOnce(&mut MemoryContactStore) -> Result<(), StoreError>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = MemoryContactStore::load(path)?;
    f(&mut store)?;
    store.save(path)?;
    Ok(())
}
