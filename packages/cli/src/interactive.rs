//! Menu-driven mode for working through the call list.
//!
//! Loads the store once, loops over a `dialoguer` menu, and saves after
//! every change.

use std::path::{Path, PathBuf};

use chrono::Utc;
use dialoguer::{Confirm, Input, Select};
use gst_contacts_cli_utils::MultiProgress;
use gst_contacts_extract::Extractor;
use gst_contacts_store::{ContactStatus, ContactStore as _, MemoryContactStore, StoredContact};

use crate::output::{OutputFormat, write_stored};

/// Top-level actions in the interactive menu.
enum Action {
    Import,
    List,
    ToggleCalled,
    Remove,
    Archive,
    ViewArchive,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Import,
        Self::List,
        Self::ToggleCalled,
        Self::Remove,
        Self::Archive,
        Self::ViewArchive,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Import => "Import documents",
            Self::List => "Show contacts",
            Self::ToggleCalled => "Mark a contact called / pending",
            Self::Remove => "Remove a contact",
            Self::Archive => "Archive current contacts",
            Self::ViewArchive => "View an archive",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the interactive menu against the store at `store_path`.
///
/// # Errors
///
/// Returns an error if the store cannot be loaded or saved, or a prompt
/// fails.
pub fn run(multi: &MultiProgress, store_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = MemoryContactStore::load(store_path)?;
    let extractor = Extractor::default();
    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    println!("GST Contacts ({})", store_path.display());
    println!();

    loop {
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        let changed = match Action::ALL[idx] {
            Action::Import => handle_import(multi, &mut store, &extractor)?,
            Action::List => {
                write_stored(&mut std::io::stdout().lock(), &store.list(), OutputFormat::Table)?;
                false
            }
            Action::ToggleCalled => handle_toggle(&mut store)?,
            Action::Remove => handle_remove(&mut store)?,
            Action::Archive => handle_archive(&mut store)?,
            Action::ViewArchive => {
                handle_view_archive(&store)?;
                false
            }
            Action::Quit => return Ok(()),
        };

        if changed {
            store.save(store_path)?;
        }
        println!();
    }
}

/// One-line label for a contact in pickers.
fn contact_label(contact: &StoredContact) -> String {
    let mark = if contact.called { "x" } else { " " };
    format!("[{mark}] {} {}", contact.phone_number, contact.name)
}

/// Prompts for a contact; `None` if the store is empty.
fn pick_contact(
    store: &MemoryContactStore,
    prompt: &str,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let contacts = store.list();
    if contacts.is_empty() {
        println!("No contacts found.");
        return Ok(None);
    }

    let labels: Vec<String> = contacts.iter().map(|c| contact_label(c)).collect();
    let idx = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(Some(contacts[idx].phone_number.clone()))
}

fn handle_import(
    multi: &MultiProgress,
    store: &mut MemoryContactStore,
    extractor: &Extractor,
) -> Result<bool, Box<dyn std::error::Error>> {
    let input: String = Input::new()
        .with_prompt("Document paths (comma-separated)")
        .interact_text()?;
    let files: Vec<PathBuf> = input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect();

    if files.is_empty() {
        return Ok(false);
    }

    let report = crate::run_batch(multi, &files, extractor);
    let summary = store.upsert_batch(&report.contacts, Utc::now());
    println!(
        "{} new, {} refreshed, {} skipped",
        summary.inserted, summary.updated, summary.skipped
    );

    Ok(summary.inserted + summary.updated > 0)
}

fn handle_toggle(store: &mut MemoryContactStore) -> Result<bool, Box<dyn std::error::Error>> {
    let Some(phone) = pick_contact(store, "Toggle which contact?")? else {
        return Ok(false);
    };

    let next = match store.get(&phone).map(StoredContact::status) {
        Some(ContactStatus::Called) => ContactStatus::Pending,
        _ => ContactStatus::Called,
    };
    let contact = store.set_status(&phone, next, Utc::now())?;
    println!("{} is now {next}", contact.name);

    Ok(true)
}

fn handle_remove(store: &mut MemoryContactStore) -> Result<bool, Box<dyn std::error::Error>> {
    let Some(phone) = pick_contact(store, "Remove which contact?")? else {
        return Ok(false);
    };

    if !Confirm::new()
        .with_prompt(format!("Remove {phone}?"))
        .default(false)
        .interact()?
    {
        return Ok(false);
    }

    let contact = store.remove(&phone)?;
    println!("Removed {}", contact.name);

    Ok(true)
}

fn handle_archive(store: &mut MemoryContactStore) -> Result<bool, Box<dyn std::error::Error>> {
    if store.is_empty() {
        println!("No contacts to archive.");
        return Ok(false);
    }

    let archive = store.archive(Utc::now());
    println!(
        "Archived {} contact(s) as {}",
        archive.contacts.len(),
        archive.id
    );

    Ok(true)
}

fn handle_view_archive(store: &MemoryContactStore) -> Result<(), Box<dyn std::error::Error>> {
    let archives = store.archives();
    if archives.is_empty() {
        println!("No archives available.");
        return Ok(());
    }

    let labels: Vec<String> = archives
        .iter()
        .rev()
        .map(|a| {
            format!(
                "{} ({} contacts)",
                a.created_at.format("%Y-%m-%d %H:%M"),
                a.contacts.len()
            )
        })
        .collect();
    let idx = Select::new()
        .with_prompt("Archive")
        .items(&labels)
        .default(0)
        .interact()?;

    let archive = &archives[archives.len() - 1 - idx];
    let contacts: Vec<&StoredContact> = archive.contacts.iter().collect();
    write_stored(&mut std::io::stdout().lock(), &contacts, OutputFormat::Table)?;

    Ok(())
}
