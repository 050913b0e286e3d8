//! In-memory [`ContactStore`] persisted as one JSON snapshot file.

use std::path::Path;

use chrono::{DateTime, Utc};
use gst_contacts_contact_models::CandidateContact;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Archive, ContactStatus, ContactStore, StoreError, StoredContact, UpsertSummary, list_order,
};

/// Contact store held in memory.
///
/// Contacts are kept in insertion order; [`ContactStore::list`] sorts on
/// the way out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryContactStore {
    contacts: Vec<StoredContact>,
    #[serde(default)]
    archives: Vec<Archive>,
}

impl MemoryContactStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a store from a JSON snapshot. A missing file yields an empty
    /// store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            log::debug!("No store at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let bytes = std::fs::read(path)?;
        let store: Self = serde_json::from_slice(&bytes)?;

        log::debug!(
            "Loaded {} contacts and {} archives from {}",
            store.contacts.len(),
            store.archives.len(),
            path.display()
        );

        Ok(store)
    }

    /// Writes the store to a JSON snapshot, replacing any existing file.
    ///
    /// The snapshot is written to a sibling temp file first and renamed
    /// into place.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization or any file operation fails.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_vec_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;

        log::debug!(
            "Saved {} contacts to {}",
            self.contacts.len(),
            path.display()
        );

        Ok(())
    }

    /// Number of stored contacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// Whether the store holds no contacts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    fn position(&self, phone_number: &str) -> Option<usize> {
        self.contacts
            .iter()
            .position(|c| c.phone_number == phone_number)
    }
}

impl ContactStore for MemoryContactStore {
    fn upsert_batch(
        &mut self,
        contacts: &[CandidateContact],
        now: DateTime<Utc>,
    ) -> UpsertSummary {
        let mut summary = UpsertSummary::default();

        for candidate in contacts {
            if !candidate.is_valid() {
                log::warn!(
                    "Skipping contact {:?} with invalid phone {:?}",
                    candidate.name,
                    candidate.phone_number
                );
                summary.skipped += 1;
                continue;
            }

            if let Some(index) = self.position(&candidate.phone_number) {
                self.contacts[index].refresh(candidate, now);
                summary.updated += 1;
            } else {
                self.contacts
                    .push(StoredContact::from_candidate(candidate, now));
                summary.inserted += 1;
            }
        }

        log::info!(
            "Upserted batch: {} inserted, {} updated, {} skipped",
            summary.inserted,
            summary.updated,
            summary.skipped
        );

        summary
    }

    fn list(&self) -> Vec<&StoredContact> {
        let mut contacts: Vec<&StoredContact> = self.contacts.iter().collect();
        contacts.sort_by(|a, b| list_order(a, b));
        contacts
    }

    fn get(&self, phone_number: &str) -> Option<&StoredContact> {
        self.contacts
            .iter()
            .find(|c| c.phone_number == phone_number)
    }

    fn set_status(
        &mut self,
        phone_number: &str,
        status: ContactStatus,
        now: DateTime<Utc>,
    ) -> Result<&StoredContact, StoreError> {
        let index = self
            .position(phone_number)
            .ok_or_else(|| StoreError::ContactNotFound(phone_number.to_owned()))?;

        let contact = &mut self.contacts[index];
        contact.set_status(status, now);
        log::debug!("Marked {phone_number} as {status}");

        Ok(contact)
    }

    fn remove(&mut self, phone_number: &str) -> Result<StoredContact, StoreError> {
        let index = self
            .position(phone_number)
            .ok_or_else(|| StoreError::ContactNotFound(phone_number.to_owned()))?;

        Ok(self.contacts.remove(index))
    }

    fn archive(&mut self, now: DateTime<Utc>) -> &Archive {
        let contacts = self.list().into_iter().cloned().collect();
        self.archives.push(Archive {
            id: Uuid::new_v4(),
            created_at: now,
            contacts,
        });

        let archive = &self.archives[self.archives.len() - 1];
        log::info!(
            "Archived {} contacts as {}",
            archive.contacts.len(),
            archive.id
        );
        archive
    }

    fn archives(&self) -> &[Archive] {
        &self.archives
    }

    fn get_archive(&self, id: Uuid) -> Result<&Archive, StoreError> {
        self.archives
            .iter()
            .find(|a| a.id == id)
            .ok_or(StoreError::ArchiveNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn candidate(name: &str, phone: &str, gstin: &str) -> CandidateContact {
        CandidateContact::new(name, phone, gstin)
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("gst_contacts_store_{}", Uuid::new_v4()))
            .join(name)
    }

    #[test]
    fn upsert_inserts_new_and_refreshes_existing() {
        let mut store = MemoryContactStore::new();
        let first = store.upsert_batch(
            &[
                candidate("ACME", "9876543210", "27ABCDE1234F1Z5"),
                candidate("BHARAT", "9123456780", ""),
            ],
            at(0),
        );
        assert_eq!(
            first,
            UpsertSummary {
                inserted: 2,
                updated: 0,
                skipped: 0,
            }
        );

        store
            .set_status("9876543210", ContactStatus::Called, at(10))
            .unwrap();

        let second = store.upsert_batch(&[candidate("ACME RENAMED", "9876543210", "")], at(20));
        assert_eq!(second.updated, 1);

        let contact = store.get("9876543210").unwrap();
        assert_eq!(contact.name, "ACME RENAMED");
        assert_eq!(contact.registration_id, "27ABCDE1234F1Z5");
        assert_eq!(contact.status(), ContactStatus::Pending);
        assert_eq!(contact.call_date, None);
        assert_eq!(contact.created_at, at(0));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn upsert_skips_invalid_phones() {
        let mut store = MemoryContactStore::new();
        let summary = store.upsert_batch(&[candidate("BAD", "12345", "")], at(0));
        assert_eq!(summary.skipped, 1);
        assert!(store.is_empty());
    }

    #[test]
    fn list_orders_pending_before_called() {
        let mut store = MemoryContactStore::new();
        store.upsert_batch(
            &[
                candidate("A", "9000000001", ""),
                candidate("B", "9000000002", ""),
                candidate("C", "9000000003", ""),
            ],
            at(0),
        );
        store
            .set_status("9000000001", ContactStatus::Called, at(5))
            .unwrap();
        store
            .set_status("9000000003", ContactStatus::Called, at(9))
            .unwrap();

        let names: Vec<&str> = store.list().into_iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);
    }

    #[test]
    fn unknown_phone_is_not_found() {
        let mut store = MemoryContactStore::new();
        assert!(matches!(
            store.set_status("9876543210", ContactStatus::Called, at(0)),
            Err(StoreError::ContactNotFound(phone)) if phone == "9876543210"
        ));
        assert!(matches!(
            store.remove("9876543210"),
            Err(StoreError::ContactNotFound(_))
        ));
    }

    #[test]
    fn remove_deletes_contact() {
        let mut store = MemoryContactStore::new();
        store.upsert_batch(&[candidate("ACME", "9876543210", "")], at(0));
        let removed = store.remove("9876543210").unwrap();
        assert_eq!(removed.name, "ACME");
        assert!(store.get("9876543210").is_none());
    }

    #[test]
    fn archive_snapshots_current_list() {
        let mut store = MemoryContactStore::new();
        store.upsert_batch(&[candidate("ACME", "9876543210", "")], at(0));

        let id = store.archive(at(30)).id;
        store
            .set_status("9876543210", ContactStatus::Called, at(40))
            .unwrap();

        let archive = store.get_archive(id).unwrap();
        assert_eq!(archive.created_at, at(30));
        assert_eq!(archive.contacts.len(), 1);
        assert!(!archive.contacts[0].called);
        assert_eq!(store.archives().len(), 1);
        assert!(matches!(
            store.get_archive(Uuid::nil()),
            Err(StoreError::ArchiveNotFound(_))
        ));
    }

    #[test]
    fn save_and_load_preserve_contents() {
        let path = temp_path("contacts.json");
        let mut store = MemoryContactStore::new();
        store.upsert_batch(&[candidate("ACME", "9876543210", "27ABCDE1234F1Z5")], at(0));
        store
            .set_status("9876543210", ContactStatus::Called, at(10))
            .unwrap();
        store.archive(at(20));

        store.save(&path).unwrap();
        let loaded = MemoryContactStore::load(&path).unwrap();

        assert_eq!(loaded, store);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_file_loads_empty() {
        let store = MemoryContactStore::load(&temp_path("absent.json")).unwrap();
        assert!(store.is_empty());
        assert!(store.archives().is_empty());
    }

    #[test]
    fn corrupt_file_is_json_error() {
        let path = temp_path("corrupt.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"{not json").unwrap();
        assert!(matches!(
            MemoryContactStore::load(&path),
            Err(StoreError::Json(_))
        ));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
