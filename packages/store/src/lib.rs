#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Persistent contact store with call-status tracking.
//!
//! Extracted [`CandidateContact`]s are merged into the store keyed by phone
//! number. Each stored contact carries a call status that the person
//! working through the list toggles between [`ContactStatus::Pending`] and
//! [`ContactStatus::Called`]. Uploading a document that contains a phone
//! number again is treated as a refresh: the record is overwritten and its
//! status goes back to pending.
//!
//! [`MemoryContactStore`] keeps everything in memory and persists to a
//! single JSON snapshot file.

pub mod memory;

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use gst_contacts_contact_models::CandidateContact;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use uuid::Uuid;

pub use memory::MemoryContactStore;

/// Errors from contact store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the snapshot file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot file is not valid JSON for a store.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No contact has the given phone number.
    #[error("No contact with phone number {0}")]
    ContactNotFound(String),

    /// No archive has the given id.
    #[error("No archive with id {0}")]
    ArchiveNotFound(Uuid),
}

/// Call status of a stored contact.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ContactStatus {
    /// Not called yet, or reset by a fresh upload.
    Pending,
    /// Called; the call time is recorded.
    Called,
}

/// A contact as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredContact {
    /// Stable identifier assigned on first insert.
    pub id: Uuid,
    /// Display name from the most recent upload.
    pub name: String,
    /// Ten-digit phone number; unique within a store.
    pub phone_number: String,
    /// GSTIN from the most recent upload that carried one.
    #[serde(default)]
    pub registration_id: String,
    /// Whether the contact has been called since it was last uploaded.
    pub called: bool,
    /// When the contact was marked as called.
    pub call_date: Option<DateTime<Utc>>,
    /// First insert time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl StoredContact {
    /// Creates a pending contact from an extracted candidate.
    #[must_use]
    pub fn from_candidate(candidate: &CandidateContact, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: candidate.name.clone(),
            phone_number: candidate.phone_number.clone(),
            registration_id: candidate.registration_id.clone(),
            called: false,
            call_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Current call status.
    #[must_use]
    pub const fn status(&self) -> ContactStatus {
        if self.called {
            ContactStatus::Called
        } else {
            ContactStatus::Pending
        }
    }

    /// Sets the call status, stamping `call_date` when marked as called.
    pub fn set_status(&mut self, status: ContactStatus, now: DateTime<Utc>) {
        match status {
            ContactStatus::Pending => {
                self.called = false;
                self.call_date = None;
            }
            ContactStatus::Called => {
                self.called = true;
                self.call_date = Some(now);
            }
        }
        self.updated_at = now;
    }

    /// Overwrites the record with a fresh upload and resets it to pending.
    ///
    /// An empty registration id in the upload keeps the stored one.
    pub fn refresh(&mut self, candidate: &CandidateContact, now: DateTime<Utc>) {
        candidate.name.clone_into(&mut self.name);
        if !candidate.registration_id.is_empty() {
            candidate.registration_id.clone_into(&mut self.registration_id);
        }
        self.set_status(ContactStatus::Pending, now);
    }
}

/// Display order for contact lists: uncalled first, then called contacts
/// by most recent call, then oldest first.
#[must_use]
pub fn list_order(a: &StoredContact, b: &StoredContact) -> Ordering {
    a.called
        .cmp(&b.called)
        .then_with(|| b.call_date.cmp(&a.call_date))
        .then_with(|| a.created_at.cmp(&b.created_at))
}

/// Counts from merging one extraction batch into a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertSummary {
    /// Phone numbers not seen before.
    pub inserted: usize,
    /// Phone numbers already present, now refreshed.
    pub updated: usize,
    /// Candidates rejected for an invalid phone number.
    pub skipped: usize,
}

/// A point-in-time copy of the contact list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Archive {
    /// Archive identifier.
    pub id: Uuid,
    /// When the snapshot was taken.
    pub created_at: DateTime<Utc>,
    /// Contacts in list order at snapshot time.
    pub contacts: Vec<StoredContact>,
}

/// Storage keyed by phone number.
pub trait ContactStore {
    /// Merges an extraction batch.
    ///
    /// New phone numbers are inserted as pending. Existing ones get the
    /// new name and (non-empty) registration id and are reset to pending.
    fn upsert_batch(&mut self, contacts: &[CandidateContact], now: DateTime<Utc>)
    -> UpsertSummary;

    /// All contacts in [`list_order`].
    fn list(&self) -> Vec<&StoredContact>;

    /// Looks up a contact by phone number.
    fn get(&self, phone_number: &str) -> Option<&StoredContact>;

    /// Changes the call status of a contact.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ContactNotFound`] if no contact has
    /// `phone_number`.
    fn set_status(
        &mut self,
        phone_number: &str,
        status: ContactStatus,
        now: DateTime<Utc>,
    ) -> Result<&StoredContact, StoreError>;

    /// Deletes a contact.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ContactNotFound`] if no contact has
    /// `phone_number`.
    fn remove(&mut self, phone_number: &str) -> Result<StoredContact, StoreError>;

    /// Snapshots the current list into a new archive.
    fn archive(&mut self, now: DateTime<Utc>) -> &Archive;

    /// All archives, oldest first.
    fn archives(&self) -> &[Archive];

    /// Looks up an archive by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ArchiveNotFound`] if no archive has `id`.
    fn get_archive(&self, id: Uuid) -> Result<&Archive, StoreError>;
}
