//! Output validation and phone-number deduplication.

use std::collections::HashMap;

use gst_contacts_contact_models::{CandidateContact, UNKNOWN_NAME};

/// Drops invalid candidates and collapses duplicate phone numbers.
///
/// A later occurrence of a phone number replaces the earlier record (the
/// document is assumed to correct itself further down) but keeps the
/// position where that phone number first appeared. Blank names fall back
/// to [`UNKNOWN_NAME`]. Running this twice gives the same result as once.
#[must_use]
pub fn dedup_contacts(records: Vec<CandidateContact>) -> Vec<CandidateContact> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut contacts: Vec<CandidateContact> = Vec::with_capacity(records.len());

    for mut record in records {
        if !record.is_valid() {
            log::debug!("Dropping candidate with invalid phone {:?}", record.phone_number);
            continue;
        }
        if record.name.trim().is_empty() {
            UNKNOWN_NAME.clone_into(&mut record.name);
        }

        if let Some(&position) = positions.get(&record.phone_number) {
            log::debug!(
                "Duplicate phone {}: replacing {:?} with {:?}",
                record.phone_number,
                contacts[position].name,
                record.name
            );
            contacts[position] = record;
        } else {
            positions.insert(record.phone_number.clone(), contacts.len());
            contacts.push(record);
        }
    }

    contacts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(name: &str, phone: &str) -> CandidateContact {
        CandidateContact::new(name, phone, "")
    }

    #[test]
    fn later_duplicate_wins_at_first_position() {
        let out = dedup_contacts(vec![
            contact("FIRST", "9876543210"),
            contact("OTHER", "9123456780"),
            contact("SECOND", "9876543210"),
        ]);
        assert_eq!(
            out,
            vec![contact("SECOND", "9876543210"), contact("OTHER", "9123456780")]
        );
    }

    #[test]
    fn drops_invalid_phones() {
        let out = dedup_contacts(vec![
            contact("SHORT", "98765"),
            contact("LETTERS", "98765abcde"),
            contact("OK", "9876543210"),
        ]);
        assert_eq!(out, vec![contact("OK", "9876543210")]);
    }

    #[test]
    fn blank_name_falls_back_to_unknown() {
        let record = CandidateContact {
            name: "  ".to_owned(),
            phone_number: "9876543210".to_owned(),
            registration_id: String::new(),
        };
        let out = dedup_contacts(vec![record]);
        assert_eq!(out[0].name, UNKNOWN_NAME);
    }

    #[test]
    fn is_idempotent() {
        let once = dedup_contacts(vec![
            contact("A", "9876543210"),
            contact("B", "9123456780"),
            contact("C", "9876543210"),
            contact("D", "123"),
        ]);
        assert_eq!(dedup_contacts(once.clone()), once);
    }

    #[test]
    fn output_has_unique_valid_phones() {
        let out = dedup_contacts(vec![
            contact("A", "9876543210"),
            contact("B", "9876543210"),
            contact("C", "9000000001"),
            contact("D", "9000000001"),
        ]);
        let mut phones: Vec<&str> = out.iter().map(|c| c.phone_number.as_str()).collect();
        assert!(phones.iter().all(|p| p.len() == 10));
        phones.sort_unstable();
        phones.dedup();
        assert_eq!(phones.len(), out.len());
    }
}
