//! Extraction over several documents with a merged, deduplicated result.
//!
//! A document that fails to load is logged and recorded in its
//! [`FileOutcome`]; it never aborts the rest of the batch.

use std::path::{Path, PathBuf};

use gst_contacts_contact_models::CandidateContact;
use gst_contacts_extract::classify::OfficerPredicate;
use gst_contacts_extract::dedup::dedup_contacts;
use gst_contacts_extract::{Extraction, Extractor};

use crate::progress::ProgressCallback;
use crate::{DocumentError, extract_file};

/// Result of one document in a batch.
#[derive(Debug)]
pub struct FileOutcome {
    /// The document that was read.
    pub path: PathBuf,
    /// What came out of it.
    pub result: Result<Extraction, DocumentError>,
}

/// Result of a whole batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Per-document outcomes in input order.
    pub outcomes: Vec<FileOutcome>,
    /// Contacts from every successful document, deduplicated across the
    /// batch in input order.
    pub contacts: Vec<CandidateContact>,
}

impl BatchReport {
    /// Number of documents that could not be read or extracted.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }
}

/// Extracts every document in `paths` and merges the contacts.
///
/// A phone number seen in more than one document keeps the record from
/// the later document.
pub fn extract_files<P: OfficerPredicate>(
    paths: &[impl AsRef<Path>],
    extractor: &Extractor<P>,
    progress: &dyn ProgressCallback,
) -> BatchReport {
    progress.set_total(paths.len() as u64);

    let mut report = BatchReport::default();
    let mut merged = Vec::new();

    for path in paths {
        let path = path.as_ref();
        progress.set_message(path.display().to_string());

        let result = extract_file(path, extractor);

        match &result {
            Ok(Extraction::Contacts(contacts)) => merged.extend(contacts.iter().cloned()),
            Ok(Extraction::EmptyDocument) => {
                log::warn!("{}: document is empty", path.display());
            }
            Ok(Extraction::NoContacts { scanned }) => {
                log::warn!(
                    "{}: no contacts found in {scanned} lines/rows",
                    path.display()
                );
            }
            Err(e) => log::error!("{}: {e}", path.display()),
        }

        report.outcomes.push(FileOutcome {
            path: path.to_path_buf(),
            result,
        });
        progress.inc(1);
    }

    report.contacts = dedup_contacts(merged);

    progress.finish(format!(
        "{} contacts from {} documents ({} failed)",
        report.contacts.len(),
        report.outcomes.len(),
        report.failed()
    ));

    report
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;
    use crate::progress::NullProgress;
    use crate::test_support::temp_file;

    #[derive(Default)]
    struct CountingProgress {
        total: AtomicU64,
        done: AtomicU64,
    }

    impl ProgressCallback for CountingProgress {
        fn set_total(&self, total: u64) {
            self.total.store(total, Ordering::Relaxed);
        }
        fn inc(&self, delta: u64) {
            self.done.fetch_add(delta, Ordering::Relaxed);
        }
        fn set_message(&self, _msg: String) {}
        fn finish(&self, _msg: String) {}
    }

    #[test]
    fn merges_across_documents_with_later_document_winning() {
        let first = temp_file(
            "a.csv",
            b"GSTIN,NAME,MOBILE\n27ABCDE1234F1Z5,OLD NAME,9876543210\n",
        );
        let second = temp_file(
            "b.txt",
            b"HEADER\n27ABCDE1234F1Z5 M/S NEW NAME\n9876543210\n29PQRST6789K1Z2 BHARAT\n9123456780\n",
        );

        let report = extract_files(&[first, second], &Extractor::default(), &NullProgress);

        assert_eq!(report.failed(), 0);
        assert_eq!(report.contacts.len(), 2);
        assert_eq!(report.contacts[0].name, "NEW NAME");
        assert_eq!(report.contacts[1].phone_number, "9123456780");
    }

    #[test]
    fn failed_document_does_not_stop_batch() {
        let good = temp_file("good.csv", b"GSTIN,NAME,MOBILE\n,ACME,9876543210\n");
        let bad = PathBuf::from("unsupported.docx");
        let progress = CountingProgress::default();

        let report = extract_files(&[bad, good], &Extractor::default(), &progress);

        assert_eq!(report.failed(), 1);
        assert!(matches!(
            report.outcomes[0].result,
            Err(DocumentError::UnsupportedFormat(_))
        ));
        assert_eq!(report.contacts.len(), 1);
        assert_eq!(progress.total.load(Ordering::Relaxed), 2);
        assert_eq!(progress.done.load(Ordering::Relaxed), 2);
    }
}
