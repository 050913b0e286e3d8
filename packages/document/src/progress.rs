//! Progress hooks for batch extraction.
//!
//! [`batch::extract_files`](crate::batch::extract_files) reports one unit
//! per document through a [`ProgressCallback`]; the terminal progress bar
//! lives in the CLI utilities, and [`NullProgress`] keeps library callers
//! and tests quiet.

/// Receives per-document progress from a batch run.
pub trait ProgressCallback: Send + Sync {
    /// Number of documents in the batch.
    fn set_total(&self, total: u64);

    /// Marks `delta` more documents as done.
    fn inc(&self, delta: u64);

    /// Shows the document currently being read.
    fn set_message(&self, msg: String);

    /// Ends the run with a summary line.
    fn finish(&self, msg: String);
}

/// Ignores every progress update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}
