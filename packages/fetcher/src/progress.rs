//! Progress reporting trait for batch fetch runs.
//!
//! Decouples the fetch loop from any rendering backend: the CLI plugs in
//! an `indicatif` bar, tests plug in a recorder, and library callers that
//! don't care use [`NullProgress`]. Callbacks are invoked synchronously
//! from the loop, exactly once per student after that student's outcome
//! is recorded; consumers needing throttled UI updates must debounce on
//! their side.

use std::sync::Arc;

/// Trait for reporting progress from a batch fetch run.
///
/// Implementations must be `Send + Sync` so a single instance can be
/// shared with a Ctrl-C handler task while the loop runs.
pub trait ProgressCallback: Send + Sync {
    /// Announce the number of students in the run, before the first fetch.
    fn set_total(&self, total: u64);

    /// Advance by `delta` completed students.
    fn inc(&self, delta: u64);

    /// Update the label for the student currently being fetched.
    fn set_message(&self, msg: String);

    /// Mark the run finished with a summary message.
    fn finish(&self, msg: String);

    /// Mark the run finished and remove any visible indicator.
    fn finish_and_clear(&self);
}

/// A [`ProgressCallback`] that ignores all updates.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
    fn finish_and_clear(&self) {}
}

/// Returns a shared [`NullProgress`] instance.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
