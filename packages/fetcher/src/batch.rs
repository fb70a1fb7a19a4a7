//! The sequential batch fetch loop.
//!
//! One lookup is in flight at any moment. Students are processed in
//! roster order, each one ends as exactly one [`FetchResult`], and a
//! fixed delay separates consecutive requests so the external service
//! never sees a burst. Per-student failures never abort the run; the
//! only early exit is cooperative cancellation, which returns the
//! partial results recorded so far.

use std::sync::Arc;
use std::time::Duration;

use leetfetch_leetcode_models::{LeetCodeData, Student};

use crate::cancel::CancelToken;
use crate::progress::ProgressCallback;
use crate::ProfileLookup;

/// Default delay between consecutive lookups, in milliseconds.
///
/// Matches the pacing the public GraphQL endpoint tolerates without
/// answering HTTP 429.
pub const DEFAULT_DELAY_MS: u64 = 500;

/// Default upper bound on a single lookup, in seconds.
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;

/// Failure reason for students with no LeetCode username on file.
pub const REASON_MISSING_ID: &str = "missing external id";

/// Failure reason when the service knows no such user, or the profile
/// came back without a username.
pub const REASON_NOT_FOUND: &str = "not found or private";

/// Failure reason when a lookup exceeded the configured timeout.
pub const REASON_TIMEOUT: &str = "timeout";

/// Failure reason filled in by reconciliation for students a cancelled
/// run never reached.
pub const REASON_NOT_PROCESSED: &str = "not processed";

/// The outcome recorded for one student.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult {
    /// The profile was fetched and carries a username.
    Success {
        /// The roster entry this result belongs to.
        student: Student,
        /// The fetched profile data.
        data: Box<LeetCodeData>,
    },
    /// The student could not be fetched.
    Failure {
        /// The roster entry this result belongs to.
        student: Student,
        /// Why the fetch failed.
        reason: String,
    },
}

impl FetchResult {
    /// The roster entry this result belongs to.
    #[must_use]
    pub const fn student(&self) -> &Student {
        match self {
            Self::Success { student, .. } | Self::Failure { student, .. } => student,
        }
    }

    /// Returns `true` for [`FetchResult::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The fetched data, for successes.
    #[must_use]
    pub fn data(&self) -> Option<&LeetCodeData> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// The failure reason, for failures.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason, .. } => Some(reason),
        }
    }
}

/// Lifecycle of a [`BatchRun`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Created, loop not started.
    Idle,
    /// The loop is processing students.
    Running,
    /// The loop returned, normally or via cancellation.
    Done,
}

/// Accumulated state of one batch invocation.
///
/// Owned by the `run` call that creates it and returned by value, so two
/// concurrent runs can never share an accumulator. `completed` always
/// equals `results.len()`; it exists as a separate counter because
/// progress consumers read it while the run is summarized.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRun {
    /// Per-student outcomes in roster order. Shorter than `total` only
    /// when the run was cancelled.
    pub results: Vec<FetchResult>,
    /// Number of students with a recorded outcome.
    pub completed: usize,
    /// Number of students the run was started with.
    pub total: usize,
    /// Where the run is in its lifecycle.
    pub status: RunStatus,
}

impl BatchRun {
    /// Creates an empty run over `total` students.
    #[must_use]
    pub const fn new(total: usize) -> Self {
        Self {
            results: Vec::new(),
            completed: 0,
            total,
            status: RunStatus::Idle,
        }
    }

    /// Number of successful fetches so far.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    /// Number of failed fetches so far.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.results.len() - self.success_count()
    }

    /// Returns `true` when every student got an outcome.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.completed == self.total
    }

    /// The students that failed, in roster order.
    ///
    /// This is the retry path: feed the returned slice back into
    /// [`BatchFetcher::run`] to attempt only the failures again.
    #[must_use]
    pub fn failed_students(&self) -> Vec<Student> {
        self.results
            .iter()
            .filter(|r| !r.is_success())
            .map(|r| r.student().clone())
            .collect()
    }
}

/// Configuration for the sequential fetch loop.
#[derive(Debug, Clone)]
pub struct BatchFetcher {
    delay: Duration,
    lookup_timeout: Duration,
}

impl Default for BatchFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchFetcher {
    /// Creates a fetcher with the default pacing.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            lookup_timeout: Duration::from_secs(DEFAULT_LOOKUP_TIMEOUT_SECS),
        }
    }

    /// Sets the delay between consecutive lookups.
    #[must_use]
    pub const fn with_delay_ms(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(ms);
        self
    }

    /// Sets the upper bound on a single lookup.
    #[must_use]
    pub const fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Fetches every student's profile sequentially.
    ///
    /// Students are processed in input order with exactly one lookup
    /// attempt each; lookup errors, timeouts, and blank usernames become
    /// [`FetchResult::Failure`] entries rather than aborting the run.
    /// `progress` is told the total up front and advanced once per
    /// student after that student's outcome is recorded. The delay
    /// applies between students, not after the last one.
    ///
    /// Cancellation is checked before each student and interrupts both
    /// the in-flight lookup and the inter-request delay; the partial
    /// [`BatchRun`] recorded so far is returned with the in-flight
    /// student unrecorded.
    pub async fn run(
        &self,
        students: &[Student],
        lookup: &dyn ProfileLookup,
        progress: &Arc<dyn ProgressCallback>,
        cancel: &CancelToken,
    ) -> BatchRun {
        let total = students.len();
        let mut run = BatchRun::new(total);

        if students.is_empty() {
            run.status = RunStatus::Done;
            return run;
        }

        run.status = RunStatus::Running;
        progress.set_total(total as u64);

        for (index, student) in students.iter().enumerate() {
            if cancel.is_cancelled() {
                log::info!(
                    "fetch cancelled after {} of {total} students",
                    run.completed
                );
                break;
            }

            progress.set_message(format!("{} ({})", student.name, student.reg_no));

            let Some(result) = self.fetch_one(student, lookup, cancel).await else {
                log::info!(
                    "fetch cancelled mid-lookup after {} of {total} students",
                    run.completed
                );
                break;
            };

            run.results.push(result);
            run.completed += 1;
            progress.inc(1);

            if index + 1 < total {
                tokio::select! {
                    () = cancel.cancelled() => {}
                    () = tokio::time::sleep(self.delay) => {}
                }
            }
        }

        run.status = RunStatus::Done;
        progress.finish(format!(
            "{} of {total} fetched ({} ok, {} failed)",
            run.completed,
            run.success_count(),
            run.failure_count(),
        ));
        run
    }

    /// Produces the outcome for one student, or `None` if cancellation
    /// interrupted the lookup.
    async fn fetch_one(
        &self,
        student: &Student,
        lookup: &dyn ProfileLookup,
        cancel: &CancelToken,
    ) -> Option<FetchResult> {
        if !student.has_leetcode_id() {
            log::warn!("{} ({}): no LeetCode id on file", student.name, student.reg_no);
            return Some(FetchResult::Failure {
                student: student.clone(),
                reason: REASON_MISSING_ID.to_owned(),
            });
        }

        let username = student.leetcode_id.trim();
        log::debug!("fetching {username} for {} ({})", student.name, student.reg_no);

        let outcome = tokio::select! {
            () = cancel.cancelled() => return None,
            outcome = tokio::time::timeout(self.lookup_timeout, lookup.lookup(username)) => outcome,
        };

        let result = match outcome {
            Err(_) => {
                log::warn!("{username}: lookup timed out");
                FetchResult::Failure {
                    student: student.clone(),
                    reason: REASON_TIMEOUT.to_owned(),
                }
            }
            Ok(Ok(Some(data))) if data.has_username() => FetchResult::Success {
                student: student.clone(),
                data: Box::new(data),
            },
            Ok(Ok(_)) => {
                log::warn!("{username}: no usable profile returned");
                FetchResult::Failure {
                    student: student.clone(),
                    reason: REASON_NOT_FOUND.to_owned(),
                }
            }
            Ok(Err(e)) => {
                log::warn!("{username}: lookup failed: {e}");
                FetchResult::Failure {
                    student: student.clone(),
                    reason: e.to_string(),
                }
            }
        };

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use leetfetch_leetcode_models::LeetCodeProfile;

    use super::*;
    use crate::progress::null_progress;
    use crate::LookupError;

    fn student(reg_no: &str, name: &str, leetcode_id: &str) -> Student {
        Student {
            reg_no: reg_no.to_owned(),
            name: name.to_owned(),
            department: "CSE".to_owned(),
            section: "A".to_owned(),
            leetcode_id: leetcode_id.to_owned(),
        }
    }

    fn profile_for(username: &str) -> LeetCodeData {
        LeetCodeData {
            profile: LeetCodeProfile {
                username: username.to_owned(),
                ..LeetCodeProfile::default()
            },
            ..LeetCodeData::default()
        }
    }

    /// What the scripted lookup should do for a given username.
    enum Script {
        Found,
        /// A response whose profile carries no username.
        Anonymous,
        Missing,
        Error(String),
        /// Never resolves within any reasonable timeout.
        Hang,
    }

    struct ScriptedLookup {
        scripts: BTreeMap<String, Script>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedLookup {
        fn new(scripts: Vec<(&str, Script)>) -> Self {
            Self {
                scripts: scripts
                    .into_iter()
                    .map(|(k, v)| (k.to_owned(), v))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProfileLookup for ScriptedLookup {
        async fn lookup(&self, username: &str) -> Result<Option<LeetCodeData>, LookupError> {
            self.calls.lock().unwrap().push(username.to_owned());
            match self.scripts.get(username) {
                Some(Script::Found) => Ok(Some(profile_for(username))),
                Some(Script::Anonymous) => Ok(Some(LeetCodeData::default())),
                Some(Script::Error(message)) => Err(LookupError::GraphQl {
                    message: message.clone(),
                }),
                Some(Script::Hang) => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(None)
                }
                Some(Script::Missing) | None => Ok(None),
            }
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        totals: Mutex<Vec<u64>>,
        positions: Mutex<Vec<u64>>,
        finished: Mutex<Vec<String>>,
    }

    impl ProgressCallback for RecordingProgress {
        fn set_total(&self, total: u64) {
            self.totals.lock().unwrap().push(total);
        }

        fn inc(&self, delta: u64) {
            let mut positions = self.positions.lock().unwrap();
            let next = positions.last().copied().unwrap_or(0) + delta;
            positions.push(next);
        }

        fn set_message(&self, _msg: String) {}

        fn finish(&self, msg: String) {
            self.finished.lock().unwrap().push(msg);
        }

        fn finish_and_clear(&self) {}
    }

    fn fast_fetcher() -> BatchFetcher {
        BatchFetcher::new().with_delay_ms(0)
    }

    #[tokio::test]
    async fn records_every_student_in_roster_order() {
        let students = vec![
            student("20CS001", "Asha", "asha_codes"),
            student("20CS002", "Bharat", ""),
            student("20CS003", "Chitra", "chitra_lc"),
        ];
        let lookup = ScriptedLookup::new(vec![("asha_codes", Script::Found), (
            "chitra_lc",
            Script::Missing,
        )]);

        let run = fast_fetcher()
            .run(&students, &lookup, &null_progress(), &CancelToken::new())
            .await;

        assert_eq!(run.results.len(), 3);
        assert_eq!(run.completed, 3);
        assert_eq!(run.status, RunStatus::Done);
        assert!(run.is_complete());
        for (result, expected) in run.results.iter().zip(&students) {
            assert_eq!(result.student(), expected);
        }
        assert!(run.results[0].is_success());
        assert_eq!(run.results[1].reason(), Some(REASON_MISSING_ID));
        assert_eq!(run.results[2].reason(), Some(REASON_NOT_FOUND));
        // The blank-id student must never reach the service.
        assert_eq!(lookup.calls(), vec!["asha_codes", "chitra_lc"]);
    }

    #[tokio::test]
    async fn anonymous_profile_counts_as_not_found() {
        let students = vec![student("20CS004", "Devi", "ghost")];
        let lookup = ScriptedLookup::new(vec![("ghost", Script::Anonymous)]);

        let run = fast_fetcher()
            .run(&students, &lookup, &null_progress(), &CancelToken::new())
            .await;

        assert_eq!(run.results[0].reason(), Some(REASON_NOT_FOUND));
    }

    #[tokio::test]
    async fn lookup_errors_never_abort_the_run() {
        let students = vec![
            student("20CS001", "Asha", "asha_codes"),
            student("20CS002", "Bharat", "bharat_lc"),
            student("20CS003", "Chitra", "chitra_lc"),
            student("20CS004", "Devi", "devi_lc"),
        ];
        let lookup = ScriptedLookup::new(vec![
            ("asha_codes", Script::Found),
            ("bharat_lc", Script::Found),
            ("chitra_lc", Script::Error("rate limited".to_owned())),
            ("devi_lc", Script::Found),
        ]);

        let run = fast_fetcher()
            .run(&students, &lookup, &null_progress(), &CancelToken::new())
            .await;

        assert_eq!(run.results.len(), 4);
        assert_eq!(run.success_count(), 3);
        assert_eq!(run.failure_count(), 1);
        assert_eq!(
            run.results[2].reason(),
            Some("GraphQL error: rate limited")
        );
        assert_eq!(run.failed_students(), vec![students[2].clone()]);
    }

    #[tokio::test]
    async fn progress_advances_once_per_student() {
        let students = vec![
            student("20CS001", "Asha", "asha_codes"),
            student("20CS002", "Bharat", ""),
            student("20CS003", "Chitra", "chitra_lc"),
        ];
        let lookup = ScriptedLookup::new(vec![("asha_codes", Script::Found)]);
        let progress = Arc::new(RecordingProgress::default());
        let callback: Arc<dyn ProgressCallback> = progress.clone();

        fast_fetcher()
            .run(&students, &lookup, &callback, &CancelToken::new())
            .await;

        assert_eq!(*progress.totals.lock().unwrap(), vec![3]);
        // One increment per student, positions covering 1..=n in order,
        // including the short-circuited blank-id student.
        assert_eq!(*progress.positions.lock().unwrap(), vec![1, 2, 3]);
        assert_eq!(progress.finished.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_roster_resolves_immediately() {
        let lookup = ScriptedLookup::new(vec![]);
        let progress = Arc::new(RecordingProgress::default());
        let callback: Arc<dyn ProgressCallback> = progress.clone();

        let run = fast_fetcher()
            .run(&[], &lookup, &callback, &CancelToken::new())
            .await;

        assert!(run.results.is_empty());
        assert_eq!(run.status, RunStatus::Done);
        assert!(lookup.calls().is_empty());
        assert!(progress.totals.lock().unwrap().is_empty());
        assert!(progress.positions.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn delay_separates_consecutive_lookups() {
        let students: Vec<Student> = (1..=5)
            .map(|i| student(&format!("20CS00{i}"), "S", &format!("user{i}")))
            .collect();
        let lookup = ScriptedLookup::new(
            students
                .iter()
                .map(|s| (s.leetcode_id.as_str(), Script::Found))
                .collect(),
        );

        let started = tokio::time::Instant::now();
        let run = BatchFetcher::new()
            .with_delay_ms(500)
            .run(&students, &lookup, &null_progress(), &CancelToken::new())
            .await;
        let elapsed = started.elapsed();

        assert_eq!(run.results.len(), 5);
        // Four gaps between five students; no delay after the last one.
        assert!(elapsed >= Duration::from_millis(2000), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_millis(2500), "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn hung_lookup_becomes_a_timeout_failure() {
        let students = vec![
            student("20CS001", "Asha", "asha_codes"),
            student("20CS002", "Bharat", "slowpoke"),
            student("20CS003", "Chitra", "chitra_lc"),
        ];
        let lookup = ScriptedLookup::new(vec![
            ("asha_codes", Script::Found),
            ("slowpoke", Script::Hang),
            ("chitra_lc", Script::Found),
        ]);

        let run = BatchFetcher::new()
            .with_delay_ms(0)
            .with_lookup_timeout(Duration::from_secs(10))
            .run(&students, &lookup, &null_progress(), &CancelToken::new())
            .await;

        assert_eq!(run.results.len(), 3);
        assert_eq!(run.results[1].reason(), Some(REASON_TIMEOUT));
        assert!(run.results[0].is_success());
        assert!(run.results[2].is_success());
    }

    #[tokio::test]
    async fn pre_cancelled_token_stops_before_any_lookup() {
        let students = vec![student("20CS001", "Asha", "asha_codes")];
        let lookup = ScriptedLookup::new(vec![("asha_codes", Script::Found)]);
        let cancel = CancelToken::new();
        cancel.cancel();

        let run = fast_fetcher()
            .run(&students, &lookup, &null_progress(), &cancel)
            .await;

        assert!(run.results.is_empty());
        assert_eq!(run.status, RunStatus::Done);
        assert!(!run.is_complete());
        assert!(lookup.calls().is_empty());
    }

    /// Resolves normally but cancels the shared token after a set number
    /// of calls, the way a Ctrl-C lands between two students.
    struct CancellingLookup {
        cancel: CancelToken,
        after: usize,
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl ProfileLookup for CancellingLookup {
        async fn lookup(&self, username: &str) -> Result<Option<LeetCodeData>, LookupError> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if *calls == self.after {
                self.cancel.cancel();
            }
            drop(calls);
            Ok(Some(profile_for(username)))
        }
    }

    #[tokio::test]
    async fn cancel_mid_run_returns_the_partial_results() {
        let students: Vec<Student> = (1..=4)
            .map(|i| student(&format!("20CS00{i}"), "S", &format!("user{i}")))
            .collect();
        let cancel = CancelToken::new();
        let lookup = CancellingLookup {
            cancel: cancel.clone(),
            after: 2,
            calls: Mutex::new(0),
        };

        let run = fast_fetcher()
            .run(&students, &lookup, &null_progress(), &cancel)
            .await;

        // The second student's outcome was already finalized when the
        // token flipped; the loop stops before the third.
        assert_eq!(run.results.len(), 2);
        assert_eq!(run.completed, 2);
        assert_eq!(run.status, RunStatus::Done);
        assert!(!run.is_complete());
        assert_eq!(run.results[1].student().reg_no, "20CS002");
    }
}
