//! Result reconciliation, free-text filtering, and row selection.
//!
//! Consumers (the CLI table, the CSV exporter) work against one merged
//! view: every roster entry has exactly one result, a search box narrows
//! what is visible without dropping any underlying data, and a selection
//! set tracks which visible rows are checked.

use std::collections::BTreeSet;

use leetfetch_leetcode_models::Student;

use crate::batch::{FetchResult, REASON_NOT_PROCESSED};

/// Merges a roster with the results of a (possibly partial) run.
///
/// Returns one result per roster entry, in roster order. Students the
/// run never reached, which only happens after cancellation, are filled
/// in as failures with reason [`REASON_NOT_PROCESSED`]. Results are
/// matched to students by registration number.
#[must_use]
pub fn reconcile(students: &[Student], results: &[FetchResult]) -> Vec<FetchResult> {
    students
        .iter()
        .map(|student| {
            results
                .iter()
                .find(|r| r.student().reg_no == student.reg_no)
                .cloned()
                .unwrap_or_else(|| FetchResult::Failure {
                    student: student.clone(),
                    reason: REASON_NOT_PROCESSED.to_owned(),
                })
        })
        .collect()
}

/// Returns `true` when `result` matches the free-text `query`.
///
/// The match is a case-insensitive substring test over the union of the
/// student's name, registration number, and LeetCode id, plus the
/// fetched username and real name on successes. A blank query matches
/// everything.
#[must_use]
pub fn matches_query(result: &FetchResult, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }

    let student = result.student();
    let mut haystacks = vec![
        student.name.to_lowercase(),
        student.reg_no.to_lowercase(),
        student.leetcode_id.to_lowercase(),
    ];
    if let Some(data) = result.data() {
        haystacks.push(data.profile.username.to_lowercase());
        if let Some(real_name) = &data.profile.real_name {
            haystacks.push(real_name.to_lowercase());
        }
    }

    haystacks.iter().any(|h| h.contains(&query))
}

/// Indices of the results visible under `query`, in result order.
///
/// Filtering only changes what is shown and selectable; the underlying
/// results are untouched.
#[must_use]
pub fn filter_indices(results: &[FetchResult], query: &str) -> Vec<usize> {
    results
        .iter()
        .enumerate()
        .filter(|(_, r)| matches_query(r, query))
        .map(|(i, _)| i)
        .collect()
}

/// A set of selected result indices, driven by the filtered view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: BTreeSet<usize>,
}

impl Selection {
    /// Creates an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            selected: BTreeSet::new(),
        }
    }

    /// Selects every index in the visible view.
    pub fn select_all(&mut self, visible: &[usize]) {
        self.selected.extend(visible.iter().copied());
    }

    /// Clears the selection.
    pub fn select_none(&mut self) {
        self.selected.clear();
    }

    /// Toggles a single index.
    pub fn toggle(&mut self, index: usize) {
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
    }

    /// Drops selected indices that are no longer visible.
    pub fn retain_visible(&mut self, visible: &[usize]) {
        self.selected.retain(|i| visible.contains(i));
    }

    /// Returns `true` when `index` is selected.
    #[must_use]
    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Returns `true` when every visible index is selected.
    ///
    /// An empty view never counts as fully selected, matching the
    /// header-checkbox convention.
    #[must_use]
    pub fn all_selected(&self, visible: &[usize]) -> bool {
        !visible.is_empty() && visible.iter().all(|i| self.selected.contains(i))
    }

    /// Number of selected indices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns `true` when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }
}
