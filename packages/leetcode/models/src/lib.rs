#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Roster and LeetCode profile data types.
//!
//! Every part of the workspace shares these shapes: the roster loader
//! produces [`Student`] records, the LeetCode client produces
//! [`LeetCodeData`], and the exporter consumes both. Field names on the
//! profile types mirror the GraphQL API's camelCase wire format.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One roster entry: a student whose LeetCode profile should be fetched.
///
/// `reg_no`, `name`, `department`, and `section` are passthrough fields
/// used only to correlate and label results. `leetcode_id` is the
/// LeetCode username to query; it may be blank for students who never
/// submitted one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// College registration number, unique within a roster.
    pub reg_no: String,
    /// Student's full name.
    pub name: String,
    /// Department code (e.g., "CSE").
    pub department: String,
    /// Class section (e.g., "A").
    pub section: String,
    /// LeetCode username. Blank when the student has not provided one.
    #[serde(default)]
    pub leetcode_id: String,
}

impl Student {
    /// Returns `true` when this student has a usable LeetCode username.
    #[must_use]
    pub fn has_leetcode_id(&self) -> bool {
        !self.leetcode_id.trim().is_empty()
    }
}

/// Problem difficulty buckets as reported by the LeetCode API.
///
/// The API also reports an `All` aggregate bucket; that string does not
/// parse into this enum, which is how callers skip it when summing
/// per-difficulty counts.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Difficulty {
    /// Easy problems.
    Easy,
    /// Medium problems.
    Medium,
    /// Hard problems.
    Hard,
}

/// Public profile fields for one LeetCode user.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeProfile {
    /// Canonical username. Always present on a well-formed profile.
    pub username: String,
    /// Display name, if the user set one.
    pub real_name: Option<String>,
    /// Site-wide problem-solving rank.
    pub ranking: Option<u64>,
    /// Employer, if listed.
    pub company: Option<String>,
    /// School, if listed.
    pub school: Option<String>,
    /// Country display name, if listed.
    pub country_name: Option<String>,
    /// Avatar image URL.
    pub user_avatar: Option<String>,
    /// Free-form bio text.
    pub about_me: Option<String>,
    /// Personal website URLs.
    #[serde(default)]
    pub websites: Vec<String>,
    /// Self-reported skill tags.
    #[serde(default)]
    pub skill_tags: Vec<String>,
    /// Discussion post view count.
    pub post_view_count: Option<u64>,
    /// Community reputation score.
    pub reputation: Option<i64>,
}

/// Per-difficulty accepted-submission counts plus beats-percentages.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeStats {
    /// Sum of the three per-difficulty counts. The API's `All` bucket is
    /// never used here because it would double count.
    pub total_solved: u32,
    /// Accepted Easy problems.
    pub easy_solved: u32,
    /// Accepted Medium problems.
    pub medium_solved: u32,
    /// Accepted Hard problems.
    pub hard_solved: u32,
    /// Percentage of users beaten on Easy problems.
    pub easy_percentage: Option<f64>,
    /// Percentage of users beaten on Medium problems.
    pub medium_percentage: Option<f64>,
    /// Percentage of users beaten on Hard problems.
    pub hard_percentage: Option<f64>,
}

/// Contest participation summary for one user.
///
/// Users who never attended a contest have no ranking record at all;
/// `Default` models that case (zero contests, no rating).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeContest {
    /// Contest rating, rounded to two decimals.
    pub rating: Option<f64>,
    /// Global contest ranking position.
    pub global_ranking: Option<u64>,
    /// Number of contests attended.
    pub attended_contests_count: u32,
    /// Top percentage bracket (e.g., 5.2 means top 5.2%).
    pub top_percentage: Option<f64>,
    /// Contest badge name (e.g., "Knight", "Guardian").
    pub badge_name: Option<String>,
}

/// One earned achievement badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeBadge {
    /// Badge identifier.
    pub id: String,
    /// Human-readable badge name.
    pub display_name: String,
    /// Badge icon URL.
    pub icon: String,
    /// Date the badge was earned, as reported by the API.
    pub creation_date: Option<String>,
}

/// The contest badge shown on the profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestBadge {
    /// Badge name.
    pub name: String,
    /// Whether the badge has expired.
    #[serde(default)]
    pub expired: bool,
    /// Tooltip text.
    pub hover_text: Option<String>,
    /// Badge icon URL.
    pub icon: Option<String>,
}

/// Everything fetched for one LeetCode user.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeData {
    /// Public profile fields.
    pub profile: LeetCodeProfile,
    /// Solved-problem statistics.
    pub stats: LeetCodeStats,
    /// Contest participation summary.
    pub contest: LeetCodeContest,
    /// Earned achievement badges.
    #[serde(default)]
    pub badges: Vec<LeetCodeBadge>,
    /// Contest badge from the profile page, if any.
    pub contest_badge: Option<ContestBadge>,
}

impl LeetCodeData {
    /// Returns `true` when the record carries the identifying username.
    ///
    /// A response without a username is treated as not-found: private
    /// and deleted accounts sometimes come back as an empty shell.
    #[must_use]
    pub fn has_username(&self) -> bool {
        !self.profile.username.trim().is_empty()
    }
}

/// Which column groups to include when exporting fetched data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchOptions {
    /// Real name, company, school, country.
    pub include_profile: bool,
    /// Solved counts and beats-percentages.
    pub include_stats: bool,
    /// Contest rating, ranking, attendance.
    pub include_contest: bool,
    /// Badge counts and names.
    pub include_badges: bool,
    /// Site-wide problem-solving rank.
    pub include_ranking: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            include_profile: true,
            include_stats: true,
            include_contest: true,
            include_badges: false,
            include_ranking: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn difficulty_parses_api_buckets() {
        assert_eq!(Difficulty::from_str("Easy").unwrap(), Difficulty::Easy);
        assert_eq!(Difficulty::from_str("Medium").unwrap(), Difficulty::Medium);
        assert_eq!(Difficulty::from_str("Hard").unwrap(), Difficulty::Hard);
        // The aggregate bucket must not parse; summing it would double count.
        assert!(Difficulty::from_str("All").is_err());
    }

    #[test]
    fn blank_leetcode_id_is_not_usable() {
        let mut student = Student {
            reg_no: "20CS001".to_owned(),
            name: "Asha".to_owned(),
            department: "CSE".to_owned(),
            section: "A".to_owned(),
            leetcode_id: "  ".to_owned(),
        };
        assert!(!student.has_leetcode_id());
        student.leetcode_id = "asha_codes".to_owned();
        assert!(student.has_leetcode_id());
    }

    #[test]
    fn well_formed_data_requires_username() {
        let mut data = LeetCodeData::default();
        assert!(!data.has_username());
        data.profile.username = "alice".to_owned();
        assert!(data.has_username());
    }
}
