//! Response parsing and normalization.
//!
//! The GraphQL responses are picked apart into the shared model types.
//! Parsing is strict only where it has to be: a profile response without
//! a username is an error, but contest and badge payloads degrade to
//! defaults since plenty of accounts have neither.

use std::str::FromStr as _;

use leetfetch_fetcher::LookupError;
use leetfetch_leetcode_models::{
    ContestBadge, Difficulty, LeetCodeBadge, LeetCodeContest, LeetCodeProfile, LeetCodeStats,
};
use serde::Deserialize;

/// The `matchedUser` subtree of the profile response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedUser {
    /// Canonical username.
    pub username: String,
    /// Contest badge shown on the profile page.
    #[serde(default)]
    pub contest_badge: Option<ContestBadge>,
    /// Nested profile fields.
    #[serde(default)]
    pub profile: Option<RawProfile>,
    /// Beats-percentages per difficulty.
    #[serde(default)]
    pub problems_solved_beats_stats: Option<Vec<BeatsStat>>,
    /// Accepted-submission counts per difficulty.
    #[serde(default)]
    pub submit_stats_global: Option<SubmitStats>,
}

/// The `profile` subtree of a matched user.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawProfile {
    pub real_name: Option<String>,
    pub ranking: Option<u64>,
    pub company: Option<String>,
    pub school: Option<String>,
    pub country_name: Option<String>,
    pub user_avatar: Option<String>,
    pub about_me: Option<String>,
    pub websites: Option<Vec<String>>,
    pub skill_tags: Option<Vec<String>>,
    pub post_view_count: Option<u64>,
    pub reputation: Option<i64>,
}

/// One beats-percentage entry.
#[derive(Debug, Deserialize)]
pub struct BeatsStat {
    /// Difficulty bucket name, including the `All` aggregate.
    pub difficulty: String,
    /// Percentage of users beaten; null for unattempted difficulties.
    pub percentage: Option<f64>,
}

/// The `submitStatsGlobal` subtree.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitStats {
    /// Accepted-submission counts per difficulty bucket.
    #[serde(default)]
    pub ac_submission_num: Vec<AcStat>,
}

/// One accepted-submission count entry.
#[derive(Debug, Deserialize)]
pub struct AcStat {
    /// Difficulty bucket name, including the `All` aggregate.
    pub difficulty: String,
    /// Number of accepted problems in this bucket.
    pub count: u32,
}

/// The `userContestRanking` subtree of the contest response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContest {
    #[serde(default)]
    attended_contests_count: u32,
    rating: Option<f64>,
    /// Arrives as a float from the API despite being a rank.
    global_ranking: Option<f64>,
    top_percentage: Option<f64>,
    badge: Option<RawContestBadgeName>,
}

#[derive(Debug, Deserialize)]
struct RawContestBadgeName {
    name: String,
}

/// Returns the first GraphQL error message in `body`, if any.
fn first_error(body: &serde_json::Value) -> Option<String> {
    body["errors"][0]["message"].as_str().map(String::from)
}

/// Parses the profile response.
///
/// Returns `Ok(None)` when the service knows no such user
/// (`matchedUser` is null).
///
/// # Errors
///
/// Returns [`LookupError::GraphQl`] when the response carries a GraphQL
/// error, or [`LookupError::Parse`] when `matchedUser` does not have the
/// expected shape.
pub fn parse_profile(body: &serde_json::Value) -> Result<Option<MatchedUser>, LookupError> {
    if let Some(message) = first_error(body) {
        return Err(LookupError::GraphQl { message });
    }

    let user = &body["data"]["matchedUser"];
    if user.is_null() {
        return Ok(None);
    }

    serde_json::from_value(user.clone())
        .map(Some)
        .map_err(|e| LookupError::Parse {
            message: format!("matchedUser: {e}"),
        })
}

/// Builds the profile model from a matched user.
#[must_use]
pub fn build_profile(user: &MatchedUser) -> LeetCodeProfile {
    let raw = user.profile.as_ref();
    LeetCodeProfile {
        username: user.username.clone(),
        real_name: raw.and_then(|p| p.real_name.clone()),
        ranking: raw.and_then(|p| p.ranking),
        company: raw.and_then(|p| p.company.clone()),
        school: raw.and_then(|p| p.school.clone()),
        country_name: raw.and_then(|p| p.country_name.clone()),
        user_avatar: raw.and_then(|p| p.user_avatar.clone()),
        about_me: raw.and_then(|p| p.about_me.clone()),
        websites: raw.and_then(|p| p.websites.clone()).unwrap_or_default(),
        skill_tags: raw.and_then(|p| p.skill_tags.clone()).unwrap_or_default(),
        post_view_count: raw.and_then(|p| p.post_view_count),
        reputation: raw.and_then(|p| p.reputation),
    }
}

/// Sums per-difficulty solve counts and attaches beats-percentages.
///
/// The API's `All` bucket is skipped on both lists; summing it alongside
/// the per-difficulty buckets would double count.
#[must_use]
pub fn extract_stats(user: &MatchedUser) -> LeetCodeStats {
    let mut stats = LeetCodeStats::default();

    if let Some(submit) = &user.submit_stats_global {
        for entry in &submit.ac_submission_num {
            let Ok(difficulty) = Difficulty::from_str(&entry.difficulty) else {
                continue;
            };
            match difficulty {
                Difficulty::Easy => stats.easy_solved = entry.count,
                Difficulty::Medium => stats.medium_solved = entry.count,
                Difficulty::Hard => stats.hard_solved = entry.count,
            }
            stats.total_solved += entry.count;
        }
    }

    if let Some(beats) = &user.problems_solved_beats_stats {
        for entry in beats {
            let Ok(difficulty) = Difficulty::from_str(&entry.difficulty) else {
                continue;
            };
            match difficulty {
                Difficulty::Easy => stats.easy_percentage = entry.percentage,
                Difficulty::Medium => stats.medium_percentage = entry.percentage,
                Difficulty::Hard => stats.hard_percentage = entry.percentage,
            }
        }
    }

    stats
}

/// Parses the contest response into a normalized summary.
///
/// Returns `None` for any failure shape: GraphQL errors, a null
/// `userContestRanking` (never attended), or an unexpected body. The
/// caller treats all of these as "no contest data".
#[must_use]
pub fn parse_contest(body: &serde_json::Value) -> Option<LeetCodeContest> {
    if first_error(body).is_some() {
        return None;
    }

    let ranking = &body["data"]["userContestRanking"];
    if ranking.is_null() {
        return None;
    }

    let raw: RawContest = serde_json::from_value(ranking.clone()).ok()?;

    Some(LeetCodeContest {
        rating: raw.rating.map(round_rating),
        global_ranking: raw.global_ranking.and_then(coerce_ranking),
        attended_contests_count: raw.attended_contests_count,
        top_percentage: raw.top_percentage,
        badge_name: raw.badge.map(|b| b.name),
    })
}

/// Parses the badges response into a flat badge list.
///
/// The currently active badge is appended to the earned list, matching
/// how the profile page displays it. Any failure shape yields an empty
/// list.
#[must_use]
pub fn parse_badges(body: &serde_json::Value) -> Vec<LeetCodeBadge> {
    let user = &body["data"]["matchedUser"];
    if user.is_null() {
        return Vec::new();
    }

    let mut badges: Vec<LeetCodeBadge> =
        serde_json::from_value(user["badges"].clone()).unwrap_or_default();

    if let Ok(active) = serde_json::from_value::<LeetCodeBadge>(user["activeBadge"].clone()) {
        badges.push(active);
    }

    badges
}

/// Rounds a contest rating to two decimals.
fn round_rating(rating: f64) -> f64 {
    (rating * 100.0).round() / 100.0
}

/// Coerces the API's float ranking into an integer rank.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn coerce_ranking(value: f64) -> Option<u64> {
    if value.is_finite() && value >= 0.0 {
        Some(value.round() as u64)
    } else {
        None
    }
}
