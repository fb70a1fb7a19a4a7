//! GraphQL query documents and request bodies.
//!
//! The documents match what the LeetCode web frontend sends, which keeps
//! this client indistinguishable from a browser session.

/// Public profile, solve statistics, and beats-percentages for one user.
pub const PROFILE_QUERY: &str = r"
query userPublicProfile($username: String!) {
  matchedUser(username: $username) {
    contestBadge {
      name
      expired
      hoverText
      icon
    }
    username
    githubUrl
    twitterUrl
    linkedinUrl
    profile {
      ranking
      userAvatar
      realName
      aboutMe
      school
      websites
      countryName
      company
      jobTitle
      skillTags
      postViewCount
      postViewCountDiff
      reputation
      reputationDiff
    }
    problemsSolvedBeatsStats {
      difficulty
      percentage
    }
    submitStatsGlobal {
      acSubmissionNum {
        difficulty
        count
        submissions
      }
    }
  }
}
";

/// Contest rating and attendance for one user.
pub const CONTEST_QUERY: &str = r"
query userContestRankingInfo($username: String!) {
  userContestRanking(username: $username) {
    attendedContestsCount
    rating
    globalRanking
    totalParticipants
    topPercentage
    badge {
      name
    }
  }
}
";

/// Earned badges and the currently active badge for one user.
pub const BADGES_QUERY: &str = r"
query userBadges($username: String!) {
  matchedUser(username: $username) {
    badges {
      id
      displayName
      icon
      creationDate
    }
    activeBadge {
      id
      displayName
      icon
    }
  }
}
";

/// Builds the POST body for `query` against `username`.
#[must_use]
pub fn request_body(query: &str, username: &str) -> serde_json::Value {
    serde_json::json!({
        "query": query,
        "variables": { "username": username },
    })
}
