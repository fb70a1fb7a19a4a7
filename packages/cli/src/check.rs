//! The `check` command: fetch and print a single user's profile.

use std::path::Path;

use leetfetch_leetcode::{ClientConfig, LeetCodeClient};
use leetfetch_leetcode_models::LeetCodeData;

/// Fetches one username and prints a formatted report.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the profile
/// request fails outright. An unknown username is not an error; it
/// prints a message and returns normally.
pub async fn run(username: &str, config: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    let client = LeetCodeClient::new(config)?;

    log::info!("fetching {username}...");
    let Some(data) = client.fetch_user(username).await? else {
        println!("User '{username}' not found (or the profile is private).");
        return Ok(());
    };

    print_report(&data);
    Ok(())
}

fn print_report(data: &LeetCodeData) {
    let profile = &data.profile;

    println!("PROFILE");
    println!("{}", "-".repeat(40));
    println!("{:<18} {}", "Username", profile.username);
    if let Some(real_name) = &profile.real_name {
        println!("{:<18} {real_name}", "Real name");
    }
    if let Some(ranking) = profile.ranking {
        println!("{:<18} #{ranking}", "Global ranking");
    }
    if let Some(company) = &profile.company {
        println!("{:<18} {company}", "Company");
    }
    if let Some(school) = &profile.school {
        println!("{:<18} {school}", "School");
    }
    if let Some(country) = &profile.country_name {
        println!("{:<18} {country}", "Country");
    }

    let stats = &data.stats;
    println!();
    println!("PROBLEMS SOLVED");
    println!("{}", "-".repeat(40));
    println!("{:<18} {}", "Total", stats.total_solved);
    println!("{:<18} {}", "Easy", stats.easy_solved);
    println!("{:<18} {}", "Medium", stats.medium_solved);
    println!("{:<18} {}", "Hard", stats.hard_solved);
    for (label, pct) in [
        ("Easy beats", stats.easy_percentage),
        ("Medium beats", stats.medium_percentage),
        ("Hard beats", stats.hard_percentage),
    ] {
        if let Some(pct) = pct {
            println!("{label:<18} {pct:.1}%");
        }
    }

    let contest = &data.contest;
    println!();
    println!("CONTESTS");
    println!("{}", "-".repeat(40));
    if contest.attended_contests_count == 0 && contest.rating.is_none() {
        println!("No contest data available");
    } else {
        if let Some(rating) = contest.rating {
            println!("{:<18} {rating:.2}", "Rating");
        }
        if let Some(ranking) = contest.global_ranking {
            println!("{:<18} #{ranking}", "Global ranking");
        }
        println!("{:<18} {}", "Attended", contest.attended_contests_count);
        if let Some(top) = contest.top_percentage {
            println!("{:<18} top {top:.2}%", "Percentile");
        }
        if let Some(badge) = &contest.badge_name {
            println!("{:<18} {badge}", "Badge");
        }
    }

    println!();
    println!("BADGES");
    println!("{}", "-".repeat(40));
    if let Some(contest_badge) = &data.contest_badge {
        let status = if contest_badge.expired {
            "expired"
        } else {
            "active"
        };
        println!("{:<18} {} ({status})", "Contest badge", contest_badge.name);
    }
    if data.badges.is_empty() {
        println!("No badges earned yet");
    } else {
        println!("{:<18} {}", "Total", data.badges.len());
        for badge in &data.badges {
            match &badge.creation_date {
                Some(date) => println!("  {} (earned {date})", badge.display_name),
                None => println!("  {}", badge.display_name),
            }
        }
    }
}
