#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line tool for bulk-fetching LeetCode profiles.
//!
//! Reads a student roster CSV, fetches each student's LeetCode data
//! through the rate-limited batch fetcher, and writes the results and
//! failures as CSV files. Run with no subcommand for a `dialoguer`
//! menu.
//!
//! Uses `indicatif-log-bridge` (via [`progress::init_logger`]) to route
//! `log` output through `indicatif::MultiProgress` so that log lines
//! and the progress bar never fight for the terminal.

mod check;
mod fetch;
mod interactive;
mod progress;
mod roster;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use leetfetch_fetcher::batch::{DEFAULT_DELAY_MS, DEFAULT_LOOKUP_TIMEOUT_SECS};
use leetfetch_leetcode_models::FetchOptions;

use crate::fetch::FetchParams;

#[derive(Parser)]
#[command(name = "leetfetch", about = "Bulk LeetCode profile fetcher")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch profiles for every student in a roster CSV
    Fetch {
        /// Roster CSV with header `reg_no,name,department,section,leetcode_id`
        roster: PathBuf,
        /// Results CSV path (default: `leetcode_{dept}_{section}_{date}.csv`)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Failures CSV path (default: derived from the results path inputs)
        #[arg(long)]
        failures: Option<PathBuf>,
        /// Delay between consecutive lookups, in milliseconds
        #[arg(long, default_value_t = DEFAULT_DELAY_MS)]
        delay_ms: u64,
        /// Per-lookup timeout, in seconds
        #[arg(long, default_value_t = DEFAULT_LOOKUP_TIMEOUT_SECS)]
        timeout_secs: u64,
        /// Client config TOML (endpoint, headers, HTTP timeout)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Only export rows matching this text (name, reg no, or username)
        #[arg(long)]
        filter: Option<String>,
        /// Department label for generated filenames
        #[arg(long)]
        department: Option<String>,
        /// Section label for generated filenames
        #[arg(long)]
        section: Option<String>,
        /// Include badge columns in the export
        #[arg(long)]
        badges: bool,
        /// Skip profile columns (real name, company, school, country)
        #[arg(long)]
        no_profile: bool,
        /// Skip solve-count and percentage columns
        #[arg(long)]
        no_stats: bool,
        /// Skip contest columns
        #[arg(long)]
        no_contest: bool,
        /// Skip the site-wide ranking column
        #[arg(long)]
        no_ranking: bool,
    },
    /// Fetch a single username and print a report
    Check {
        /// LeetCode username
        username: String,
        /// Client config TOML (endpoint, headers, HTTP timeout)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Parse a roster CSV and list its students
    Roster {
        /// Roster CSV path
        roster: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = progress::init_logger();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run(&multi).await;
    };

    match command {
        Commands::Fetch {
            roster,
            output,
            failures,
            delay_ms,
            timeout_secs,
            config,
            filter,
            department,
            section,
            badges,
            no_profile,
            no_stats,
            no_contest,
            no_ranking,
        } => {
            let params = FetchParams {
                roster,
                output,
                failures,
                delay_ms,
                timeout_secs,
                config,
                filter,
                department,
                section,
                options: FetchOptions {
                    include_profile: !no_profile,
                    include_stats: !no_stats,
                    include_contest: !no_contest,
                    include_badges: badges,
                    include_ranking: !no_ranking,
                },
            };
            fetch::run(&multi, params).await?;
        }
        Commands::Check { username, config } => {
            check::run(&username, config.as_deref()).await?;
        }
        Commands::Roster { roster } => list_roster(&roster)?,
    }

    Ok(())
}

/// Prints a roster as a table, flagging students without a LeetCode id.
fn list_roster(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let students = roster::load_roster(path)?;

    println!("{:<12} {:<24} {:<6} {:<4} LEETCODE ID", "REG NO", "NAME", "DEPT", "SEC");
    println!("{}", "-".repeat(70));
    for student in &students {
        let id = if student.has_leetcode_id() {
            student.leetcode_id.as_str()
        } else {
            "(none)"
        };
        println!(
            "{:<12} {:<24} {:<6} {:<4} {id}",
            student.reg_no, student.name, student.department, student.section
        );
    }
    println!();

    let missing = students.iter().filter(|s| !s.has_leetcode_id()).count();
    println!("{} students, {missing} without a LeetCode id", students.len());

    Ok(())
}
