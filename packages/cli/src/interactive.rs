//! Menu-driven interface for running the tool without CLI flags.

use std::path::PathBuf;

use dialoguer::{Confirm, Input, Select};
use indicatif::MultiProgress;
use leetfetch_fetcher::batch::{DEFAULT_DELAY_MS, DEFAULT_LOOKUP_TIMEOUT_SECS};
use leetfetch_leetcode_models::FetchOptions;

use crate::fetch::{self, FetchParams};

/// Top-level actions available in the interactive menu.
enum Action {
    FetchRoster,
    CheckUser,
    ListRoster,
}

impl Action {
    const ALL: &[Self] = &[Self::FetchRoster, Self::CheckUser, Self::ListRoster];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::FetchRoster => "Fetch profiles for a roster",
            Self::CheckUser => "Check a single username",
            Self::ListRoster => "List a roster file",
        }
    }
}

/// Runs the interactive menu.
///
/// # Errors
///
/// Returns an error if a prompt fails or the selected action fails.
pub async fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::FetchRoster => fetch_roster(multi).await,
        Action::CheckUser => {
            let username: String = Input::new()
                .with_prompt("LeetCode username")
                .interact_text()?;
            crate::check::run(&username, None).await
        }
        Action::ListRoster => {
            let path = prompt_roster_path()?;
            crate::list_roster(&path)
        }
    }
}

async fn fetch_roster(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let roster = prompt_roster_path()?;

    let delay_ms: u64 = Input::new()
        .with_prompt("Delay between requests (ms)")
        .default(DEFAULT_DELAY_MS)
        .interact_text()?;

    let filter: String = Input::new()
        .with_prompt("Filter exported rows (empty for all)")
        .allow_empty(true)
        .interact_text()?;

    let include_badges = Confirm::new()
        .with_prompt("Include badge columns?")
        .default(false)
        .interact()?;

    let params = FetchParams {
        roster,
        output: None,
        failures: None,
        delay_ms,
        timeout_secs: DEFAULT_LOOKUP_TIMEOUT_SECS,
        config: None,
        filter: if filter.trim().is_empty() {
            None
        } else {
            Some(filter)
        },
        department: None,
        section: None,
        options: FetchOptions {
            include_badges,
            ..FetchOptions::default()
        },
    };

    fetch::run(multi, params).await
}

fn prompt_roster_path() -> Result<PathBuf, dialoguer::Error> {
    let path: String = Input::new()
        .with_prompt("Roster CSV path")
        .default("students.csv".to_owned())
        .interact_text()?;
    Ok(PathBuf::from(path))
}
