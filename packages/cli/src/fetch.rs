//! The `fetch` command: roster in, CSV files out.

use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use indicatif::MultiProgress;
use leetfetch_export::{failures_filename, results_filename, write_failures, write_results};
use leetfetch_fetcher::report::{self, Selection};
use leetfetch_fetcher::{BatchFetcher, CancelToken, FetchResult};
use leetfetch_leetcode::{ClientConfig, LeetCodeClient};
use leetfetch_leetcode_models::FetchOptions;

use crate::progress::IndicatifProgress;
use crate::roster;

/// Everything the fetch command needs, from either clap or the
/// interactive prompts.
pub struct FetchParams {
    /// Path to the roster CSV.
    pub roster: PathBuf,
    /// Results file; derived from department/section/date when absent.
    pub output: Option<PathBuf>,
    /// Failures file; derived when absent.
    pub failures: Option<PathBuf>,
    /// Delay between consecutive lookups, in milliseconds.
    pub delay_ms: u64,
    /// Per-lookup timeout, in seconds.
    pub timeout_secs: u64,
    /// Optional client config TOML.
    pub config: Option<PathBuf>,
    /// Free-text filter applied to the exported rows.
    pub filter: Option<String>,
    /// Department label for generated filenames.
    pub department: Option<String>,
    /// Section label for generated filenames.
    pub section: Option<String>,
    /// Column groups to export.
    pub options: FetchOptions,
}

/// Runs the whole fetch flow: load, fetch, reconcile, filter, export.
///
/// Ctrl-C cancels cooperatively: the student being fetched finishes or
/// times out, everyone the run never reached is exported as a
/// "not processed" failure.
///
/// # Errors
///
/// Returns an error if the roster cannot be read, the client cannot be
/// built, or an output file cannot be written.
pub async fn run(
    multi: &MultiProgress,
    params: FetchParams,
) -> Result<(), Box<dyn std::error::Error>> {
    let students = roster::load_roster(&params.roster)?;
    if students.is_empty() {
        log::warn!("roster {} has no students", params.roster.display());
        return Ok(());
    }
    log::info!(
        "loaded {} students from {}",
        students.len(),
        params.roster.display()
    );

    let config = match &params.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    let client = LeetCodeClient::new(config)?;

    let fetcher = BatchFetcher::new()
        .with_delay_ms(params.delay_ms)
        .with_lookup_timeout(Duration::from_secs(params.timeout_secs));

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!("cancelling; finishing the in-flight request");
                cancel.cancel();
            }
        });
    }

    let progress = IndicatifProgress::fetch_bar(multi, "Fetching LeetCode profiles");
    let batch = fetcher.run(&students, &client, &progress, &cancel).await;

    let results = report::reconcile(&students, &batch.results);
    for result in &results {
        if let Some(reason) = result.reason() {
            let student = result.student();
            log::warn!("{} ({}): {reason}", student.name, student.reg_no);
        }
    }

    let query = params.filter.as_deref().unwrap_or("");
    let visible = report::filter_indices(&results, query);
    if !query.is_empty() {
        log::info!("filter '{query}' matches {} of {} rows", visible.len(), results.len());
    }
    let mut selection = Selection::new();
    selection.select_all(&visible);
    let selected: Vec<FetchResult> = selection.iter().map(|i| results[i].clone()).collect();

    let department = params
        .department
        .or_else(|| students.first().map(|s| s.department.clone()))
        .unwrap_or_else(|| "ALL".to_owned());
    let section = params
        .section
        .or_else(|| students.first().map(|s| s.section.clone()))
        .unwrap_or_else(|| "ALL".to_owned());
    let date = chrono::Local::now().date_naive();

    let output = params
        .output
        .unwrap_or_else(|| PathBuf::from(results_filename(&department, &section, date)));
    let failures = params
        .failures
        .unwrap_or_else(|| PathBuf::from(failures_filename(&department, &section, date)));

    let ok_rows = write_results(File::create(&output)?, &selected, &params.options)?;
    let failed_rows = write_failures(File::create(&failures)?, &selected)?;

    log::info!("{ok_rows} profiles written to {}", output.display());
    log::info!("{failed_rows} failures written to {}", failures.display());
    log::info!(
        "done: {} of {} fetched ({} failed)",
        batch.success_count(),
        students.len(),
        results.len() - batch.success_count(),
    );

    Ok(())
}
