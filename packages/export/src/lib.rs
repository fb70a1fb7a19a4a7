#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! CSV export of batch fetch results.
//!
//! Successful rows and failed rows go to separate files so a failed
//! fetch can never be mistaken for a student with zero solves. Column
//! groups on the results file follow the caller's
//! [`FetchOptions`]: student identity and username are always present,
//! profile, stats, contest, and badge columns are opt-in.

use std::io::Write;

use chrono::NaiveDate;
use leetfetch_fetcher::FetchResult;
use leetfetch_leetcode_models::{FetchOptions, LeetCodeData};

/// Errors from writing an export file.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Flushing the underlying writer failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes the successful results as CSV.
///
/// One row per [`FetchResult::Success`] entry, in the order given;
/// failures are skipped (see [`write_failures`]). Returns the number of
/// rows written.
///
/// # Errors
///
/// Returns [`ExportError`] if writing fails.
pub fn write_results<W: Write>(
    writer: W,
    results: &[FetchResult],
    options: &FetchOptions,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(header(options))?;

    let mut written = 0usize;
    for result in results {
        let Some(data) = result.data() else {
            continue;
        };
        written += 1;
        csv_writer.write_record(row(written, result, data, options))?;
    }

    csv_writer.flush()?;
    Ok(written)
}

/// Writes the failed results as CSV: who failed and why.
///
/// Returns the number of rows written.
///
/// # Errors
///
/// Returns [`ExportError`] if writing fails.
pub fn write_failures<W: Write>(writer: W, results: &[FetchResult]) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["Registration No", "Name", "LeetCode ID", "Reason"])?;

    let mut written = 0usize;
    for result in results {
        let Some(reason) = result.reason() else {
            continue;
        };
        let student = result.student();
        written += 1;
        csv_writer.write_record([
            student.reg_no.as_str(),
            student.name.as_str(),
            student.leetcode_id.as_str(),
            reason,
        ])?;
    }

    csv_writer.flush()?;
    Ok(written)
}

/// Filename for the results file: `leetcode_{department}_{section}_{date}.csv`.
#[must_use]
pub fn results_filename(department: &str, section: &str, date: NaiveDate) -> String {
    format!("leetcode_{department}_{section}_{}.csv", date.format("%Y-%m-%d"))
}

/// Filename for the companion failures file.
#[must_use]
pub fn failures_filename(department: &str, section: &str, date: NaiveDate) -> String {
    format!(
        "leetcode_{department}_{section}_{}_failures.csv",
        date.format("%Y-%m-%d")
    )
}

fn header(options: &FetchOptions) -> Vec<&'static str> {
    let mut columns = vec![
        "S.No",
        "Registration No",
        "Name",
        "Department",
        "Section",
        "Username",
    ];
    if options.include_profile {
        columns.extend(["Real Name", "Company", "School", "Country"]);
    }
    if options.include_ranking {
        columns.push("Ranking");
    }
    if options.include_stats {
        columns.extend([
            "Total Solved",
            "Easy Solved",
            "Medium Solved",
            "Hard Solved",
            "Easy Percentage",
            "Medium Percentage",
            "Hard Percentage",
        ]);
    }
    if options.include_contest {
        columns.extend([
            "Contest Rating",
            "Global Ranking",
            "Contests Attended",
            "Top Percentage",
        ]);
    }
    if options.include_badges {
        columns.extend(["Contest Badge", "Total Badges", "Badge List"]);
    }
    columns
}

fn row(
    serial: usize,
    result: &FetchResult,
    data: &LeetCodeData,
    options: &FetchOptions,
) -> Vec<String> {
    let student = result.student();
    let mut fields = vec![
        serial.to_string(),
        student.reg_no.clone(),
        student.name.clone(),
        student.department.clone(),
        student.section.clone(),
        data.profile.username.clone(),
    ];

    if options.include_profile {
        fields.push(data.profile.real_name.clone().unwrap_or_default());
        fields.push(data.profile.company.clone().unwrap_or_default());
        fields.push(data.profile.school.clone().unwrap_or_default());
        fields.push(data.profile.country_name.clone().unwrap_or_default());
    }
    if options.include_ranking {
        fields.push(opt_num(data.profile.ranking));
    }
    if options.include_stats {
        let stats = &data.stats;
        fields.push(stats.total_solved.to_string());
        fields.push(stats.easy_solved.to_string());
        fields.push(stats.medium_solved.to_string());
        fields.push(stats.hard_solved.to_string());
        fields.push(opt_pct(stats.easy_percentage));
        fields.push(opt_pct(stats.medium_percentage));
        fields.push(opt_pct(stats.hard_percentage));
    }
    if options.include_contest {
        let contest = &data.contest;
        fields.push(opt_pct(contest.rating));
        fields.push(opt_num(contest.global_ranking));
        fields.push(contest.attended_contests_count.to_string());
        fields.push(opt_pct(contest.top_percentage));
    }
    if options.include_badges {
        fields.push(
            data.contest_badge
                .as_ref()
                .map(|b| b.name.clone())
                .unwrap_or_default(),
        );
        fields.push(data.badges.len().to_string());
        fields.push(
            data.badges
                .iter()
                .map(|b| b.display_name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        );
    }

    fields
}

fn opt_num(value: Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn opt_pct(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use leetfetch_fetcher::batch::REASON_MISSING_ID;
    use leetfetch_leetcode_models::{
        LeetCodeBadge, LeetCodeContest, LeetCodeProfile, LeetCodeStats, Student,
    };

    use super::*;

    fn student(reg_no: &str, name: &str, leetcode_id: &str) -> Student {
        Student {
            reg_no: reg_no.to_owned(),
            name: name.to_owned(),
            department: "CSE".to_owned(),
            section: "A".to_owned(),
            leetcode_id: leetcode_id.to_owned(),
        }
    }

    fn sample_results() -> Vec<FetchResult> {
        vec![
            FetchResult::Success {
                student: student("20CS001", "Asha", "asha_codes"),
                data: Box::new(LeetCodeData {
                    profile: LeetCodeProfile {
                        username: "asha_codes".to_owned(),
                        real_name: Some("Asha R".to_owned()),
                        ranking: Some(51234),
                        ..LeetCodeProfile::default()
                    },
                    stats: LeetCodeStats {
                        total_solved: 310,
                        easy_solved: 150,
                        medium_solved: 120,
                        hard_solved: 40,
                        easy_percentage: Some(91.2),
                        ..LeetCodeStats::default()
                    },
                    contest: LeetCodeContest {
                        rating: Some(1674.24),
                        global_ranking: Some(45123),
                        attended_contests_count: 14,
                        ..LeetCodeContest::default()
                    },
                    badges: vec![LeetCodeBadge {
                        id: "1".to_owned(),
                        display_name: "50 Days Badge 2024".to_owned(),
                        icon: String::new(),
                        creation_date: None,
                    }],
                    contest_badge: None,
                }),
            },
            FetchResult::Failure {
                student: student("20CS002", "Bharat", ""),
                reason: REASON_MISSING_ID.to_owned(),
            },
        ]
    }

    fn export_string(results: &[FetchResult], options: &FetchOptions) -> String {
        let mut buffer = Vec::new();
        write_results(&mut buffer, results, options).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn successes_only_with_default_columns() {
        let results = sample_results();
        let text = export_string(&results, &FetchOptions::default());
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("S.No,Registration No,Name,Department,Section,Username"));
        assert!(header.contains("Total Solved"));
        assert!(header.contains("Contest Rating"));
        // Badges are off by default.
        assert!(!header.contains("Badge List"));

        let row = lines.next().unwrap();
        assert!(row.starts_with("1,20CS001,Asha,CSE,A,asha_codes"));
        assert!(row.contains("310"));
        assert!(row.contains("1674.24"));
        // The failed student must not appear here.
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn option_flags_gate_column_groups() {
        let results = sample_results();
        let options = FetchOptions {
            include_profile: false,
            include_stats: false,
            include_contest: false,
            include_badges: true,
            include_ranking: false,
        };
        let text = export_string(&results, &options);
        let header = text.lines().next().unwrap();

        assert_eq!(
            header,
            "S.No,Registration No,Name,Department,Section,Username,\
             Contest Badge,Total Badges,Badge List"
        );
        let row = text.lines().nth(1).unwrap();
        assert!(row.contains("50 Days Badge 2024"));
    }

    #[test]
    fn every_row_has_the_header_width() {
        let results = sample_results();
        let options = FetchOptions {
            include_badges: true,
            ..FetchOptions::default()
        };
        let text = export_string(&results, &options);
        let mut lines = text.lines();
        let width = lines.next().unwrap().split(',').count();
        for line in lines {
            assert_eq!(line.split(',').count(), width, "line: {line}");
        }
    }

    #[test]
    fn failures_file_lists_who_and_why() {
        let results = sample_results();
        let mut buffer = Vec::new();
        let written = write_failures(&mut buffer, &results).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert_eq!(written, 1);
        assert_eq!(
            text.lines().next().unwrap(),
            "Registration No,Name,LeetCode ID,Reason"
        );
        assert!(text.lines().nth(1).unwrap().contains(REASON_MISSING_ID));
    }

    #[test]
    fn empty_results_produce_just_the_header() {
        let mut buffer = Vec::new();
        let written = write_results(&mut buffer, &[], &FetchOptions::default()).unwrap();
        assert_eq!(written, 0);
        assert_eq!(String::from_utf8(buffer).unwrap().lines().count(), 1);
    }

    #[test]
    fn filenames_embed_department_section_and_date() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        assert_eq!(
            results_filename("CSE", "A", date),
            "leetcode_CSE_A_2026-08-06.csv"
        );
        assert_eq!(
            failures_filename("CSE", "A", date),
            "leetcode_CSE_A_2026-08-06_failures.csv"
        );
    }
}
