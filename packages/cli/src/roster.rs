//! Roster CSV loading.
//!
//! Expected header: `reg_no,name,department,section,leetcode_id`. The
//! `leetcode_id` column may be empty; such students are still part of
//! the run and end up as failures so the export accounts for everyone.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use leetfetch_leetcode_models::Student;

/// Errors from loading a roster file.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    /// The file could not be opened.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A row could not be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Reads a roster from any reader.
///
/// # Errors
///
/// Returns [`RosterError`] if any row fails to parse.
pub fn read_roster<R: Read>(reader: R) -> Result<Vec<Student>, RosterError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut students = Vec::new();
    for record in csv_reader.deserialize() {
        students.push(record?);
    }
    Ok(students)
}

/// Loads a roster from a file path.
///
/// # Errors
///
/// Returns [`RosterError`] if the file cannot be opened or parsed.
pub fn load_roster(path: &Path) -> Result<Vec<Student>, RosterError> {
    read_roster(File::open(path)?)
}
