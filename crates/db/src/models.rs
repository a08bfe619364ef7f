//! Row structs that map 1-to-1 onto database tables.
//!
//! These are *persistence* models — they carry no domain behaviour.
//! Domain types live in the `cases` crate.

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// business_cases
// ---------------------------------------------------------------------------

/// Column values for one `business_cases` insert.
///
/// `id` and `created_at` are assigned by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBusinessCase {
    pub title: String,
    pub description: String,
    pub responsible_person: String,
    pub department: String,
    pub expected_benefit: f64,
    pub benefit_unit: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// `NULL` when the user left the notes blank.
    pub additional_notes: Option<String>,
}
