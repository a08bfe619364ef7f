//! Domain types for a business case.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use db::models::NewBusinessCase;

// ---------------------------------------------------------------------------
// Vocabularies
// ---------------------------------------------------------------------------

/// Department responsible for a business case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Department {
    Finance,
    Operations,
    Sales,
    Marketing,
    Engineering,
    #[serde(rename = "HR")]
    Hr,
}

impl Department {
    /// Every department, in the order the form lists them.
    pub const ALL: [Department; 6] = [
        Self::Finance,
        Self::Operations,
        Self::Sales,
        Self::Marketing,
        Self::Engineering,
        Self::Hr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Finance     => "Finance",
            Self::Operations  => "Operations",
            Self::Sales       => "Sales",
            Self::Marketing   => "Marketing",
            Self::Engineering => "Engineering",
            Self::Hr          => "HR",
        }
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Department {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("unknown department: {s}"))
    }
}

/// Unit the expected benefit is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BenefitUnit {
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "EUR")]
    Eur,
    Hours,
    Units,
}

impl BenefitUnit {
    pub const ALL: [BenefitUnit; 4] = [Self::Usd, Self::Eur, Self::Hours, Self::Units];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Usd   => "USD",
            Self::Eur   => "EUR",
            Self::Hours => "Hours",
            Self::Units => "Units",
        }
    }
}

impl std::fmt::Display for BenefitUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BenefitUnit {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|u| u.as_str() == s)
            .ok_or_else(|| format!("unknown benefit unit: {s}"))
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// Database id of a saved business case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseId(pub i64);

impl std::fmt::Display for CaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated business case, ready to persist.
///
/// Only ever built by [`crate::BusinessCaseForm::validate`], so every required
/// field is non-empty, `end_date >= start_date`, and `expected_benefit > 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessCaseRecord {
    pub title: String,
    pub description: String,
    pub responsible_person: String,
    pub department: Department,
    pub expected_benefit: f64,
    pub benefit_unit: BenefitUnit,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub additional_notes: Option<String>,
}

impl From<&BusinessCaseRecord> for NewBusinessCase {
    fn from(record: &BusinessCaseRecord) -> Self {
        Self {
            title: record.title.clone(),
            description: record.description.clone(),
            responsible_person: record.responsible_person.clone(),
            department: record.department.as_str().to_owned(),
            expected_benefit: record.expected_benefit,
            benefit_unit: record.benefit_unit.as_str().to_owned(),
            start_date: record.start_date,
            end_date: record.end_date,
            additional_notes: record.additional_notes.clone(),
        }
    }
}
