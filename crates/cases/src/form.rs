//! Raw form input and its validation into a [`BusinessCaseRecord`].
//!
//! Checks run in a fixed order and the first failure wins:
//! 1. every required field is non-blank (all blanks reported together),
//! 2. select fields hold a known value,
//! 3. dates parse as `YYYY-MM-DD`,
//! 4. the end date is not before the start date,
//! 5. the expected benefit is a positive number.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{BenefitUnit, BusinessCaseRecord, Department, ValidationError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One input on the business case form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Description,
    ResponsiblePerson,
    Department,
    ExpectedBenefit,
    BenefitUnit,
    StartDate,
    EndDate,
    AdditionalNotes,
}

impl Field {
    /// Every field, in form order.
    pub const ALL: [Field; 9] = [
        Self::Title,
        Self::Description,
        Self::ResponsiblePerson,
        Self::Department,
        Self::ExpectedBenefit,
        Self::BenefitUnit,
        Self::StartDate,
        Self::EndDate,
        Self::AdditionalNotes,
    ];

    /// Form key, identical to the database column.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Title             => "title",
            Self::Description       => "description",
            Self::ResponsiblePerson => "responsible_person",
            Self::Department        => "department",
            Self::ExpectedBenefit   => "expected_benefit",
            Self::BenefitUnit       => "benefit_unit",
            Self::StartDate         => "start_date",
            Self::EndDate           => "end_date",
            Self::AdditionalNotes   => "additional_notes",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Title             => "Business Case Title",
            Self::Description       => "Business Case Description",
            Self::ResponsiblePerson => "Responsible Person",
            Self::Department        => "Department",
            Self::ExpectedBenefit   => "Expected Benefit",
            Self::BenefitUnit       => "Benefit Unit",
            Self::StartDate         => "Start Date",
            Self::EndDate           => "End Date",
            Self::AdditionalNotes   => "Additional Notes (optional)",
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            Self::Title             => "Enter a short, descriptive title",
            Self::Description       => "Describe the business case in detail",
            Self::ResponsiblePerson => "Name of the person responsible",
            Self::Department        => "Select the responsible department",
            Self::ExpectedBenefit   => "Enter a positive numeric value",
            Self::BenefitUnit       => "Select the unit for the expected benefit",
            Self::StartDate         => "Planned start date",
            Self::EndDate           => "Planned end date",
            Self::AdditionalNotes   => "Optional comments or context",
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, Self::AdditionalNotes)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The form exactly as submitted. Absent keys deserialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessCaseForm {
    pub title: String,
    pub description: String,
    pub responsible_person: String,
    pub department: String,
    pub expected_benefit: String,
    pub benefit_unit: String,
    pub start_date: String,
    pub end_date: String,
    pub additional_notes: String,
}

impl BusinessCaseForm {
    /// A fresh form: both dates on `today`, selects on their first option.
    pub fn blank(today: NaiveDate) -> Self {
        let today = today.format(DATE_FORMAT).to_string();
        Self {
            department: Department::ALL[0].as_str().to_owned(),
            benefit_unit: BenefitUnit::ALL[0].as_str().to_owned(),
            start_date: today.clone(),
            end_date: today,
            ..Self::default()
        }
    }

    /// Raw value of `field`.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Title             => &self.title,
            Field::Description       => &self.description,
            Field::ResponsiblePerson => &self.responsible_person,
            Field::Department        => &self.department,
            Field::ExpectedBenefit   => &self.expected_benefit,
            Field::BenefitUnit       => &self.benefit_unit,
            Field::StartDate         => &self.start_date,
            Field::EndDate           => &self.end_date,
            Field::AdditionalNotes   => &self.additional_notes,
        }
    }

    /// Build a record, or report the first rule the input breaks.
    pub fn validate(&self) -> Result<BusinessCaseRecord, ValidationError> {
        let missing: Vec<Field> = Field::ALL
            .into_iter()
            .filter(|f| f.is_required() && self.value(*f).trim().is_empty())
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let department: Department = parse_choice(Field::Department, &self.department)?;
        let benefit_unit: BenefitUnit = parse_choice(Field::BenefitUnit, &self.benefit_unit)?;

        let start_date = parse_date(Field::StartDate, &self.start_date)?;
        let end_date = parse_date(Field::EndDate, &self.end_date)?;
        if end_date < start_date {
            return Err(ValidationError::EndBeforeStart);
        }

        let expected_benefit = self
            .expected_benefit
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v > 0.0)
            .ok_or(ValidationError::NonPositiveBenefit)?;

        let notes = self.additional_notes.trim();

        Ok(BusinessCaseRecord {
            title: self.title.trim().to_owned(),
            description: self.description.trim().to_owned(),
            responsible_person: self.responsible_person.trim().to_owned(),
            department,
            expected_benefit,
            benefit_unit,
            start_date,
            end_date,
            additional_notes: (!notes.is_empty()).then(|| notes.to_owned()),
        })
    }
}

fn parse_choice<T: FromStr>(field: Field, raw: &str) -> Result<T, ValidationError> {
    raw.trim().parse().map_err(|_| ValidationError::InvalidChoice {
        field,
        value: raw.to_owned(),
    })
}

fn parse_date(field: Field, raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        field,
        value: raw.to_owned(),
    })
}
