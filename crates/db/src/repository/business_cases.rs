//! Business case insert, one statement per backend.

use sqlx::PgConnection;

use crate::{connection::TdsClient, models::NewBusinessCase, DbError};

const INSERT_BUSINESS_CASE: &str = r#"
    INSERT INTO business_cases (
        title,
        description,
        responsible_person,
        department,
        expected_benefit,
        benefit_unit,
        start_date,
        end_date,
        additional_notes,
        created_at
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, now())
    RETURNING id
"#;

const INSERT_BUSINESS_CASE_TDS: &str = r#"
    INSERT INTO business_cases (
        title,
        description,
        responsible_person,
        department,
        expected_benefit,
        benefit_unit,
        start_date,
        end_date,
        additional_notes,
        created_at
    )
    OUTPUT INSERTED.id
    VALUES (@P1, @P2, @P3, @P4, @P5, @P6, @P7, @P8, @P9, SYSDATETIME())
"#;

/// Insert one business case and return the id the database assigned.
///
/// A single parameterized statement; the server commits it atomically.
pub async fn insert_business_case(
    conn: &mut PgConnection,
    row: &NewBusinessCase,
) -> Result<i64, DbError> {
    let id: Option<i64> = sqlx::query_scalar(INSERT_BUSINESS_CASE)
        .bind(&row.title)
        .bind(&row.description)
        .bind(&row.responsible_person)
        .bind(&row.department)
        .bind(row.expected_benefit)
        .bind(&row.benefit_unit)
        .bind(row.start_date)
        .bind(row.end_date)
        .bind(row.additional_notes.as_deref())
        .fetch_optional(&mut *conn)
        .await
        .map_err(DbError::from_statement)?;

    id.ok_or(DbError::MissingId)
}

/// SQL Server flavour of [`insert_business_case`].
pub async fn insert_business_case_tds(
    client: &mut TdsClient,
    row: &NewBusinessCase,
) -> Result<i64, DbError> {
    let inserted = client
        .query(
            INSERT_BUSINESS_CASE_TDS,
            &[
                &row.title,
                &row.description,
                &row.responsible_person,
                &row.department,
                &row.expected_benefit,
                &row.benefit_unit,
                &row.start_date,
                &row.end_date,
                &row.additional_notes,
            ],
        )
        .await
        .map_err(DbError::from_tds_statement)?
        .into_row()
        .await
        .map_err(DbError::from_tds_statement)?;

    inserted
        .and_then(|r| r.get::<i64, _>(0))
        .ok_or(DbError::MissingId)
}
