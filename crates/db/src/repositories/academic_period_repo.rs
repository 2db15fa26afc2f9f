//! Repository for the `academic_periods` table.

use sqlx::PgPool;

use crate::models::academic_period::{AcademicPeriod, CreateAcademicPeriod};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, code, starts_on, ends_on, report_deadline, created_at";

/// Provides CRUD operations for academic periods.
pub struct AcademicPeriodRepo;

impl AcademicPeriodRepo {
    /// Register a new academic period, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAcademicPeriod,
    ) -> Result<AcademicPeriod, sqlx::Error> {
        let query = format!(
            "INSERT INTO academic_periods (code, starts_on, ends_on, report_deadline)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AcademicPeriod>(&query)
            .bind(&input.code)
            .bind(input.starts_on)
            .bind(input.ends_on)
            .bind(input.report_deadline)
            .fetch_one(pool)
            .await
    }

    /// Find a period by its code (e.g. `"2026-1"`).
    pub async fn find_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<AcademicPeriod>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM academic_periods WHERE code = $1");
        sqlx::query_as::<_, AcademicPeriod>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// List all periods, most recent first.
    pub async fn list(pool: &PgPool) -> Result<Vec<AcademicPeriod>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM academic_periods ORDER BY starts_on DESC");
        sqlx::query_as::<_, AcademicPeriod>(&query)
            .fetch_all(pool)
            .await
    }
}
