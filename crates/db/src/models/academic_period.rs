//! Academic period model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sigap_core::types::{DbId, Timestamp};

/// A row from the `academic_periods` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AcademicPeriod {
    pub id: DbId,
    pub code: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    /// Semester reports not closed by this date are overdue.
    pub report_deadline: NaiveDate,
    pub created_at: Timestamp,
}

/// DTO for registering a new academic period.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAcademicPeriod {
    pub code: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub report_deadline: NaiveDate,
}
