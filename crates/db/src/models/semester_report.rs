//! Semester report model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sigap_core::types::{DbId, Timestamp};

use crate::models::participation::Participation;
use crate::models::status::StatusId;

/// A row from the `semester_reports` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SemesterReport {
    pub id: DbId,
    pub project_id: DbId,
    pub academic_period: String,
    pub status_id: StatusId,
    pub start_date: NaiveDate,
    pub close_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for opening a semester report draft.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenDraft {
    pub project_id: DbId,
    pub academic_period: String,
}

/// Read model: a semester report with its member participations and the
/// overdue flag computed against the period's report deadline.
#[derive(Debug, Clone, Serialize)]
pub struct SemesterReportDetail {
    #[serde(flatten)]
    pub report: SemesterReport,
    pub participations: Vec<Participation>,
    pub is_overdue: bool,
}
