//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sigap_core::types::{DbId, Timestamp};

use crate::models::status::StatusId;

/// A project row from the `projects` table.
///
/// `code` and `director_user_id` stay `None` while the project is under
/// review; both are set by the approval transaction.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub code: Option<String>,
    pub name: String,
    pub project_type: String,
    pub status_id: StatusId,
    pub academic_period: String,
    pub duration_months: i32,
    pub planned_asistentes: i32,
    pub planned_ayudantes: i32,
    pub planned_tecnicos: i32,
    pub director_user_id: Option<DbId>,
    pub director_cedula: String,
    pub director_first_name: String,
    pub director_last_name: String,
    pub director_email: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for submitting a project request (enters review as EN_REVISION).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    /// `"interno"` or `"semilla"`. Defaults to `"interno"` if omitted.
    pub project_type: Option<String>,
    pub academic_period: String,
    pub duration_months: i32,
    pub planned_asistentes: i32,
    pub planned_ayudantes: i32,
    pub planned_tecnicos: i32,
    pub director_cedula: String,
    pub director_first_name: String,
    pub director_last_name: String,
    pub director_email: String,
}

/// Per-role active/planned counts for a project, as returned by the
/// capacity query.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectCapacity {
    pub role: String,
    pub active: i64,
    pub planned: i64,
}
