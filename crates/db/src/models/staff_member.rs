//! Staff member model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sigap_core::types::{DbId, Timestamp};

/// A row from the `staff_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StaffMember {
    pub id: DbId,
    pub cedula: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// `"asistente"`, `"ayudante"`, or `"tecnico"`.
    pub role: String,
    pub project_id: DbId,
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for admitting a new staff member onto a project.
///
/// Admission creates the staff member, their first ACTIVO participation,
/// and a credential account in one transaction; the handler supplies the
/// prepared `password_hash`.
#[derive(Debug, Clone)]
pub struct AdmitStaff {
    pub project_id: DbId,
    pub cedula: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub start_date: NaiveDate,
    pub planned_end_date: NaiveDate,
    pub password_hash: String,
    pub role_id: DbId,
}

/// Request body for the admission endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AdmitStaffRequest {
    pub cedula: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub start_date: NaiveDate,
    pub planned_end_date: NaiveDate,
}

/// A staff member joined with their current participation state, used by
/// project staff listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StaffWithParticipation {
    pub id: DbId,
    pub cedula: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub project_id: DbId,
    pub participation_id: DbId,
    pub participation_status_id: i16,
    pub start_date: NaiveDate,
    pub planned_end_date: NaiveDate,
}
