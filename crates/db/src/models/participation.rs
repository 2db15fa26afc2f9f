//! Participation model.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use sigap_core::types::{DbId, Timestamp};

use crate::models::status::StatusId;

/// A row from the `participations` table.
///
/// `retirement_date`/`retirement_reason` are set only when the
/// participation ends by retirement; `end_date` only when it is
/// finalized. Both RETIRADO and FINALIZADO are terminal.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Participation {
    pub id: DbId,
    pub staff_member_id: DbId,
    pub status_id: StatusId,
    pub start_date: NaiveDate,
    pub planned_end_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub retirement_date: Option<NaiveDate>,
    pub retirement_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
