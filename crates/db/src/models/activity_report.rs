//! Activity report, weekly entry, and worked-day models and DTOs.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sigap_core::types::{DbId, Timestamp};

use crate::models::status::StatusId;

/// A row from the `activity_reports` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityReport {
    pub id: DbId,
    pub staff_member_id: DbId,
    pub status_id: StatusId,
    pub registered_at: Timestamp,
    pub decided_at: Option<Timestamp>,
    pub rejection_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `weekly_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WeeklyEntry {
    pub id: DbId,
    pub report_id: DbId,
    pub week_number: i32,
    pub activities: String,
    pub observations: String,
    pub created_at: Timestamp,
}

/// A row from the `weekly_entry_days` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WeeklyEntryDay {
    pub id: DbId,
    pub weekly_entry_id: DbId,
    pub slot: i16,
    pub work_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// One worked-day triple in an add-week request. Slots not listed were
/// not worked.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkedDayInput {
    pub work_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// DTO for appending a week to a report in edition.
#[derive(Debug, Clone, Deserialize)]
pub struct AddWeek {
    pub activities: String,
    #[serde(default)]
    pub observations: String,
    #[serde(default)]
    pub days: Vec<WorkedDayInput>,
}

/// A weekly entry with its worked days and derived totals.
#[derive(Debug, Clone, Serialize)]
pub struct WeekDetail {
    #[serde(flatten)]
    pub entry: WeeklyEntry,
    pub days: Vec<WeeklyEntryDay>,
    pub hours_worked: f64,
    pub days_worked: usize,
}

/// Full report read model: the report, its weeks, and report-level totals.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityReportDetail {
    #[serde(flatten)]
    pub report: ActivityReport,
    pub weeks: Vec<WeekDetail>,
    pub total_hours: f64,
}
