//! Repository for activity reports, weekly entries, and worked days.
//!
//! Week numbers are 1-based and sequential per report. Appending assigns
//! `MAX(week_number) + 1`; removal renumbers the remaining weeks in one
//! statement (the unique constraint on (report, week) is deferred, so the
//! shift cannot trip it mid-update).

use sqlx::PgPool;
use sigap_core::types::DbId;

use crate::models::activity_report::{
    ActivityReport, AddWeek, WeeklyEntry, WeeklyEntryDay,
};
use crate::models::status::ActivityReportStatus;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, staff_member_id, status_id, registered_at, decided_at, \
    rejection_reason, created_at, updated_at";

const WEEK_COLUMNS: &str = "id, report_id, week_number, activities, observations, created_at";

/// Result of appending a week.
#[derive(Debug)]
pub enum AddWeekOutcome {
    Added(WeeklyEntry),
    /// The report does not exist or is not in EN_EDICION.
    NotEditable,
}

/// Result of removing a week.
#[derive(Debug, PartialEq, Eq)]
pub enum RemoveWeekOutcome {
    Removed,
    /// A report in edition must keep at least one week.
    MinimumWeek,
    WeekNotFound,
    /// The report does not exist or is not in EN_EDICION.
    NotEditable,
}

/// Provides workflow operations for activity reports.
pub struct ActivityReportRepo;

impl ActivityReportRepo {
    /// Open a new report draft for a staff member (state EN_EDICION).
    pub async fn create(
        pool: &PgPool,
        staff_member_id: DbId,
    ) -> Result<ActivityReport, sqlx::Error> {
        let query = format!(
            "INSERT INTO activity_reports (staff_member_id)
             VALUES ($1)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityReport>(&query)
            .bind(staff_member_id)
            .fetch_one(pool)
            .await
    }

    /// Find a report by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ActivityReport>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM activity_reports WHERE id = $1");
        sqlx::query_as::<_, ActivityReport>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all reports for a staff member, newest first.
    pub async fn list_by_staff(
        pool: &PgPool,
        staff_member_id: DbId,
    ) -> Result<Vec<ActivityReport>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activity_reports
             WHERE staff_member_id = $1
             ORDER BY registered_at DESC"
        );
        sqlx::query_as::<_, ActivityReport>(&query)
            .bind(staff_member_id)
            .fetch_all(pool)
            .await
    }

    /// Append a week to a report in edition, auto-assigning the next week
    /// number, and record its worked-day triples.
    pub async fn add_week(
        pool: &PgPool,
        report_id: DbId,
        input: &AddWeek,
    ) -> Result<AddWeekOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let week_query = format!(
            "INSERT INTO weekly_entries (report_id, week_number, activities, observations)
             SELECT $1,
                    (SELECT COALESCE(MAX(week_number), 0) + 1
                     FROM weekly_entries WHERE report_id = $1),
                    $2, $3
             WHERE EXISTS (SELECT 1 FROM activity_reports WHERE id = $1 AND status_id = $4)
             RETURNING {WEEK_COLUMNS}"
        );
        let entry = sqlx::query_as::<_, WeeklyEntry>(&week_query)
            .bind(report_id)
            .bind(&input.activities)
            .bind(&input.observations)
            .bind(ActivityReportStatus::EnEdicion.id())
            .fetch_optional(&mut *tx)
            .await?;

        let entry = match entry {
            None => return Ok(AddWeekOutcome::NotEditable),
            Some(entry) => entry,
        };

        for (index, day) in input.days.iter().enumerate() {
            sqlx::query(
                "INSERT INTO weekly_entry_days
                    (weekly_entry_id, slot, work_date, start_time, end_time)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(entry.id)
            .bind((index + 1) as i16)
            .bind(day.work_date)
            .bind(day.start_time)
            .bind(day.end_time)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(AddWeekOutcome::Added(entry))
    }

    /// Remove a week from a report in edition and renumber the remaining
    /// weeks sequentially from 1. Refuses to remove the last week.
    pub async fn remove_week(
        pool: &PgPool,
        report_id: DbId,
        week_number: i32,
    ) -> Result<RemoveWeekOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Lock the report row so concurrent removals see a consistent
        // week count.
        let status: Option<i16> =
            sqlx::query_scalar("SELECT status_id FROM activity_reports WHERE id = $1 FOR UPDATE")
                .bind(report_id)
                .fetch_optional(&mut *tx)
                .await?;

        match status {
            Some(s) if s == ActivityReportStatus::EnEdicion.id() => {}
            _ => return Ok(RemoveWeekOutcome::NotEditable),
        }

        let week_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM weekly_entries WHERE report_id = $1")
                .bind(report_id)
                .fetch_one(&mut *tx)
                .await?;
        if week_count <= 1 {
            return Ok(RemoveWeekOutcome::MinimumWeek);
        }

        let deleted = sqlx::query(
            "DELETE FROM weekly_entries WHERE report_id = $1 AND week_number = $2",
        )
        .bind(report_id)
        .bind(week_number)
        .execute(&mut *tx)
        .await?;
        if deleted.rows_affected() == 0 {
            return Ok(RemoveWeekOutcome::WeekNotFound);
        }

        sqlx::query(
            "UPDATE weekly_entries SET week_number = week_number - 1
             WHERE report_id = $1 AND week_number > $2",
        )
        .bind(report_id)
        .bind(week_number)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(RemoveWeekOutcome::Removed)
    }

    /// List a report's weeks in order.
    pub async fn weeks(pool: &PgPool, report_id: DbId) -> Result<Vec<WeeklyEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {WEEK_COLUMNS} FROM weekly_entries
             WHERE report_id = $1 ORDER BY week_number"
        );
        sqlx::query_as::<_, WeeklyEntry>(&query)
            .bind(report_id)
            .fetch_all(pool)
            .await
    }

    /// List all worked days across a report's weeks, ordered by week and
    /// slot.
    pub async fn days(pool: &PgPool, report_id: DbId) -> Result<Vec<WeeklyEntryDay>, sqlx::Error> {
        sqlx::query_as::<_, WeeklyEntryDay>(
            "SELECT d.id, d.weekly_entry_id, d.slot, d.work_date, d.start_time, d.end_time
             FROM weekly_entry_days d
             JOIN weekly_entries w ON w.id = d.weekly_entry_id
             WHERE w.report_id = $1
             ORDER BY w.week_number, d.slot",
        )
        .bind(report_id)
        .fetch_all(pool)
        .await
    }

    /// Submit: EN_EDICION -> ENVIADO. Returns `None` when the report is
    /// missing or not in edition. Completeness is validated by the caller
    /// before submission.
    pub async fn submit(pool: &PgPool, id: DbId) -> Result<Option<ActivityReport>, sqlx::Error> {
        Self::transition(
            pool,
            id,
            ActivityReportStatus::EnEdicion,
            ActivityReportStatus::Enviado,
        )
        .await
    }

    /// Approve: ENVIADO -> APROBADO, stamping the decision time.
    pub async fn approve(pool: &PgPool, id: DbId) -> Result<Option<ActivityReport>, sqlx::Error> {
        let query = format!(
            "UPDATE activity_reports SET status_id = $2, decided_at = NOW()
             WHERE id = $1 AND status_id = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityReport>(&query)
            .bind(id)
            .bind(ActivityReportStatus::Aprobado.id())
            .bind(ActivityReportStatus::Enviado.id())
            .fetch_optional(pool)
            .await
    }

    /// Reject: ENVIADO -> RECHAZADO with the reviewer's reason.
    pub async fn reject(
        pool: &PgPool,
        id: DbId,
        reason: &str,
    ) -> Result<Option<ActivityReport>, sqlx::Error> {
        let query = format!(
            "UPDATE activity_reports
             SET status_id = $2, decided_at = NOW(), rejection_reason = $3
             WHERE id = $1 AND status_id = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityReport>(&query)
            .bind(id)
            .bind(ActivityReportStatus::Rechazado.id())
            .bind(reason)
            .bind(ActivityReportStatus::Enviado.id())
            .fetch_optional(pool)
            .await
    }

    /// Return for correction: RECHAZADO -> EN_EDICION. Week data is left
    /// untouched.
    pub async fn return_for_correction(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ActivityReport>, sqlx::Error> {
        Self::transition(
            pool,
            id,
            ActivityReportStatus::Rechazado,
            ActivityReportStatus::EnEdicion,
        )
        .await
    }

    async fn transition(
        pool: &PgPool,
        id: DbId,
        from: ActivityReportStatus,
        to: ActivityReportStatus,
    ) -> Result<Option<ActivityReport>, sqlx::Error> {
        let query = format!(
            "UPDATE activity_reports SET status_id = $2
             WHERE id = $1 AND status_id = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityReport>(&query)
            .bind(id)
            .bind(to.id())
            .bind(from.id())
            .fetch_optional(pool)
            .await
    }
}
