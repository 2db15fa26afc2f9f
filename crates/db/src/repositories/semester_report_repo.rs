//! Repository for semester reports and their participation membership.
//!
//! Opening a draft is the second race-sensitive operation: the
//! "no open draft" and "at most two reports per period" checks run inside
//! one transaction holding a row lock on the project, so two concurrent
//! opens cannot both pass. The partial unique index on open drafts backs
//! the same invariant at the store level.

use sqlx::PgPool;
use sigap_core::reporting::MAX_REPORTS_PER_PERIOD;
use sigap_core::types::DbId;

use crate::models::participation::Participation;
use crate::models::semester_report::{OpenDraft, SemesterReport};
use crate::models::status::{ParticipationStatus, ProjectStatus, SemesterReportStatus, StatusId};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, academic_period, status_id, start_date, close_date, \
    created_at, updated_at";

/// Result of the draft-opening transaction.
#[derive(Debug)]
pub enum OpenDraftOutcome {
    Opened(SemesterReport),
    /// The project already has a report in EN_EDICION.
    DraftAlreadyOpen,
    /// The (project, period) pair already holds the maximum number of
    /// reports.
    QuotaExceeded { count: i64 },
    /// Semester reports exist only for approved projects.
    ProjectNotApproved { status_id: StatusId },
    ProjectNotFound,
}

/// Result of including a participation in a draft.
#[derive(Debug, PartialEq, Eq)]
pub enum IncludeOutcome {
    Included,
    /// Already a member; set semantics make this a no-op.
    AlreadyIncluded,
    /// The report is not in EN_EDICION.
    NotEditable,
    /// The participation is not ACTIVO or belongs to another project.
    NotEligible,
    ReportNotFound,
    ParticipationNotFound,
}

/// Provides workflow operations for semester reports.
pub struct SemesterReportRepo;

impl SemesterReportRepo {
    /// Open a new draft for a project and period, enforcing the
    /// single-open-draft and period-quota gates under a project row lock.
    pub async fn open_draft(
        pool: &PgPool,
        input: &OpenDraft,
    ) -> Result<OpenDraftOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let status: Option<StatusId> =
            sqlx::query_scalar("SELECT status_id FROM projects WHERE id = $1 FOR UPDATE")
                .bind(input.project_id)
                .fetch_optional(&mut *tx)
                .await?;

        let status_id = match status {
            None => return Ok(OpenDraftOutcome::ProjectNotFound),
            Some(s) => s,
        };
        if status_id != ProjectStatus::Aprobado.id() {
            return Ok(OpenDraftOutcome::ProjectNotApproved { status_id });
        }

        let open_draft_exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM semester_reports WHERE project_id = $1 AND status_id = $2)",
        )
        .bind(input.project_id)
        .bind(SemesterReportStatus::EnEdicion.id())
        .fetch_one(&mut *tx)
        .await?;
        if open_draft_exists {
            return Ok(OpenDraftOutcome::DraftAlreadyOpen);
        }

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM semester_reports WHERE project_id = $1 AND academic_period = $2",
        )
        .bind(input.project_id)
        .bind(&input.academic_period)
        .fetch_one(&mut *tx)
        .await?;
        if count >= MAX_REPORTS_PER_PERIOD {
            return Ok(OpenDraftOutcome::QuotaExceeded { count });
        }

        let query = format!(
            "INSERT INTO semester_reports (project_id, academic_period)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        let report = sqlx::query_as::<_, SemesterReport>(&query)
            .bind(input.project_id)
            .bind(&input.academic_period)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(OpenDraftOutcome::Opened(report))
    }

    /// Find a report by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SemesterReport>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM semester_reports WHERE id = $1");
        sqlx::query_as::<_, SemesterReport>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's reports, newest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<SemesterReport>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM semester_reports
             WHERE project_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, SemesterReport>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Include a participation in a draft. The participation must be
    /// ACTIVO and belong to the report's project; re-including a member
    /// is a no-op.
    pub async fn include(
        pool: &PgPool,
        report_id: DbId,
        participation_id: DbId,
    ) -> Result<IncludeOutcome, sqlx::Error> {
        let report: Option<(DbId, StatusId)> =
            sqlx::query_as("SELECT project_id, status_id FROM semester_reports WHERE id = $1")
                .bind(report_id)
                .fetch_optional(pool)
                .await?;
        let (project_id, status_id) = match report {
            None => return Ok(IncludeOutcome::ReportNotFound),
            Some(row) => row,
        };
        if status_id != SemesterReportStatus::EnEdicion.id() {
            return Ok(IncludeOutcome::NotEditable);
        }

        let participation: Option<(DbId, StatusId)> = sqlx::query_as(
            "SELECT s.project_id, p.status_id
             FROM participations p
             JOIN staff_members s ON s.id = p.staff_member_id
             WHERE p.id = $1",
        )
        .bind(participation_id)
        .fetch_optional(pool)
        .await?;
        let (member_project_id, participation_status) = match participation {
            None => return Ok(IncludeOutcome::ParticipationNotFound),
            Some(row) => row,
        };
        if member_project_id != project_id
            || participation_status != ParticipationStatus::Activo.id()
        {
            return Ok(IncludeOutcome::NotEligible);
        }

        let result = sqlx::query(
            "INSERT INTO semester_report_participations (report_id, participation_id)
             VALUES ($1, $2)
             ON CONFLICT (report_id, participation_id) DO NOTHING",
        )
        .bind(report_id)
        .bind(participation_id)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            Ok(IncludeOutcome::Included)
        } else {
            Ok(IncludeOutcome::AlreadyIncluded)
        }
    }

    /// Remove a participation from a draft. Returns `false` when it was
    /// not a member. Fails with `NotEditable` semantics via `Option`:
    /// `None` means the report is missing or not in edition.
    pub async fn exclude(
        pool: &PgPool,
        report_id: DbId,
        participation_id: DbId,
    ) -> Result<Option<bool>, sqlx::Error> {
        let editable: Option<bool> = sqlx::query_scalar(
            "SELECT status_id = $2 FROM semester_reports WHERE id = $1",
        )
        .bind(report_id)
        .bind(SemesterReportStatus::EnEdicion.id())
        .fetch_optional(pool)
        .await?;
        match editable {
            Some(true) => {}
            _ => return Ok(None),
        }

        let result = sqlx::query(
            "DELETE FROM semester_report_participations
             WHERE report_id = $1 AND participation_id = $2",
        )
        .bind(report_id)
        .bind(participation_id)
        .execute(pool)
        .await?;
        Ok(Some(result.rows_affected() > 0))
    }

    /// List the participations included in a report.
    pub async fn members(
        pool: &PgPool,
        report_id: DbId,
    ) -> Result<Vec<Participation>, sqlx::Error> {
        sqlx::query_as::<_, Participation>(
            "SELECT p.id, p.staff_member_id, p.status_id, p.start_date, p.planned_end_date,
                    p.end_date, p.retirement_date, p.retirement_reason, p.created_at, p.updated_at
             FROM participations p
             JOIN semester_report_participations srp ON srp.participation_id = p.id
             WHERE srp.report_id = $1
             ORDER BY p.created_at",
        )
        .bind(report_id)
        .fetch_all(pool)
        .await
    }

    /// Send: EN_EDICION -> CERRADO, stamping the close date. Returns
    /// `None` when the report is missing or not in edition.
    pub async fn send(pool: &PgPool, id: DbId) -> Result<Option<SemesterReport>, sqlx::Error> {
        let query = format!(
            "UPDATE semester_reports SET status_id = $2, close_date = CURRENT_DATE
             WHERE id = $1 AND status_id = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SemesterReport>(&query)
            .bind(id)
            .bind(SemesterReportStatus::Cerrado.id())
            .bind(SemesterReportStatus::EnEdicion.id())
            .fetch_optional(pool)
            .await
    }

    /// Approve: CERRADO -> APROBADO. Only Jefatura reaches this call.
    /// Returns `None` when the report is missing or not CERRADO.
    pub async fn approve(pool: &PgPool, id: DbId) -> Result<Option<SemesterReport>, sqlx::Error> {
        let query = format!(
            "UPDATE semester_reports SET status_id = $2
             WHERE id = $1 AND status_id = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SemesterReport>(&query)
            .bind(id)
            .bind(SemesterReportStatus::Aprobado.id())
            .bind(SemesterReportStatus::Cerrado.id())
            .fetch_optional(pool)
            .await
    }
}
