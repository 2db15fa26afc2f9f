//! Repository for the `participations` table.
//!
//! Retirement and finalization are conditional single-statement updates
//! keyed by the expected ACTIVO status: a lost race or a wrong-state call
//! simply affects zero rows, and the caller re-fetches to distinguish
//! "not found" from "not active". Releasing a capacity slot needs no
//! explicit call because capacity is always derived from ACTIVO rows.

use sqlx::PgPool;
use sigap_core::types::DbId;

use crate::models::participation::Participation;
use crate::models::status::ParticipationStatus;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, staff_member_id, status_id, start_date, planned_end_date, \
    end_date, retirement_date, retirement_reason, created_at, updated_at";

/// Provides lifecycle operations for participations.
pub struct ParticipationRepo;

impl ParticipationRepo {
    /// Find a participation by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Participation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM participations WHERE id = $1");
        sqlx::query_as::<_, Participation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Retire an active participation with the given reason. Returns
    /// `None` when the participation does not exist or is not ACTIVO.
    pub async fn retire(
        pool: &PgPool,
        id: DbId,
        reason: &str,
    ) -> Result<Option<Participation>, sqlx::Error> {
        let query = format!(
            "UPDATE participations
             SET status_id = $2, retirement_date = CURRENT_DATE, retirement_reason = $3
             WHERE id = $1 AND status_id = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Participation>(&query)
            .bind(id)
            .bind(ParticipationStatus::Retirado.id())
            .bind(reason)
            .bind(ParticipationStatus::Activo.id())
            .fetch_optional(pool)
            .await
    }

    /// Finalize an active participation (normal tenure end). Returns
    /// `None` when the participation does not exist or is not ACTIVO.
    pub async fn finalize(pool: &PgPool, id: DbId) -> Result<Option<Participation>, sqlx::Error> {
        let query = format!(
            "UPDATE participations
             SET status_id = $2, end_date = CURRENT_DATE
             WHERE id = $1 AND status_id = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Participation>(&query)
            .bind(id)
            .bind(ParticipationStatus::Finalizado.id())
            .bind(ParticipationStatus::Activo.id())
            .fetch_optional(pool)
            .await
    }

    /// List all participations on a project, newest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Participation>, sqlx::Error> {
        sqlx::query_as::<_, Participation>(
            "SELECT p.id, p.staff_member_id, p.status_id, p.start_date, p.planned_end_date,
                    p.end_date, p.retirement_date, p.retirement_reason, p.created_at, p.updated_at
             FROM participations p
             JOIN staff_members s ON s.id = p.staff_member_id
             WHERE s.project_id = $1
             ORDER BY p.created_at DESC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// ACTIVO participations on a project not yet included in any
    /// semester report for the given academic period. This is the
    /// candidate list a director builds a semester report from.
    pub async fn candidates_for_period(
        pool: &PgPool,
        project_id: DbId,
        academic_period: &str,
    ) -> Result<Vec<Participation>, sqlx::Error> {
        sqlx::query_as::<_, Participation>(
            "SELECT p.id, p.staff_member_id, p.status_id, p.start_date, p.planned_end_date,
                    p.end_date, p.retirement_date, p.retirement_reason, p.created_at, p.updated_at
             FROM participations p
             JOIN staff_members s ON s.id = p.staff_member_id
             WHERE s.project_id = $1
               AND p.status_id = $2
               AND NOT EXISTS (
                   SELECT 1 FROM semester_report_participations srp
                   JOIN semester_reports r ON r.id = srp.report_id
                   WHERE srp.participation_id = p.id AND r.academic_period = $3
               )
             ORDER BY p.created_at",
        )
        .bind(project_id)
        .bind(ParticipationStatus::Activo.id())
        .bind(academic_period)
        .fetch_all(pool)
        .await
    }
}
