//! Repository for staff members and the capacity-gated admission
//! transaction.
//!
//! Admission is the race-sensitive operation: the capacity check and the
//! inserts happen inside one transaction holding a row lock on the
//! project, so two concurrent admissions cannot both observe spare
//! capacity and both commit. Capacity is recounted inside the lock on
//! every call; the offer-time check in the API layer is advisory only.

use sqlx::PgPool;
use sigap_core::capacity::{CapacitySnapshot, RoleCapacity};
use sigap_core::roles::StaffRole;
use sigap_core::types::DbId;

use crate::models::participation::Participation;
use crate::models::staff_member::{AdmitStaff, StaffMember, StaffWithParticipation};
use crate::models::status::{ParticipationStatus, ProjectStatus, StatusId};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, cedula, first_name, last_name, email, role, project_id, \
    user_id, created_at, updated_at";

const PARTICIPATION_COLUMNS: &str = "id, staff_member_id, status_id, start_date, \
    planned_end_date, end_date, retirement_date, retirement_reason, created_at, updated_at";

/// Result of the admission transaction.
#[derive(Debug)]
pub enum AdmitOutcome {
    Admitted {
        staff: StaffMember,
        participation: Participation,
    },
    /// The role's planned headcount is already fully consumed.
    CapacityExceeded { active: i64, planned: i64 },
    /// Registrations are only accepted on approved projects.
    ProjectNotApproved { status_id: StatusId },
    ProjectNotFound,
}

/// Provides staff registration and capacity queries.
pub struct StaffRepo;

impl StaffRepo {
    /// Admit a new staff member: re-check capacity under a project row
    /// lock, then create the staff member, their first ACTIVO
    /// participation, and their credential account in one transaction.
    pub async fn admit(pool: &PgPool, input: &AdmitStaff) -> Result<AdmitOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Lock the project row: this serializes concurrent admissions on
        // the same project for the duration of the check-and-insert.
        let project: Option<(StatusId, i32, i32, i32)> = sqlx::query_as(
            "SELECT status_id, planned_asistentes, planned_ayudantes, planned_tecnicos
             FROM projects WHERE id = $1 FOR UPDATE",
        )
        .bind(input.project_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (status_id, asistentes, ayudantes, tecnicos) = match project {
            None => return Ok(AdmitOutcome::ProjectNotFound),
            Some(row) => row,
        };
        if status_id != ProjectStatus::Aprobado.id() {
            return Ok(AdmitOutcome::ProjectNotApproved { status_id });
        }

        let planned = match input.role.as_str() {
            "asistente" => asistentes,
            "ayudante" => ayudantes,
            _ => tecnicos,
        } as i64;

        // Commit-time recount, inside the lock.
        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM staff_members s
             JOIN participations p ON p.staff_member_id = s.id
             WHERE s.project_id = $1 AND s.role = $2 AND p.status_id = $3",
        )
        .bind(input.project_id)
        .bind(&input.role)
        .bind(ParticipationStatus::Activo.id())
        .fetch_one(&mut *tx)
        .await?;

        if active >= planned {
            return Ok(AdmitOutcome::CapacityExceeded { active, planned });
        }

        let user_id: DbId = sqlx::query_scalar(
            "INSERT INTO users (username, email, password_hash, role_id, must_change_password)
             VALUES ($1, $2, $3, $4, TRUE)
             RETURNING id",
        )
        .bind(&input.cedula)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(input.role_id)
        .fetch_one(&mut *tx)
        .await?;

        let staff_query = format!(
            "INSERT INTO staff_members
                (cedula, first_name, last_name, email, role, project_id, user_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let staff = sqlx::query_as::<_, StaffMember>(&staff_query)
            .bind(&input.cedula)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.role)
            .bind(input.project_id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        let participation_query = format!(
            "INSERT INTO participations (staff_member_id, start_date, planned_end_date)
             VALUES ($1, $2, $3)
             RETURNING {PARTICIPATION_COLUMNS}"
        );
        let participation = sqlx::query_as::<_, Participation>(&participation_query)
            .bind(staff.id)
            .bind(input.start_date)
            .bind(input.planned_end_date)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(AdmitOutcome::Admitted {
            staff,
            participation,
        })
    }

    /// Find a staff member by their internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<StaffMember>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM staff_members WHERE id = $1");
        sqlx::query_as::<_, StaffMember>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the staff member bound to a credential account.
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<StaffMember>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM staff_members WHERE user_id = $1");
        sqlx::query_as::<_, StaffMember>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's staff with each member's current participation
    /// (the ACTIVO one if any, otherwise the most recent).
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<StaffWithParticipation>, sqlx::Error> {
        sqlx::query_as::<_, StaffWithParticipation>(
            "SELECT DISTINCT ON (s.id)
                s.id, s.cedula, s.first_name, s.last_name, s.email, s.role, s.project_id,
                p.id AS participation_id, p.status_id AS participation_status_id,
                p.start_date, p.planned_end_date
             FROM staff_members s
             JOIN participations p ON p.staff_member_id = s.id
             WHERE s.project_id = $1
             ORDER BY s.id, (p.status_id = 1) DESC, p.created_at DESC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Recompute the per-role capacity snapshot for a project. Derived on
    /// demand, never cached.
    ///
    /// Returns `None` if the project does not exist.
    pub async fn capacity_snapshot(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Option<CapacitySnapshot>, sqlx::Error> {
        let planned: Option<(i32, i32, i32)> = sqlx::query_as(
            "SELECT planned_asistentes, planned_ayudantes, planned_tecnicos
             FROM projects WHERE id = $1",
        )
        .bind(project_id)
        .fetch_optional(pool)
        .await?;

        let (asistentes, ayudantes, tecnicos) = match planned {
            None => return Ok(None),
            Some(row) => row,
        };

        let counts: Vec<(String, i64)> = sqlx::query_as(
            "SELECT s.role, COUNT(*) FROM staff_members s
             JOIN participations p ON p.staff_member_id = s.id
             WHERE s.project_id = $1 AND p.status_id = $2
             GROUP BY s.role",
        )
        .bind(project_id)
        .bind(ParticipationStatus::Activo.id())
        .fetch_all(pool)
        .await?;

        let active_for = |role: StaffRole| {
            counts
                .iter()
                .find(|(name, _)| name == role.as_str())
                .map(|(_, count)| *count)
                .unwrap_or(0)
        };

        Ok(Some(CapacitySnapshot {
            asistentes: RoleCapacity {
                active: active_for(StaffRole::Asistente),
                planned: asistentes as i64,
            },
            ayudantes: RoleCapacity {
                active: active_for(StaffRole::Ayudante),
                planned: ayudantes as i64,
            },
            tecnicos: RoleCapacity {
                active: active_for(StaffRole::Tecnico),
                planned: tecnicos as i64,
            },
        }))
    }
}
