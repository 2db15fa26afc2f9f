//! Handlers for project staff: capacity-gated admission and listings.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use sigap_core::error::CoreError;
use sigap_core::roles::{StaffRole, ROLE_STAFF};
use sigap_core::types::DbId;
use sigap_db::models::participation::Participation;
use sigap_db::models::staff_member::{
    AdmitStaff, AdmitStaffRequest, StaffMember, StaffWithParticipation,
};
use sigap_db::repositories::{AdmitOutcome, ProjectRepo, RoleRepo, StaffRepo, UserRepo};

use crate::auth::password::{generate_temporary_password, hash_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAuth, RequireDirector};
use crate::response::DataResponse;
use crate::state::AppState;

/// Admission response: the new staff member, their first participation,
/// and the temporary password for the provisioned account.
#[derive(Debug, Serialize)]
pub struct AdmittedStaff {
    pub staff: StaffMember,
    pub participation: Participation,
    /// Handed to the staff member out of band; the account carries
    /// `must_change_password` until replaced.
    pub temporary_password: String,
}

/// Ensure the authenticated director owns the given project.
pub async fn ensure_project_director(
    state: &AppState,
    project_id: DbId,
    auth: &AuthUser,
) -> AppResult<()> {
    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;
    if project.director_user_id != Some(auth.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the project's director may perform this action".into(),
        )));
    }
    Ok(())
}

/// POST /api/v1/projects/{project_id}/staff
///
/// Admit a new staff member. Capacity is checked twice: here at offer
/// time (for an early, explanatory refusal) and again inside the
/// admission transaction at commit time, which is the authoritative
/// check.
pub async fn admit(
    RequireDirector(auth): RequireDirector,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<AdmitStaffRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AdmittedStaff>>)> {
    ensure_project_director(&state, project_id, &auth).await?;

    let role = StaffRole::parse(&input.role).map_err(AppError::Core)?;
    if input.cedula.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Cedula must not be empty".into(),
        )));
    }
    if input.planned_end_date < input.start_date {
        return Err(AppError::Core(CoreError::Validation(
            "Planned end date must not precede the start date".into(),
        )));
    }

    // Offer-time capacity check. Advisory only: the admission
    // transaction re-checks under the project lock.
    let snapshot = StaffRepo::capacity_snapshot(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;
    let counts = snapshot.for_role(role);
    if !counts.has_capacity() {
        return Err(AppError::Core(CoreError::CapacityExceeded {
            role: role.as_str().to_string(),
            active: counts.active,
            planned: counts.planned,
        }));
    }

    let role_id = RoleRepo::find_id_by_name(&state.pool, ROLE_STAFF)
        .await?
        .ok_or_else(|| AppError::InternalError("staff role missing from seed data".into()))?;

    let temporary_password = generate_temporary_password();
    let password_hash = hash_password(&temporary_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let admission = AdmitStaff {
        project_id,
        cedula: input.cedula.clone(),
        first_name: input.first_name.clone(),
        last_name: input.last_name.clone(),
        email: input.email.clone(),
        role: role.as_str().to_string(),
        start_date: input.start_date,
        planned_end_date: input.planned_end_date,
        password_hash,
        role_id,
    };

    let outcome = match StaffRepo::admit(&state.pool, &admission).await {
        Ok(outcome) => outcome,
        Err(err) if sigap_db::is_retryable_conflict(&err) => {
            tracing::warn!(project_id, "Admission conflict, retrying once");
            StaffRepo::admit(&state.pool, &admission).await?
        }
        Err(err) => return Err(err.into()),
    };

    match outcome {
        AdmitOutcome::Admitted {
            staff,
            participation,
        } => {
            tracing::info!(
                user_id = auth.user_id,
                project_id,
                staff_id = staff.id,
                role = %staff.role,
                "Staff member admitted"
            );
            Ok((
                StatusCode::CREATED,
                Json(DataResponse {
                    data: AdmittedStaff {
                        staff,
                        participation,
                        temporary_password,
                    },
                }),
            ))
        }
        AdmitOutcome::CapacityExceeded { active, planned } => {
            Err(AppError::Core(CoreError::CapacityExceeded {
                role: role.as_str().to_string(),
                active,
                planned,
            }))
        }
        AdmitOutcome::ProjectNotApproved { .. } => {
            Err(AppError::Core(CoreError::InvalidState(
                "Staff may only be registered on approved projects".into(),
            )))
        }
        AdmitOutcome::ProjectNotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        })),
    }
}

/// POST /api/v1/projects/{project_id}/staff/{id}/deactivate
///
/// Deactivate a staff member's credential account. Staff are never
/// hard-deleted while participations reference them; deactivation is
/// the only removal path.
pub async fn deactivate(
    RequireDirector(auth): RequireDirector,
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    ensure_project_director(&state, project_id, &auth).await?;

    let staff = StaffRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|s| s.project_id == project_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "StaffMember",
            id,
        }))?;

    let deactivated = UserRepo::deactivate(&state.pool, staff.user_id).await?;
    if !deactivated {
        return Err(AppError::Core(CoreError::InvalidState(
            "Account is already deactivated".into(),
        )));
    }

    tracing::info!(
        user_id = auth.user_id,
        staff_id = id,
        "Staff account deactivated"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/projects/{project_id}/staff
///
/// List the project's staff with their current participation state.
pub async fn list_by_project(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<StaffWithParticipation>>> {
    ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;
    let staff = StaffRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(staff))
}
