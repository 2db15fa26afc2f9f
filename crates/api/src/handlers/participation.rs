//! Handlers for participation lifecycle transitions and listings.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use sigap_core::error::CoreError;
use sigap_core::reporting;
use sigap_core::types::DbId;
use sigap_db::models::participation::Participation;
use sigap_db::models::status::ParticipationStatus;
use sigap_db::repositories::{ParticipationRepo, ProjectRepo, StaffRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::staff::ensure_project_director;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAuth, RequireDirector};
use crate::state::AppState;

/// Request body for `POST /participations/{id}/retire`.
#[derive(Debug, Deserialize)]
pub struct RetireRequest {
    pub reason: String,
}

/// Query parameters for the project participation listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// When set, returns only ACTIVO participations not yet included in
    /// any semester report for this academic period.
    pub candidates_for: Option<String>,
}

/// Resolve a participation's owning project and check the caller
/// directs it.
async fn ensure_participation_director(
    state: &AppState,
    participation_id: DbId,
    auth: &AuthUser,
) -> AppResult<Participation> {
    let participation = ParticipationRepo::find_by_id(&state.pool, participation_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Participation",
            id: participation_id,
        }))?;
    let staff = StaffRepo::find_by_id(&state.pool, participation.staff_member_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "StaffMember",
            id: participation.staff_member_id,
        }))?;
    ensure_project_director(state, staff.project_id, auth).await?;
    Ok(participation)
}

/// POST /api/v1/participations/{id}/retire
///
/// Retire an active participation with a mandatory reason. Terminal.
pub async fn retire(
    RequireDirector(auth): RequireDirector,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RetireRequest>,
) -> AppResult<Json<Participation>> {
    let reason = input.reason.trim();
    if reason.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "A retirement reason is required".into(),
        )));
    }

    let participation = ensure_participation_director(&state, id, &auth).await?;
    if !reporting::participation::can_transition(
        participation.status_id,
        ParticipationStatus::Retirado.id(),
    ) {
        return Err(AppError::Core(CoreError::InvalidState(
            "Only active participations may be retired".into(),
        )));
    }

    match ParticipationRepo::retire(&state.pool, id, reason).await? {
        Some(participation) => {
            tracing::info!(
                user_id = auth.user_id,
                participation_id = id,
                "Participation retired"
            );
            Ok(Json(participation))
        }
        None => Err(AppError::Core(CoreError::InvalidState(
            "Only active participations may be retired".into(),
        ))),
    }
}

/// POST /api/v1/participations/{id}/finalize
///
/// End an active participation normally. Terminal.
pub async fn finalize(
    RequireDirector(auth): RequireDirector,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Participation>> {
    let participation = ensure_participation_director(&state, id, &auth).await?;
    if !reporting::participation::can_transition(
        participation.status_id,
        ParticipationStatus::Finalizado.id(),
    ) {
        return Err(AppError::Core(CoreError::InvalidState(
            "Only active participations may be finalized".into(),
        )));
    }

    match ParticipationRepo::finalize(&state.pool, id).await? {
        Some(participation) => {
            tracing::info!(
                user_id = auth.user_id,
                participation_id = id,
                "Participation finalized"
            );
            Ok(Json(participation))
        }
        None => Err(AppError::Core(CoreError::InvalidState(
            "Only active participations may be finalized".into(),
        ))),
    }
}

/// GET /api/v1/projects/{project_id}/participations
///
/// List a project's participations; with `?candidates_for=<period>`,
/// list only the ACTIVO participations still available for inclusion in
/// a semester report of that period.
pub async fn list_by_project(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Participation>>> {
    ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    let participations = match &query.candidates_for {
        Some(period) => {
            ParticipationRepo::candidates_for_period(&state.pool, project_id, period).await?
        }
        None => ParticipationRepo::list_by_project(&state.pool, project_id).await?,
    };
    Ok(Json(participations))
}
