//! Handlers for the `/projects` resource: submission for review,
//! Jefatura's approval decisions, and the capacity read model.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use sigap_core::error::CoreError;
use sigap_core::reporting;
use sigap_core::roles::{StaffRole, ROLE_DIRECTOR};
use sigap_core::types::DbId;
use sigap_db::models::project::{CreateProject, Project, ProjectCapacity};
use sigap_db::models::status::{ProjectStatus, StatusId};
use sigap_db::models::user::CreateUser;
use sigap_db::repositories::{
    AcademicPeriodRepo, ApproveProjectOutcome, ProjectRepo, RoleRepo, StaffRepo,
};

use crate::auth::password::{generate_temporary_password, hash_password};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireJefatura};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /projects/{id}/approve`.
#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    pub code: String,
}

/// Approval response: the project plus the director's provisioned
/// credentials when a new account was created.
#[derive(Debug, Serialize)]
pub struct ApprovedProject {
    #[serde(flatten)]
    pub project: Project,
    /// Set only when the approval provisioned a new director account;
    /// the caller hands it to the director out of band.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporary_password: Option<String>,
}

/// Query parameters for `GET /projects`.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status_id: Option<StatusId>,
}

/// POST /api/v1/projects
///
/// Submit a project request; it enters review as EN_REVISION.
pub async fn create(
    RequireJefatura(user): RequireJefatura,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Project name must not be empty".into(),
        )));
    }
    if input.planned_asistentes < 0 || input.planned_ayudantes < 0 || input.planned_tecnicos < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Planned role counts must not be negative".into(),
        )));
    }
    if input.duration_months <= 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Duration must be a positive number of months".into(),
        )));
    }
    if let Some(kind) = &input.project_type {
        if kind != "interno" && kind != "semilla" {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Invalid project type '{kind}'. Must be one of: interno, semilla"
            ))));
        }
    }
    AcademicPeriodRepo::find_by_code(&state.pool, &input.academic_period)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "Unknown academic period '{}'",
                input.academic_period
            )))
        })?;

    let project = ProjectRepo::create(&state.pool, &input).await?;

    tracing::info!(
        user_id = user.user_id,
        project_id = project.id,
        "Project submitted for review"
    );

    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Project>>> {
    let projects = ProjectRepo::list(&state.pool, query.status_id).await?;
    Ok(Json(projects))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// POST /api/v1/projects/{id}/approve
///
/// Approve a project in review: assign its code and provision the
/// director account. Retries once on a transient transaction conflict.
pub async fn approve(
    RequireJefatura(user): RequireJefatura,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ApproveRequest>,
) -> AppResult<Json<DataResponse<ApprovedProject>>> {
    let code = input.code.trim();
    if code.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Project code must not be empty".into(),
        )));
    }

    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    // Early, explanatory refusal; the transaction re-checks the state.
    if !reporting::project::can_transition(project.status_id, ProjectStatus::Aprobado.id()) {
        return Err(AppError::Core(CoreError::InvalidState(format!(
            "Only projects in review may be approved (current status {})",
            project.status_id
        ))));
    }

    let role_id = RoleRepo::find_id_by_name(&state.pool, ROLE_DIRECTOR)
        .await?
        .ok_or_else(|| AppError::InternalError("director role missing from seed data".into()))?;

    let temporary_password = generate_temporary_password();
    let password_hash = hash_password(&temporary_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let account = CreateUser {
        username: project.director_cedula.clone(),
        email: project.director_email.clone(),
        password_hash,
        role_id,
        must_change_password: true,
    };

    let outcome = match ProjectRepo::approve(&state.pool, id, code, &account).await {
        Ok(outcome) => outcome,
        Err(err) if sigap_db::is_retryable_conflict(&err) => {
            tracing::warn!(project_id = id, "Approval conflict, retrying once");
            ProjectRepo::approve(&state.pool, id, code, &account).await?
        }
        Err(err) => return Err(err.into()),
    };

    match outcome {
        ApproveProjectOutcome::Approved {
            project,
            account_created,
            ..
        } => {
            tracing::info!(
                user_id = user.user_id,
                project_id = project.id,
                code = %code,
                account_created,
                "Project approved"
            );
            Ok(Json(DataResponse {
                data: ApprovedProject {
                    project,
                    temporary_password: account_created.then_some(temporary_password),
                },
            }))
        }
        ApproveProjectOutcome::DuplicateCode => Err(AppError::Core(CoreError::DuplicateCode(
            code.to_string(),
        ))),
        ApproveProjectOutcome::InvalidState { status_id } => {
            Err(AppError::Core(CoreError::InvalidState(format!(
                "Only projects in review may be approved (current status {status_id})"
            ))))
        }
        ApproveProjectOutcome::NotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        })),
    }
}

/// POST /api/v1/projects/{id}/reject
pub async fn reject(
    RequireJefatura(user): RequireJefatura,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let rejected = ProjectRepo::reject(&state.pool, id).await?;
    match rejected {
        Some(project) => {
            tracing::info!(user_id = user.user_id, project_id = id, "Project rejected");
            Ok(Json(project))
        }
        None => match ProjectRepo::find_by_id(&state.pool, id).await? {
            Some(_) => Err(AppError::Core(CoreError::InvalidState(
                "Only projects in review may be rejected".into(),
            ))),
            None => Err(AppError::Core(CoreError::NotFound {
                entity: "Project",
                id,
            })),
        },
    }
}

/// POST /api/v1/projects/{id}/finalize
///
/// Explicit admin action moving an approved project to its terminal
/// FINALIZADO state.
pub async fn finalize(
    RequireJefatura(user): RequireJefatura,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let finalized = ProjectRepo::finalize(&state.pool, id).await?;
    match finalized {
        Some(project) => {
            tracing::info!(user_id = user.user_id, project_id = id, "Project finalized");
            Ok(Json(project))
        }
        None => match ProjectRepo::find_by_id(&state.pool, id).await? {
            Some(_) => Err(AppError::Core(CoreError::InvalidState(
                "Only approved projects may be finalized".into(),
            ))),
            None => Err(AppError::Core(CoreError::NotFound {
                entity: "Project",
                id,
            })),
        },
    }
}

/// GET /api/v1/projects/{id}/capacity
///
/// Per-role active vs planned headcount, recomputed on demand.
pub async fn capacity(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ProjectCapacity>>>> {
    let snapshot = StaffRepo::capacity_snapshot(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    let data = StaffRole::ALL
        .iter()
        .map(|role| {
            let counts = snapshot.for_role(*role);
            ProjectCapacity {
                role: role.as_str().to_string(),
                active: counts.active,
                planned: counts.planned,
            }
        })
        .collect();

    Ok(Json(DataResponse { data }))
}
