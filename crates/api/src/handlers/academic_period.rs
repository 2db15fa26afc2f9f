//! Handlers for the `/academic-periods` resource.
//!
//! Periods are the collaborator that supplies report deadline dates;
//! they are managed by Jefatura as a thin CRUD resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use sigap_core::error::CoreError;
use sigap_db::models::academic_period::{AcademicPeriod, CreateAcademicPeriod};
use sigap_db::repositories::AcademicPeriodRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireJefatura};
use crate::state::AppState;

/// POST /api/v1/academic-periods
pub async fn create(
    RequireJefatura(user): RequireJefatura,
    State(state): State<AppState>,
    Json(input): Json<CreateAcademicPeriod>,
) -> AppResult<(StatusCode, Json<AcademicPeriod>)> {
    if input.code.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Period code must not be empty".into(),
        )));
    }
    if input.ends_on <= input.starts_on {
        return Err(AppError::Core(CoreError::Validation(
            "Period end must be after its start".into(),
        )));
    }

    let period = AcademicPeriodRepo::create(&state.pool, &input).await?;

    tracing::info!(user_id = user.user_id, code = %period.code, "Academic period registered");

    Ok((StatusCode::CREATED, Json(period)))
}

/// GET /api/v1/academic-periods
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<AcademicPeriod>>> {
    let periods = AcademicPeriodRepo::list(&state.pool).await?;
    Ok(Json(periods))
}
