//! Handlers for the semester report aggregator: draft opening under the
//! single-draft and period-quota gates, membership management, closing,
//! and Jefatura approval.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use sigap_core::error::CoreError;
use sigap_core::reporting::{self, MAX_REPORTS_PER_PERIOD};
use sigap_core::types::DbId;
use sigap_db::models::semester_report::{OpenDraft, SemesterReport, SemesterReportDetail};
use sigap_db::models::status::SemesterReportStatus;
use sigap_db::repositories::{
    AcademicPeriodRepo, IncludeOutcome, OpenDraftOutcome, ProjectRepo, SemesterReportRepo,
};

use crate::error::{AppError, AppResult};
use crate::handlers::staff::ensure_project_director;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAuth, RequireDirector, RequireJefatura};
use crate::state::AppState;

/// Load a report and check the authenticated director owns its project.
async fn owned_report(
    state: &AppState,
    report_id: DbId,
    auth: &AuthUser,
) -> AppResult<SemesterReport> {
    let report = SemesterReportRepo::find_by_id(&state.pool, report_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SemesterReport",
            id: report_id,
        }))?;
    ensure_project_director(state, report.project_id, auth).await?;
    Ok(report)
}

/// POST /api/v1/semester-reports
///
/// Open a new draft for a project and period. At most one draft may be
/// open per project, and a period holds at most two reports; both gates
/// are re-checked atomically inside the repository transaction. Retries
/// once on a transient transaction conflict.
pub async fn open_draft(
    RequireDirector(auth): RequireDirector,
    State(state): State<AppState>,
    Json(input): Json<OpenDraft>,
) -> AppResult<(StatusCode, Json<SemesterReport>)> {
    ensure_project_director(&state, input.project_id, &auth).await?;

    AcademicPeriodRepo::find_by_code(&state.pool, &input.academic_period)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "Unknown academic period '{}'",
                input.academic_period
            )))
        })?;

    let outcome = match SemesterReportRepo::open_draft(&state.pool, &input).await {
        Ok(outcome) => outcome,
        Err(err) if sigap_db::is_retryable_conflict(&err) => {
            tracing::warn!(
                project_id = input.project_id,
                "Draft-open conflict, retrying once"
            );
            SemesterReportRepo::open_draft(&state.pool, &input).await?
        }
        Err(err) => return Err(err.into()),
    };

    match outcome {
        OpenDraftOutcome::Opened(report) => {
            tracing::info!(
                user_id = auth.user_id,
                project_id = input.project_id,
                report_id = report.id,
                period = %input.academic_period,
                "Semester report draft opened"
            );
            Ok((StatusCode::CREATED, Json(report)))
        }
        OpenDraftOutcome::DraftAlreadyOpen => Err(AppError::Core(CoreError::DraftAlreadyOpen {
            project_id: input.project_id,
        })),
        OpenDraftOutcome::QuotaExceeded { count } => {
            Err(AppError::Core(CoreError::PeriodQuotaExceeded {
                period: input.academic_period.clone(),
                count,
                max: MAX_REPORTS_PER_PERIOD,
            }))
        }
        OpenDraftOutcome::ProjectNotApproved { .. } => {
            Err(AppError::Core(CoreError::InvalidState(
                "Semester reports exist only for approved projects".into(),
            )))
        }
        OpenDraftOutcome::ProjectNotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: input.project_id,
        })),
    }
}

/// GET /api/v1/semester-reports/{id}
///
/// The report with its member participations and the overdue flag
/// computed against the period's report deadline.
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<SemesterReportDetail>> {
    let report = SemesterReportRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SemesterReport",
            id,
        }))?;

    let period = AcademicPeriodRepo::find_by_code(&state.pool, &report.academic_period)
        .await?
        .ok_or_else(|| {
            AppError::InternalError(format!(
                "academic period '{}' missing for report {id}",
                report.academic_period
            ))
        })?;

    let participations = SemesterReportRepo::members(&state.pool, id).await?;
    let is_overdue = reporting::is_overdue(
        report.close_date,
        period.report_deadline,
        Utc::now().date_naive(),
    );

    Ok(Json(SemesterReportDetail {
        report,
        participations,
        is_overdue,
    }))
}

/// GET /api/v1/projects/{project_id}/semester-reports
pub async fn list_by_project(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<SemesterReport>>> {
    ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;
    let reports = SemesterReportRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(reports))
}

/// POST /api/v1/semester-reports/{id}/participations/{participation_id}
///
/// Include a participation in the draft. Re-including a member is a
/// no-op (set semantics).
pub async fn include_participation(
    RequireDirector(auth): RequireDirector,
    State(state): State<AppState>,
    Path((id, participation_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    owned_report(&state, id, &auth).await?;

    match SemesterReportRepo::include(&state.pool, id, participation_id).await? {
        IncludeOutcome::Included | IncludeOutcome::AlreadyIncluded => {
            tracing::info!(
                user_id = auth.user_id,
                report_id = id,
                participation_id,
                "Participation included in semester report"
            );
            Ok(StatusCode::NO_CONTENT)
        }
        IncludeOutcome::NotEditable => Err(AppError::Core(CoreError::InvalidState(
            "Membership may only change while the report is in edition".into(),
        ))),
        IncludeOutcome::NotEligible => Err(AppError::Core(CoreError::Validation(
            "Only active participations of the report's project may be included".into(),
        ))),
        IncludeOutcome::ReportNotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "SemesterReport",
            id,
        })),
        IncludeOutcome::ParticipationNotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Participation",
            id: participation_id,
        })),
    }
}

/// DELETE /api/v1/semester-reports/{id}/participations/{participation_id}
pub async fn exclude_participation(
    RequireDirector(auth): RequireDirector,
    State(state): State<AppState>,
    Path((id, participation_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    owned_report(&state, id, &auth).await?;

    match SemesterReportRepo::exclude(&state.pool, id, participation_id).await? {
        Some(true) => {
            tracing::info!(
                user_id = auth.user_id,
                report_id = id,
                participation_id,
                "Participation excluded from semester report"
            );
            Ok(StatusCode::NO_CONTENT)
        }
        Some(false) => Err(AppError::Core(CoreError::NotFound {
            entity: "Participation",
            id: participation_id,
        })),
        None => Err(AppError::Core(CoreError::InvalidState(
            "Membership may only change while the report is in edition".into(),
        ))),
    }
}

/// POST /api/v1/semester-reports/{id}/send
///
/// Close the draft and send it upward: EN_EDICION -> CERRADO, stamping
/// the close date. Terminal for director-side mutation.
pub async fn send(
    RequireDirector(auth): RequireDirector,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<SemesterReport>> {
    owned_report(&state, id, &auth).await?;

    let sent = SemesterReportRepo::send(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::InvalidState(
                "Only reports in edition may be sent".into(),
            ))
        })?;

    tracing::info!(
        user_id = auth.user_id,
        report_id = id,
        "Semester report sent for approval"
    );

    Ok(Json(sent))
}

/// POST /api/v1/semester-reports/{id}/approve
///
/// Jefatura's final approval: CERRADO -> APROBADO.
pub async fn approve(
    RequireJefatura(user): RequireJefatura,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<SemesterReport>> {
    let report = SemesterReportRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SemesterReport",
            id,
        }))?;

    // Early, explanatory refusal; the conditional update re-checks.
    if !reporting::semester_report::can_transition(
        report.status_id,
        SemesterReportStatus::Aprobado.id(),
    ) {
        return Err(AppError::Core(CoreError::InvalidState(
            "only closed reports may be approved".into(),
        )));
    }

    let approved = SemesterReportRepo::approve(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::InvalidState(
                "only closed reports may be approved".into(),
            ))
        })?;

    tracing::info!(
        user_id = user.user_id,
        report_id = id,
        "Semester report approved"
    );

    Ok(Json(approved))
}
