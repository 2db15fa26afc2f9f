//! Handlers for the weekly activity report workflow: drafting, week
//! management, submission, and the director's review decisions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use sigap_core::error::CoreError;
use sigap_core::reporting;
use sigap_core::timesheet::{self, WorkedDay};
use sigap_core::types::DbId;
use sigap_db::models::activity_report::{
    ActivityReport, ActivityReportDetail, AddWeek, WeekDetail, WeeklyEntry,
};
use sigap_db::models::staff_member::StaffMember;
use sigap_db::models::status::ActivityReportStatus;
use sigap_db::repositories::{
    ActivityReportRepo, AddWeekOutcome, NotificationRepo, ProjectRepo, RemoveWeekOutcome,
    StaffRepo,
};

use crate::error::{AppError, AppResult};
use crate::handlers::staff::ensure_project_director;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAuth, RequireDirector, RequireStaff};
use crate::state::AppState;

/// Request body for `POST /activity-reports/{id}/reject`.
#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve the staff record bound to the authenticated staff account.
async fn staff_for_user(state: &AppState, auth: &AuthUser) -> AppResult<StaffMember> {
    StaffRepo::find_by_user_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Forbidden(
                "No staff record is bound to this account".into(),
            ))
        })
}

/// Load a report and check it belongs to the authenticated staff member.
async fn owned_report(
    state: &AppState,
    report_id: DbId,
    auth: &AuthUser,
) -> AppResult<ActivityReport> {
    let report = ActivityReportRepo::find_by_id(&state.pool, report_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ActivityReport",
            id: report_id,
        }))?;
    let staff = staff_for_user(state, auth).await?;
    if report.staff_member_id != staff.id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Reports may only be edited by their owner".into(),
        )));
    }
    Ok(report)
}

/// Load a report and check the authenticated director reviews it.
async fn reviewed_report(
    state: &AppState,
    report_id: DbId,
    auth: &AuthUser,
) -> AppResult<(ActivityReport, StaffMember)> {
    let report = ActivityReportRepo::find_by_id(&state.pool, report_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ActivityReport",
            id: report_id,
        }))?;
    let staff = StaffRepo::find_by_id(&state.pool, report.staff_member_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "StaffMember",
            id: report.staff_member_id,
        }))?;
    ensure_project_director(state, staff.project_id, auth).await?;
    Ok((report, staff))
}

/// Assemble the read model: weeks, worked days, and derived totals.
async fn report_detail(
    state: &AppState,
    report: ActivityReport,
) -> AppResult<ActivityReportDetail> {
    let weeks = ActivityReportRepo::weeks(&state.pool, report.id).await?;
    let days = ActivityReportRepo::days(&state.pool, report.id).await?;

    let week_details: Vec<WeekDetail> = weeks
        .into_iter()
        .map(|entry: WeeklyEntry| {
            let triples: Vec<WorkedDay> = days
                .iter()
                .filter(|d| d.weekly_entry_id == entry.id)
                .map(|d| WorkedDay {
                    work_date: d.work_date,
                    start_time: d.start_time,
                    end_time: d.end_time,
                })
                .collect();
            let entry_days = days
                .iter()
                .filter(|d| d.weekly_entry_id == entry.id)
                .cloned()
                .collect();
            WeekDetail {
                hours_worked: timesheet::hours_worked(&triples),
                days_worked: timesheet::days_worked(&triples),
                entry,
                days: entry_days,
            }
        })
        .collect();

    let total_hours = week_details.iter().map(|w| w.hours_worked).sum();

    Ok(ActivityReportDetail {
        report,
        weeks: week_details,
        total_hours,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/activity-reports
///
/// Open a new report draft for the authenticated staff member.
pub async fn create(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<ActivityReport>)> {
    let staff = staff_for_user(&state, &auth).await?;
    let report = ActivityReportRepo::create(&state.pool, staff.id).await?;

    tracing::info!(
        user_id = auth.user_id,
        report_id = report.id,
        "Activity report draft created"
    );

    Ok((StatusCode::CREATED, Json(report)))
}

/// GET /api/v1/activity-reports/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ActivityReportDetail>> {
    let report = ActivityReportRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ActivityReport",
            id,
        }))?;
    Ok(Json(report_detail(&state, report).await?))
}

/// GET /api/v1/staff/{staff_id}/activity-reports
pub async fn list_by_staff(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(staff_id): Path<DbId>,
) -> AppResult<Json<Vec<ActivityReport>>> {
    StaffRepo::find_by_id(&state.pool, staff_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "StaffMember",
            id: staff_id,
        }))?;
    let reports = ActivityReportRepo::list_by_staff(&state.pool, staff_id).await?;
    Ok(Json(reports))
}

/// POST /api/v1/activity-reports/{id}/weeks
///
/// Append a week with up to five worked-day triples. Only while the
/// report is in edition.
pub async fn add_week(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AddWeek>,
) -> AppResult<(StatusCode, Json<WeeklyEntry>)> {
    owned_report(&state, id, &auth).await?;

    let triples: Vec<WorkedDay> = input
        .days
        .iter()
        .map(|d| WorkedDay {
            work_date: d.work_date,
            start_time: d.start_time,
            end_time: d.end_time,
        })
        .collect();
    timesheet::validate_week_days(&triples).map_err(AppError::Core)?;

    match ActivityReportRepo::add_week(&state.pool, id, &input).await? {
        AddWeekOutcome::Added(entry) => {
            tracing::info!(
                user_id = auth.user_id,
                report_id = id,
                week_number = entry.week_number,
                "Week added to activity report"
            );
            Ok((StatusCode::CREATED, Json(entry)))
        }
        AddWeekOutcome::NotEditable => Err(AppError::Core(CoreError::InvalidState(
            "Weeks may only be added while the report is in edition".into(),
        ))),
    }
}

/// DELETE /api/v1/activity-reports/{id}/weeks/{week_number}
///
/// Remove a week and renumber the rest. A report in edition keeps at
/// least one week.
pub async fn remove_week(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
    Path((id, week_number)): Path<(DbId, i32)>,
) -> AppResult<StatusCode> {
    owned_report(&state, id, &auth).await?;

    match ActivityReportRepo::remove_week(&state.pool, id, week_number).await? {
        RemoveWeekOutcome::Removed => {
            tracing::info!(
                user_id = auth.user_id,
                report_id = id,
                week_number,
                "Week removed from activity report"
            );
            Ok(StatusCode::NO_CONTENT)
        }
        RemoveWeekOutcome::MinimumWeek => Err(AppError::Core(CoreError::MinimumWeek)),
        RemoveWeekOutcome::WeekNotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "WeeklyEntry",
            id: week_number as DbId,
        })),
        RemoveWeekOutcome::NotEditable => Err(AppError::Core(CoreError::InvalidState(
            "Weeks may only be removed while the report is in edition".into(),
        ))),
    }
}

/// POST /api/v1/activity-reports/{id}/submit
///
/// Submit the report for review. Requires at least one week with a
/// recorded working day; notifies the project's director.
pub async fn submit(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ActivityReport>> {
    let report = owned_report(&state, id, &auth).await?;

    if !reporting::activity_report::can_transition(
        report.status_id,
        ActivityReportStatus::Enviado.id(),
    ) {
        return Err(AppError::Core(CoreError::InvalidState(
            "Only reports in edition may be submitted".into(),
        )));
    }

    let weeks = ActivityReportRepo::weeks(&state.pool, id).await?;
    let days = ActivityReportRepo::days(&state.pool, id).await?;
    let days_per_week: Vec<usize> = weeks
        .iter()
        .map(|w| days.iter().filter(|d| d.weekly_entry_id == w.id).count())
        .collect();
    if !reporting::is_report_complete(&days_per_week) {
        return Err(AppError::Core(CoreError::IncompleteReport));
    }

    let submitted = ActivityReportRepo::submit(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::InvalidState(
                "Only reports in edition may be submitted".into(),
            ))
        })?;

    // Notify the project's director that a report awaits review.
    let staff = StaffRepo::find_by_id(&state.pool, report.staff_member_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "StaffMember",
            id: report.staff_member_id,
        }))?;
    let project = ProjectRepo::find_by_id(&state.pool, staff.project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: staff.project_id,
        }))?;
    if let Some(director_user_id) = project.director_user_id {
        NotificationRepo::create(
            &state.pool,
            director_user_id,
            &format!(
                "{} {} submitted an activity report for review",
                staff.first_name, staff.last_name
            ),
        )
        .await?;
    }

    tracing::info!(
        user_id = auth.user_id,
        report_id = id,
        "Activity report submitted"
    );

    Ok(Json(submitted))
}

/// POST /api/v1/activity-reports/{id}/approve
///
/// Approve a submitted report. Only the director of the staff member's
/// project may decide.
pub async fn approve(
    RequireDirector(auth): RequireDirector,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ActivityReport>> {
    reviewed_report(&state, id, &auth).await?;

    let approved = ActivityReportRepo::approve(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::InvalidState(
                "Only submitted reports may be approved".into(),
            ))
        })?;

    tracing::info!(
        user_id = auth.user_id,
        report_id = id,
        "Activity report approved"
    );

    Ok(Json(approved))
}

/// POST /api/v1/activity-reports/{id}/reject
///
/// Reject a submitted report with a reason; the staff member is
/// notified with the reason included.
pub async fn reject(
    RequireDirector(auth): RequireDirector,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RejectRequest>,
) -> AppResult<Json<ActivityReport>> {
    let reason = input.reason.trim();
    if reason.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "A rejection reason is required".into(),
        )));
    }

    let (_, staff) = reviewed_report(&state, id, &auth).await?;

    let rejected = ActivityReportRepo::reject(&state.pool, id, reason)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::InvalidState(
                "Only submitted reports may be rejected".into(),
            ))
        })?;

    NotificationRepo::create(
        &state.pool,
        staff.user_id,
        &format!("Your activity report was returned: {reason}"),
    )
    .await?;

    tracing::info!(
        user_id = auth.user_id,
        report_id = id,
        "Activity report rejected"
    );

    Ok(Json(rejected))
}

/// POST /api/v1/activity-reports/{id}/return-for-correction
///
/// Reopen a rejected report for editing. No week data is cleared.
pub async fn return_for_correction(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ActivityReport>> {
    owned_report(&state, id, &auth).await?;

    let reopened = ActivityReportRepo::return_for_correction(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::InvalidState(
                "Only rejected reports may be returned for correction".into(),
            ))
        })?;

    tracing::info!(
        user_id = auth.user_id,
        report_id = id,
        "Activity report returned for correction"
    );

    Ok(Json(reopened))
}
