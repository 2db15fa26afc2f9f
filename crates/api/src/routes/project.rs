//! Route definitions for the `/projects` resource.
//!
//! Also nests staff admission and the project-scoped participation and
//! semester-report listings under `/projects/{project_id}/...`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{participation, project, semester_report, staff};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create (jefatura)
/// GET    /{id}                              -> get_by_id
/// POST   /{id}/approve                      -> approve (jefatura)
/// POST   /{id}/reject                       -> reject (jefatura)
/// POST   /{id}/finalize                     -> finalize (jefatura)
/// GET    /{id}/capacity                     -> capacity
///
/// GET    /{project_id}/staff                -> staff::list_by_project
/// POST   /{project_id}/staff                -> staff::admit (director)
/// POST   /{project_id}/staff/{id}/deactivate -> staff::deactivate (director)
/// GET    /{project_id}/participations       -> participation::list_by_project
/// GET    /{project_id}/semester-reports     -> semester_report::list_by_project
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/{id}", get(project::get_by_id))
        .route("/{id}/approve", post(project::approve))
        .route("/{id}/reject", post(project::reject))
        .route("/{id}/finalize", post(project::finalize))
        .route("/{id}/capacity", get(project::capacity))
        .route(
            "/{project_id}/staff",
            get(staff::list_by_project).post(staff::admit),
        )
        .route(
            "/{project_id}/staff/{id}/deactivate",
            post(staff::deactivate),
        )
        .route(
            "/{project_id}/participations",
            get(participation::list_by_project),
        )
        .route(
            "/{project_id}/semester-reports",
            get(semester_report::list_by_project),
        )
}
