pub mod academic_period;
pub mod activity_report;
pub mod auth;
pub mod health;
pub mod notification;
pub mod participation;
pub mod project;
pub mod semester_report;
pub mod staff;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                       login (public)
/// /auth/change-password                             change password (auth)
///
/// /academic-periods                                 list, create (jefatura)
///
/// /projects                                         list, submit (jefatura)
/// /projects/{id}                                    get
/// /projects/{id}/approve                            approve (jefatura)
/// /projects/{id}/reject                             reject (jefatura)
/// /projects/{id}/finalize                           finalize (jefatura)
/// /projects/{id}/capacity                           capacity read model
/// /projects/{project_id}/staff                      list, admit (director)
/// /projects/{project_id}/participations             list (+candidates filter)
/// /projects/{project_id}/semester-reports           list
///
/// /participations/{id}/retire                       retire (director)
/// /participations/{id}/finalize                     finalize (director)
///
/// /activity-reports                                 create draft (staff)
/// /activity-reports/{id}                            get with weeks + totals
/// /activity-reports/{id}/weeks                      add week (staff)
/// /activity-reports/{id}/weeks/{week_number}        remove week (staff)
/// /activity-reports/{id}/submit                     submit (staff)
/// /activity-reports/{id}/approve                    approve (director)
/// /activity-reports/{id}/reject                     reject (director)
/// /activity-reports/{id}/return-for-correction      reopen (staff)
///
/// /staff/{staff_id}/activity-reports                list reports
///
/// /semester-reports                                 open draft (director)
/// /semester-reports/{id}                            get with members + overdue
/// /semester-reports/{id}/participations/{pid}       include, exclude (director)
/// /semester-reports/{id}/send                       close and send (director)
/// /semester-reports/{id}/approve                    approve (jefatura)
///
/// /notifications                                    list, mark read
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/academic-periods", academic_period::router())
        .nest("/projects", project::router())
        .nest("/participations", participation::router())
        .nest("/activity-reports", activity_report::router())
        .nest("/staff", staff::router())
        .nest("/semester-reports", semester_report::router())
        .nest("/notifications", notification::router())
}
