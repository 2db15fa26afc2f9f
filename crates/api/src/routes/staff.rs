//! Route definitions for the `/staff` resource.
//!
//! Staff admission lives under `/projects/{project_id}/staff`; this
//! router carries the staff-scoped report listing.

use axum::routing::get;
use axum::Router;

use crate::handlers::activity_report;
use crate::state::AppState;

/// Routes mounted at `/staff`.
///
/// ```text
/// GET /{staff_id}/activity-reports  -> activity_report::list_by_staff
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{staff_id}/activity-reports",
        get(activity_report::list_by_staff),
    )
}
