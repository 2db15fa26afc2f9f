//! Route definitions for the `/activity-reports` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::activity_report;
use crate::state::AppState;

/// Routes mounted at `/activity-reports`.
///
/// ```text
/// POST   /                              -> create (staff)
/// GET    /{id}                          -> get_by_id
/// POST   /{id}/weeks                    -> add_week (staff)
/// DELETE /{id}/weeks/{week_number}      -> remove_week (staff)
/// POST   /{id}/submit                   -> submit (staff)
/// POST   /{id}/approve                  -> approve (director)
/// POST   /{id}/reject                   -> reject (director)
/// POST   /{id}/return-for-correction    -> return_for_correction (staff)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(activity_report::create))
        .route("/{id}", get(activity_report::get_by_id))
        .route("/{id}/weeks", post(activity_report::add_week))
        .route(
            "/{id}/weeks/{week_number}",
            delete(activity_report::remove_week),
        )
        .route("/{id}/submit", post(activity_report::submit))
        .route("/{id}/approve", post(activity_report::approve))
        .route("/{id}/reject", post(activity_report::reject))
        .route(
            "/{id}/return-for-correction",
            post(activity_report::return_for_correction),
        )
}
