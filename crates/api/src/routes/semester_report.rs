//! Route definitions for the `/semester-reports` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::semester_report;
use crate::state::AppState;

/// Routes mounted at `/semester-reports`.
///
/// ```text
/// POST   /                                        -> open_draft (director)
/// GET    /{id}                                    -> get_by_id
/// POST   /{id}/participations/{participation_id}  -> include (director)
/// DELETE /{id}/participations/{participation_id}  -> exclude (director)
/// POST   /{id}/send                               -> send (director)
/// POST   /{id}/approve                            -> approve (jefatura)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(semester_report::open_draft))
        .route("/{id}", get(semester_report::get_by_id))
        .route(
            "/{id}/participations/{participation_id}",
            post(semester_report::include_participation)
                .delete(semester_report::exclude_participation),
        )
        .route("/{id}/send", post(semester_report::send))
        .route("/{id}/approve", post(semester_report::approve))
}
