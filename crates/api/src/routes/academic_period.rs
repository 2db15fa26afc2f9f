//! Route definitions for the `/academic-periods` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::academic_period;
use crate::state::AppState;

/// Routes mounted at `/academic-periods`.
///
/// ```text
/// GET  /  -> list
/// POST /  -> create (jefatura)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(academic_period::list).post(academic_period::create),
    )
}
