//! Route definitions for the `/participations` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::participation;
use crate::state::AppState;

/// Routes mounted at `/participations`.
///
/// ```text
/// POST /{id}/retire    -> retire (director)
/// POST /{id}/finalize  -> finalize (director)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/retire", post(participation::retire))
        .route("/{id}/finalize", post(participation::finalize))
}
