//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role
//! does not meet the minimum requirement. Use these in route handlers to
//! enforce authorization at the type level. Ownership checks (e.g. "the
//! reviewer directs this staff member's project") stay in the handlers,
//! which have the entities at hand.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sigap_core::error::CoreError;
use sigap_core::roles::{ROLE_DIRECTOR, ROLE_JEFATURA, ROLE_STAFF};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `jefatura` role. Rejects with 403 Forbidden otherwise.
pub struct RequireJefatura(pub AuthUser);

impl FromRequestParts<AppState> for RequireJefatura {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_JEFATURA {
            return Err(AppError::Core(CoreError::Forbidden(
                "Jefatura role required".into(),
            )));
        }
        Ok(RequireJefatura(user))
    }
}

/// Requires the `director` role. Rejects with 403 Forbidden otherwise.
pub struct RequireDirector(pub AuthUser);

impl FromRequestParts<AppState> for RequireDirector {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_DIRECTOR {
            return Err(AppError::Core(CoreError::Forbidden(
                "Director role required".into(),
            )));
        }
        Ok(RequireDirector(user))
    }
}

/// Requires any authenticated user (any valid role).
///
/// Functionally equivalent to [`AuthUser`] but named explicitly for use
/// in route definitions where the intent "this route requires
/// authentication" should be self-documenting.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}

/// Requires the `staff` role. Rejects with 403 Forbidden otherwise.
pub struct RequireStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_STAFF {
            return Err(AppError::Core(CoreError::Forbidden(
                "Staff role required".into(),
            )));
        }
        Ok(RequireStaff(user))
    }
}
