//! Repository for the `roles` lookup table.

use sqlx::PgPool;
use sigap_core::types::DbId;

/// Lookup operations for account roles.
pub struct RoleRepo;

impl RoleRepo {
    /// Find a role's ID by its seed name (`"jefatura"`, `"director"`,
    /// `"staff"`).
    pub async fn find_id_by_name(pool: &PgPool, name: &str) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a role ID back to its name.
    pub async fn resolve_name(pool: &PgPool, role_id: DbId) -> Result<String, sqlx::Error> {
        sqlx::query_scalar("SELECT name FROM roles WHERE id = $1")
            .bind(role_id)
            .fetch_one(pool)
            .await
    }
}
