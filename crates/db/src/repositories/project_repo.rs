//! Repository for the `projects` table, including the approval
//! transaction that assigns the project code and provisions the director
//! account.

use sqlx::PgPool;
use sigap_core::types::DbId;

use crate::models::project::{CreateProject, Project};
use crate::models::status::{ProjectStatus, StatusId};
use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, code, name, project_type, status_id, academic_period, \
    duration_months, planned_asistentes, planned_ayudantes, planned_tecnicos, \
    director_user_id, director_cedula, director_first_name, director_last_name, \
    director_email, created_at, updated_at";

/// Result of the approval transaction.
#[derive(Debug)]
pub enum ApproveProjectOutcome {
    /// Project approved; `account_created` is false when the director
    /// candidate already had an account.
    Approved {
        project: Project,
        director_user_id: DbId,
        account_created: bool,
    },
    /// The code is already assigned to another project.
    DuplicateCode,
    /// The project is not in review.
    InvalidState { status_id: StatusId },
    NotFound,
}

/// Provides CRUD and lifecycle operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Submit a new project request (state EN_REVISION, no code yet).
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects
                (name, project_type, academic_period, duration_months,
                 planned_asistentes, planned_ayudantes, planned_tecnicos,
                 director_cedula, director_first_name, director_last_name, director_email)
             VALUES ($1, COALESCE($2, 'interno'), $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.project_type)
            .bind(&input.academic_period)
            .bind(input.duration_months)
            .bind(input.planned_asistentes)
            .bind(input.planned_ayudantes)
            .bind(input.planned_tecnicos)
            .bind(&input.director_cedula)
            .bind(&input.director_first_name)
            .bind(&input.director_last_name)
            .bind(&input.director_email)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List projects, most recently created first, optionally filtered by
    /// status.
    pub async fn list(
        pool: &PgPool,
        status_id: Option<StatusId>,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE ($1::SMALLINT IS NULL OR status_id = $1)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(status_id)
            .fetch_all(pool)
            .await
    }

    /// Approve a project in review: assign its code, provision the
    /// director account if the candidate has none, and move it to
    /// APROBADO. One transaction; nothing persists on refusal.
    ///
    /// `director_account` carries the prepared credential data (username,
    /// temporary password hash) used only when no account exists for the
    /// candidate's username.
    pub async fn approve(
        pool: &PgPool,
        id: DbId,
        code: &str,
        director_account: &CreateUser,
    ) -> Result<ApproveProjectOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let status: Option<StatusId> =
            sqlx::query_scalar("SELECT status_id FROM projects WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let status_id = match status {
            None => return Ok(ApproveProjectOutcome::NotFound),
            Some(s) => s,
        };
        if status_id != ProjectStatus::EnRevision.id() {
            return Ok(ApproveProjectOutcome::InvalidState { status_id });
        }

        let code_taken: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM projects WHERE code = $1 AND id <> $2)",
        )
        .bind(code)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if code_taken {
            return Ok(ApproveProjectOutcome::DuplicateCode);
        }

        // Reuse the candidate's existing account when one exists;
        // otherwise provision one with the prepared temporary credentials.
        let existing: Option<DbId> = sqlx::query_scalar("SELECT id FROM users WHERE username = $1")
            .bind(&director_account.username)
            .fetch_optional(&mut *tx)
            .await?;

        let (director_user_id, account_created) = match existing {
            Some(user_id) => (user_id, false),
            None => {
                let user = sqlx::query_as::<_, User>(
                    "INSERT INTO users (username, email, password_hash, role_id, must_change_password)
                     VALUES ($1, $2, $3, $4, $5)
                     RETURNING id, username, email, password_hash, role_id, is_active,
                               must_change_password, last_login_at, failed_login_count,
                               locked_until, created_at, updated_at",
                )
                .bind(&director_account.username)
                .bind(&director_account.email)
                .bind(&director_account.password_hash)
                .bind(director_account.role_id)
                .bind(director_account.must_change_password)
                .fetch_one(&mut *tx)
                .await?;
                (user.id, true)
            }
        };

        let query = format!(
            "UPDATE projects
             SET code = $2, status_id = $3, director_user_id = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(code)
            .bind(ProjectStatus::Aprobado.id())
            .bind(director_user_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(ApproveProjectOutcome::Approved {
            project,
            director_user_id,
            account_created,
        })
    }

    /// Reject a project in review. Returns `None` if the project does not
    /// exist or is not EN_REVISION.
    pub async fn reject(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET status_id = $2
             WHERE id = $1 AND status_id = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(ProjectStatus::NoAprobado.id())
            .bind(ProjectStatus::EnRevision.id())
            .fetch_optional(pool)
            .await
    }

    /// Finalize an approved project (explicit admin action). Returns
    /// `None` if the project does not exist or is not APROBADO.
    pub async fn finalize(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET status_id = $2
             WHERE id = $1 AND status_id = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(ProjectStatus::Finalizado.id())
            .bind(ProjectStatus::Aprobado.id())
            .fetch_optional(pool)
            .await
    }
}
