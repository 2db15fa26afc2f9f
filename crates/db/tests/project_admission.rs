//! Integration tests for the project admission and approval workflow:
//! review submission, code assignment, director account provisioning,
//! and the rejection/finalization transitions.

mod common;

use assert_matches::assert_matches;
use sqlx::PgPool;

use sigap_db::models::status::ProjectStatus;
use sigap_db::repositories::{ApproveProjectOutcome, ProjectRepo, UserRepo};

use common::{approved_project, director_account_for, project_request, seed_period};

#[sqlx::test(migrations = "../../db/migrations")]
async fn submitted_project_enters_review_without_code(pool: PgPool) {
    seed_period(&pool, common::PERIOD).await;

    let project = ProjectRepo::create(&pool, &project_request("robotics", 1, 2, 0))
        .await
        .unwrap();

    assert_eq!(project.status_id, ProjectStatus::EnRevision.id());
    assert_eq!(project.code, None);
    assert_eq!(project.director_user_id, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn approval_assigns_code_and_provisions_director(pool: PgPool) {
    seed_period(&pool, common::PERIOD).await;

    let project = ProjectRepo::create(&pool, &project_request("robotics", 1, 2, 0))
        .await
        .unwrap();
    let account = director_account_for(&pool, &project).await;

    let outcome = ProjectRepo::approve(&pool, project.id, "PRY001", &account)
        .await
        .unwrap();

    let (approved, director_user_id, account_created) = match outcome {
        ApproveProjectOutcome::Approved {
            project,
            director_user_id,
            account_created,
        } => (project, director_user_id, account_created),
        other => panic!("expected approval, got {other:?}"),
    };

    assert_eq!(approved.status_id, ProjectStatus::Aprobado.id());
    assert_eq!(approved.code.as_deref(), Some("PRY001"));
    assert_eq!(approved.director_user_id, Some(director_user_id));
    assert!(account_created);

    // The provisioned account must force a password change on first login.
    let user = UserRepo::find_by_id(&pool, director_user_id)
        .await
        .unwrap()
        .expect("director account exists");
    assert!(user.must_change_password);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn approval_reuses_existing_director_account(pool: PgPool) {
    seed_period(&pool, common::PERIOD).await;

    let first = approved_project(&pool, "alpha", "PRY001", 1, 1, 1).await;

    // Second project submitted by the same director candidate.
    let mut request = project_request("alpha", 0, 1, 0);
    request.name = "alpha-phase-two".to_string();
    let second = ProjectRepo::create(&pool, &request).await.unwrap();
    let account = director_account_for(&pool, &second).await;

    let outcome = ProjectRepo::approve(&pool, second.id, "PRY002", &account)
        .await
        .unwrap();

    match outcome {
        ApproveProjectOutcome::Approved {
            director_user_id,
            account_created,
            ..
        } => {
            assert!(!account_created);
            assert_eq!(Some(director_user_id), first.director_user_id);
        }
        other => panic!("expected approval, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_code_is_refused(pool: PgPool) {
    seed_period(&pool, common::PERIOD).await;

    approved_project(&pool, "alpha", "PRY001", 1, 1, 1).await;

    let other = ProjectRepo::create(&pool, &project_request("beta", 1, 0, 0))
        .await
        .unwrap();
    let account = director_account_for(&pool, &other).await;

    let outcome = ProjectRepo::approve(&pool, other.id, "PRY001", &account)
        .await
        .unwrap();
    assert_matches!(outcome, ApproveProjectOutcome::DuplicateCode);

    // The refused project is untouched.
    let still_pending = ProjectRepo::find_by_id(&pool, other.id).await.unwrap().unwrap();
    assert_eq!(still_pending.status_id, ProjectStatus::EnRevision.id());
    assert_eq!(still_pending.code, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn approving_twice_is_an_invalid_state(pool: PgPool) {
    seed_period(&pool, common::PERIOD).await;

    let project = approved_project(&pool, "alpha", "PRY001", 1, 1, 1).await;
    let account = director_account_for(&pool, &project).await;

    let outcome = ProjectRepo::approve(&pool, project.id, "PRY009", &account)
        .await
        .unwrap();
    assert_matches!(
        outcome,
        ApproveProjectOutcome::InvalidState { status_id } if status_id == ProjectStatus::Aprobado.id()
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rejection_is_terminal_and_only_from_review(pool: PgPool) {
    seed_period(&pool, common::PERIOD).await;

    let project = ProjectRepo::create(&pool, &project_request("gamma", 0, 1, 0))
        .await
        .unwrap();

    let rejected = ProjectRepo::reject(&pool, project.id).await.unwrap().unwrap();
    assert_eq!(rejected.status_id, ProjectStatus::NoAprobado.id());

    // No further transitions from NO_APROBADO.
    assert!(ProjectRepo::reject(&pool, project.id).await.unwrap().is_none());
    let account = director_account_for(&pool, &project).await;
    let outcome = ProjectRepo::approve(&pool, project.id, "PRY003", &account)
        .await
        .unwrap();
    assert_matches!(outcome, ApproveProjectOutcome::InvalidState { .. });
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn finalize_requires_an_approved_project(pool: PgPool) {
    seed_period(&pool, common::PERIOD).await;

    let pending = ProjectRepo::create(&pool, &project_request("delta", 0, 1, 0))
        .await
        .unwrap();
    assert!(ProjectRepo::finalize(&pool, pending.id).await.unwrap().is_none());

    let approved = approved_project(&pool, "epsilon", "PRY004", 1, 1, 1).await;
    let finalized = ProjectRepo::finalize(&pool, approved.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(finalized.status_id, ProjectStatus::Finalizado.id());
}
