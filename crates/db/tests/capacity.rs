//! Integration tests for the capacity ledger: per-role admission gating,
//! slot release on retirement, and the concurrent-admission race.

mod common;

use assert_matches::assert_matches;
use sqlx::PgPool;

use sigap_core::roles::StaffRole;
use sigap_db::repositories::{AdmitOutcome, ParticipationRepo, StaffRepo};

use common::{admission, admit_one, approved_project, seed_period, staff_role_id};

#[sqlx::test(migrations = "../../db/migrations")]
async fn admission_consumes_planned_slots_per_role(pool: PgPool) {
    seed_period(&pool, common::PERIOD).await;
    let project = approved_project(&pool, "alpha", "PRY001", 1, 2, 0).await;
    let role_id = staff_role_id(&pool).await;

    admit_one(&pool, project.id, "1001", "ayudante").await;
    admit_one(&pool, project.id, "1002", "ayudante").await;

    // Third ayudante exceeds the planned count of 2.
    let outcome = StaffRepo::admit(&pool, &admission(project.id, "1003", "ayudante", role_id))
        .await
        .unwrap();
    assert_matches!(
        outcome,
        AdmitOutcome::CapacityExceeded { active: 2, planned: 2 }
    );

    // The asistente pool is independent: one slot remains.
    admit_one(&pool, project.id, "1004", "asistente").await;
    let outcome = StaffRepo::admit(&pool, &admission(project.id, "1005", "asistente", role_id))
        .await
        .unwrap();
    assert_matches!(
        outcome,
        AdmitOutcome::CapacityExceeded { active: 1, planned: 1 }
    );

    // Tecnicos were planned at zero, so nobody is admitted.
    let outcome = StaffRepo::admit(&pool, &admission(project.id, "1006", "tecnico", role_id))
        .await
        .unwrap();
    assert_matches!(
        outcome,
        AdmitOutcome::CapacityExceeded { active: 0, planned: 0 }
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn leaving_active_state_releases_the_slot(pool: PgPool) {
    seed_period(&pool, common::PERIOD).await;
    let project = approved_project(&pool, "alpha", "PRY001", 0, 1, 0).await;
    let role_id = staff_role_id(&pool).await;

    let (_, participation) = admit_one(&pool, project.id, "1001", "ayudante").await;

    let refused = StaffRepo::admit(&pool, &admission(project.id, "1002", "ayudante", role_id))
        .await
        .unwrap();
    assert_matches!(refused, AdmitOutcome::CapacityExceeded { .. });

    // Retirement frees the slot with no explicit release call: capacity
    // is derived from ACTIVO rows on the next check.
    ParticipationRepo::retire(&pool, participation.id, "cambio de carrera")
        .await
        .unwrap()
        .expect("participation was active");

    let outcome = StaffRepo::admit(&pool, &admission(project.id, "1002", "ayudante", role_id))
        .await
        .unwrap();
    assert_matches!(outcome, AdmitOutcome::Admitted { .. });
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_admissions_cannot_exceed_capacity(pool: PgPool) {
    seed_period(&pool, common::PERIOD).await;
    let project = approved_project(&pool, "alpha", "PRY001", 0, 1, 0).await;
    let role_id = staff_role_id(&pool).await;

    // Two admissions race for a single planned ayudante slot. The
    // project row lock serializes them: exactly one commits.
    let first_admission = admission(project.id, "2001", "ayudante", role_id);
    let second_admission = admission(project.id, "2002", "ayudante", role_id);
    let first = StaffRepo::admit(&pool, &first_admission);
    let second = StaffRepo::admit(&pool, &second_admission);
    let (first, second) = tokio::join!(first, second);

    let outcomes = [first.unwrap(), second.unwrap()];
    let admitted = outcomes
        .iter()
        .filter(|o| matches!(o, AdmitOutcome::Admitted { .. }))
        .count();
    let refused = outcomes
        .iter()
        .filter(|o| matches!(o, AdmitOutcome::CapacityExceeded { active: 1, planned: 1 }))
        .count();

    assert_eq!(admitted, 1, "exactly one admission may consume the slot");
    assert_eq!(refused, 1, "the loser observes the consumed slot");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admission_requires_an_approved_project(pool: PgPool) {
    seed_period(&pool, common::PERIOD).await;
    let role_id = staff_role_id(&pool).await;

    let pending = sigap_db::repositories::ProjectRepo::create(
        &pool,
        &common::project_request("beta", 1, 1, 1),
    )
    .await
    .unwrap();

    let outcome = StaffRepo::admit(&pool, &admission(pending.id, "3001", "ayudante", role_id))
        .await
        .unwrap();
    assert_matches!(outcome, AdmitOutcome::ProjectNotApproved { .. });

    let outcome = StaffRepo::admit(&pool, &admission(999_999, "3002", "ayudante", role_id))
        .await
        .unwrap();
    assert_matches!(outcome, AdmitOutcome::ProjectNotFound);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn capacity_snapshot_reflects_only_active_participations(pool: PgPool) {
    seed_period(&pool, common::PERIOD).await;
    let project = approved_project(&pool, "alpha", "PRY001", 2, 1, 0).await;

    let (_, participation) = admit_one(&pool, project.id, "1001", "asistente").await;
    admit_one(&pool, project.id, "1002", "ayudante").await;

    ParticipationRepo::finalize(&pool, participation.id)
        .await
        .unwrap()
        .expect("participation was active");

    let snapshot = StaffRepo::capacity_snapshot(&pool, project.id)
        .await
        .unwrap()
        .expect("project exists");

    assert_eq!(snapshot.for_role(StaffRole::Asistente).active, 0);
    assert!(snapshot.for_role(StaffRole::Asistente).has_capacity());
    assert_eq!(snapshot.for_role(StaffRole::Ayudante).active, 1);
    assert!(!snapshot.for_role(StaffRole::Ayudante).has_capacity());
    assert!(!snapshot.for_role(StaffRole::Tecnico).has_capacity());
}
