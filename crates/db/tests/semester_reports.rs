//! Integration tests for the semester report aggregator: the
//! single-open-draft and period-quota gates, membership rules, and the
//! close/approve transitions.

mod common;

use assert_matches::assert_matches;
use sqlx::PgPool;

use sigap_db::models::semester_report::OpenDraft;
use sigap_db::models::status::SemesterReportStatus;
use sigap_db::repositories::{
    IncludeOutcome, OpenDraftOutcome, ParticipationRepo, SemesterReportRepo,
};

use common::{admit_one, approved_project, open_draft, seed_period};

fn draft_request(project_id: i64, period: &str) -> OpenDraft {
    OpenDraft {
        project_id,
        academic_period: period.to_string(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_one_draft_may_be_open_per_project(pool: PgPool) {
    seed_period(&pool, common::PERIOD).await;
    let project = approved_project(&pool, "alpha", "PRY001", 1, 1, 1).await;

    open_draft(&pool, project.id, common::PERIOD).await;

    let outcome = SemesterReportRepo::open_draft(&pool, &draft_request(project.id, common::PERIOD))
        .await
        .unwrap();
    assert_matches!(outcome, OpenDraftOutcome::DraftAlreadyOpen);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_draft_opens_admit_exactly_one(pool: PgPool) {
    seed_period(&pool, common::PERIOD).await;
    let project = approved_project(&pool, "alpha", "PRY001", 1, 1, 1).await;

    let first_request = draft_request(project.id, common::PERIOD);
    let second_request = draft_request(project.id, common::PERIOD);
    let first = SemesterReportRepo::open_draft(&pool, &first_request);
    let second = SemesterReportRepo::open_draft(&pool, &second_request);
    let (first, second) = tokio::join!(first, second);

    let outcomes = [first.unwrap(), second.unwrap()];
    let opened = outcomes
        .iter()
        .filter(|o| matches!(o, OpenDraftOutcome::Opened(_)))
        .count();
    let refused = outcomes
        .iter()
        .filter(|o| matches!(o, OpenDraftOutcome::DraftAlreadyOpen))
        .count();
    assert_eq!(opened, 1);
    assert_eq!(refused, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn a_period_holds_at_most_two_reports(pool: PgPool) {
    seed_period(&pool, common::PERIOD).await;
    let project = approved_project(&pool, "alpha", "PRY001", 1, 1, 1).await;

    // First report: open and send.
    let first = open_draft(&pool, project.id, common::PERIOD).await;
    SemesterReportRepo::send(&pool, first.id)
        .await
        .unwrap()
        .expect("send first");

    // Second report for the same period is allowed.
    let second = open_draft(&pool, project.id, common::PERIOD).await;
    SemesterReportRepo::send(&pool, second.id)
        .await
        .unwrap()
        .expect("send second");

    // Third hits the quota.
    let outcome = SemesterReportRepo::open_draft(&pool, &draft_request(project.id, common::PERIOD))
        .await
        .unwrap();
    assert_matches!(outcome, OpenDraftOutcome::QuotaExceeded { count: 2 });

    // A different period starts fresh.
    seed_period(&pool, "2026-2").await;
    let outcome = SemesterReportRepo::open_draft(&pool, &draft_request(project.id, "2026-2"))
        .await
        .unwrap();
    assert_matches!(outcome, OpenDraftOutcome::Opened(_));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn membership_accepts_only_active_same_project_participations(pool: PgPool) {
    seed_period(&pool, common::PERIOD).await;
    let project = approved_project(&pool, "alpha", "PRY001", 1, 2, 0).await;
    let other = approved_project(&pool, "beta", "PRY002", 0, 1, 0).await;

    let (_, active) = admit_one(&pool, project.id, "1001", "ayudante").await;
    let (_, retired) = admit_one(&pool, project.id, "1002", "ayudante").await;
    let (_, foreign) = admit_one(&pool, other.id, "1003", "ayudante").await;

    ParticipationRepo::retire(&pool, retired.id, "motivos personales")
        .await
        .unwrap()
        .expect("was active");

    let report = open_draft(&pool, project.id, common::PERIOD).await;

    let outcome = SemesterReportRepo::include(&pool, report.id, active.id)
        .await
        .unwrap();
    assert_eq!(outcome, IncludeOutcome::Included);

    // Duplicate include is a no-op, not an error.
    let outcome = SemesterReportRepo::include(&pool, report.id, active.id)
        .await
        .unwrap();
    assert_eq!(outcome, IncludeOutcome::AlreadyIncluded);

    let outcome = SemesterReportRepo::include(&pool, report.id, retired.id)
        .await
        .unwrap();
    assert_eq!(outcome, IncludeOutcome::NotEligible);

    let outcome = SemesterReportRepo::include(&pool, report.id, foreign.id)
        .await
        .unwrap();
    assert_eq!(outcome, IncludeOutcome::NotEligible);

    let members = SemesterReportRepo::members(&pool, report.id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].id, active.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn membership_is_frozen_after_send(pool: PgPool) {
    seed_period(&pool, common::PERIOD).await;
    let project = approved_project(&pool, "alpha", "PRY001", 0, 1, 0).await;
    let (_, participation) = admit_one(&pool, project.id, "1001", "ayudante").await;

    let report = open_draft(&pool, project.id, common::PERIOD).await;
    SemesterReportRepo::include(&pool, report.id, participation.id)
        .await
        .unwrap();

    let sent = SemesterReportRepo::send(&pool, report.id)
        .await
        .unwrap()
        .expect("send from edition");
    assert_eq!(sent.status_id, SemesterReportStatus::Cerrado.id());
    assert!(sent.close_date.is_some());

    let outcome = SemesterReportRepo::include(&pool, report.id, participation.id)
        .await
        .unwrap();
    assert_eq!(outcome, IncludeOutcome::NotEditable);
    assert!(SemesterReportRepo::exclude(&pool, report.id, participation.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn approval_requires_a_closed_report(pool: PgPool) {
    seed_period(&pool, common::PERIOD).await;
    let project = approved_project(&pool, "alpha", "PRY001", 1, 1, 1).await;

    let report = open_draft(&pool, project.id, common::PERIOD).await;

    // Still in edition: approval does not apply.
    assert!(SemesterReportRepo::approve(&pool, report.id)
        .await
        .unwrap()
        .is_none());

    SemesterReportRepo::send(&pool, report.id)
        .await
        .unwrap()
        .expect("send from edition");
    let approved = SemesterReportRepo::approve(&pool, report.id)
        .await
        .unwrap()
        .expect("approve from closed");
    assert_eq!(approved.status_id, SemesterReportStatus::Aprobado.id());

    // Approval is terminal.
    assert!(SemesterReportRepo::approve(&pool, report.id)
        .await
        .unwrap()
        .is_none());
    assert!(SemesterReportRepo::send(&pool, report.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn included_participations_leave_the_candidate_list(pool: PgPool) {
    seed_period(&pool, common::PERIOD).await;
    let project = approved_project(&pool, "alpha", "PRY001", 0, 2, 0).await;
    let (_, first) = admit_one(&pool, project.id, "1001", "ayudante").await;
    let (_, second) = admit_one(&pool, project.id, "1002", "ayudante").await;

    let report = open_draft(&pool, project.id, common::PERIOD).await;
    SemesterReportRepo::include(&pool, report.id, first.id)
        .await
        .unwrap();

    let candidates =
        ParticipationRepo::candidates_for_period(&pool, project.id, common::PERIOD)
            .await
            .unwrap();
    let ids: Vec<_> = candidates.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![second.id]);

    // Excluding puts it back on the candidate list.
    SemesterReportRepo::exclude(&pool, report.id, first.id)
        .await
        .unwrap()
        .expect("report editable");
    let candidates =
        ParticipationRepo::candidates_for_period(&pool, project.id, common::PERIOD)
            .await
            .unwrap();
    assert_eq!(candidates.len(), 2);
}
