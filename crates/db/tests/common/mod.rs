//! Shared fixtures for repository integration tests.
//!
//! Builds the minimal entity hierarchy (period -> approved project ->
//! admitted staff) that the workflow tests operate on. Password hashes
//! are opaque to this layer, so fixtures use placeholder strings.

use sqlx::PgPool;

use sigap_core::types::DbId;
use sigap_db::models::academic_period::CreateAcademicPeriod;
use sigap_db::models::participation::Participation;
use sigap_db::models::project::{CreateProject, Project};
use sigap_db::models::semester_report::OpenDraft;
use sigap_db::models::staff_member::{AdmitStaff, StaffMember};
use sigap_db::models::user::CreateUser;
use sigap_db::repositories::{
    AcademicPeriodRepo, AdmitOutcome, ProjectRepo, RoleRepo, SemesterReportRepo, StaffRepo,
    ApproveProjectOutcome, OpenDraftOutcome,
};

pub const PERIOD: &str = "2026-1";

pub async fn seed_period(pool: &PgPool, code: &str) {
    AcademicPeriodRepo::create(
        pool,
        &CreateAcademicPeriod {
            code: code.to_string(),
            starts_on: "2026-03-01".parse().unwrap(),
            ends_on: "2026-07-31".parse().unwrap(),
            report_deadline: "2026-07-15".parse().unwrap(),
        },
    )
    .await
    .expect("period fixture");
}

pub fn project_request(name: &str, asistentes: i32, ayudantes: i32, tecnicos: i32) -> CreateProject {
    CreateProject {
        name: name.to_string(),
        project_type: None,
        academic_period: PERIOD.to_string(),
        duration_months: 6,
        planned_asistentes: asistentes,
        planned_ayudantes: ayudantes,
        planned_tecnicos: tecnicos,
        director_cedula: format!("dir-{name}"),
        director_first_name: "Laura".to_string(),
        director_last_name: "Mendez".to_string(),
        director_email: format!("{name}@uni.edu"),
    }
}

pub async fn director_account_for(pool: &PgPool, project: &Project) -> CreateUser {
    let role_id = RoleRepo::find_id_by_name(pool, "director")
        .await
        .expect("role query")
        .expect("director role seeded");
    CreateUser {
        username: project.director_cedula.clone(),
        email: project.director_email.clone(),
        password_hash: "fixture-hash".to_string(),
        role_id,
        must_change_password: true,
    }
}

/// Submit and approve a project with the given code and planned counts.
pub async fn approved_project(
    pool: &PgPool,
    name: &str,
    code: &str,
    asistentes: i32,
    ayudantes: i32,
    tecnicos: i32,
) -> Project {
    let project = ProjectRepo::create(pool, &project_request(name, asistentes, ayudantes, tecnicos))
        .await
        .expect("project fixture");
    let account = director_account_for(pool, &project).await;
    match ProjectRepo::approve(pool, project.id, code, &account)
        .await
        .expect("approve fixture")
    {
        ApproveProjectOutcome::Approved { project, .. } => project,
        other => panic!("fixture approval failed: {other:?}"),
    }
}

pub async fn staff_role_id(pool: &PgPool) -> DbId {
    RoleRepo::find_id_by_name(pool, "staff")
        .await
        .expect("role query")
        .expect("staff role seeded")
}

pub fn admission(project_id: DbId, cedula: &str, role: &str, role_id: DbId) -> AdmitStaff {
    AdmitStaff {
        project_id,
        cedula: cedula.to_string(),
        first_name: "Ana".to_string(),
        last_name: "Rojas".to_string(),
        email: format!("{cedula}@uni.edu"),
        role: role.to_string(),
        start_date: "2026-03-02".parse().unwrap(),
        planned_end_date: "2026-07-31".parse().unwrap(),
        password_hash: "fixture-hash".to_string(),
        role_id,
    }
}

/// Admit one staff member, panicking on refusal.
pub async fn admit_one(
    pool: &PgPool,
    project_id: DbId,
    cedula: &str,
    role: &str,
) -> (StaffMember, Participation) {
    let role_id = staff_role_id(pool).await;
    match StaffRepo::admit(pool, &admission(project_id, cedula, role, role_id))
        .await
        .expect("admission fixture")
    {
        AdmitOutcome::Admitted {
            staff,
            participation,
        } => (staff, participation),
        other => panic!("fixture admission failed: {other:?}"),
    }
}

/// Open a semester report draft, panicking on refusal.
pub async fn open_draft(
    pool: &PgPool,
    project_id: DbId,
    period: &str,
) -> sigap_db::models::semester_report::SemesterReport {
    match SemesterReportRepo::open_draft(
        pool,
        &OpenDraft {
            project_id,
            academic_period: period.to_string(),
        },
    )
    .await
    .expect("draft fixture")
    {
        OpenDraftOutcome::Opened(report) => report,
        other => panic!("fixture draft failed: {other:?}"),
    }
}
