//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Repositories stay on
//! `sqlx::Error`; business refusals discovered inside a transaction are
//! reported through typed outcome enums so the API layer can map them to
//! the domain error taxonomy.

pub mod academic_period_repo;
pub mod activity_report_repo;
pub mod notification_repo;
pub mod participation_repo;
pub mod project_repo;
pub mod role_repo;
pub mod semester_report_repo;
pub mod staff_repo;
pub mod user_repo;

pub use academic_period_repo::AcademicPeriodRepo;
pub use activity_report_repo::{ActivityReportRepo, AddWeekOutcome, RemoveWeekOutcome};
pub use notification_repo::NotificationRepo;
pub use participation_repo::ParticipationRepo;
pub use project_repo::{ApproveProjectOutcome, ProjectRepo};
pub use role_repo::RoleRepo;
pub use semester_report_repo::{IncludeOutcome, OpenDraftOutcome, SemesterReportRepo};
pub use staff_repo::{AdmitOutcome, StaffRepo};
pub use user_repo::UserRepo;
