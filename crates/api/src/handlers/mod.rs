pub mod academic_period;
pub mod activity_report;
pub mod auth;
pub mod notification;
pub mod participation;
pub mod project;
pub mod semester_report;
pub mod staff;
