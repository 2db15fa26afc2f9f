//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Where the entity is mutable, an update DTO with all-`Option` fields

pub mod academic_period;
pub mod activity_report;
pub mod notification;
pub mod participation;
pub mod project;
pub mod semester_report;
pub mod staff_member;
pub mod status;
pub mod user;
