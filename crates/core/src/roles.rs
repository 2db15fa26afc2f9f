//! Account roles and staff role definitions.
//!
//! Account role names must match the seed data in
//! `db/migrations/20260801000001_create_roles_and_users.sql`.

use crate::error::CoreError;

/// Supervisory office account role. Approves projects and semester reports.
pub const ROLE_JEFATURA: &str = "jefatura";

/// Project director account role. Registers staff and reviews reports.
pub const ROLE_DIRECTOR: &str = "director";

/// Project staff account role. Submits activity reports.
pub const ROLE_STAFF: &str = "staff";

/// Staff role on a project. A closed set: role-specific behavior is data,
/// not dispatch — the role only affects which planned-headcount column
/// gates admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaffRole {
    Asistente,
    Ayudante,
    Tecnico,
}

impl StaffRole {
    pub const ALL: [StaffRole; 3] = [StaffRole::Asistente, StaffRole::Ayudante, StaffRole::Tecnico];

    /// Database text representation. Matches the CHECK constraint on
    /// `staff_members.role`.
    pub fn as_str(self) -> &'static str {
        match self {
            StaffRole::Asistente => "asistente",
            StaffRole::Ayudante => "ayudante",
            StaffRole::Tecnico => "tecnico",
        }
    }

    /// Parse the database/API text representation.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "asistente" => Ok(StaffRole::Asistente),
            "ayudante" => Ok(StaffRole::Ayudante),
            "tecnico" => Ok(StaffRole::Tecnico),
            other => Err(CoreError::Validation(format!(
                "Invalid staff role '{other}'. Must be one of: asistente, ayudante, tecnico"
            ))),
        }
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_all_roles() {
        for role in StaffRole::ALL {
            assert_eq!(StaffRole::parse(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn rejects_unknown_role() {
        let err = StaffRole::parse("becario").unwrap_err();
        assert!(err.to_string().contains("Invalid staff role"));
    }

    #[test]
    fn display_matches_db_text() {
        assert_eq!(StaffRole::Ayudante.to_string(), "ayudante");
    }
}
