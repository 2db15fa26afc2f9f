use crate::types::DbId;

/// Domain error taxonomy shared by the repository and API layers.
///
/// Business-rule refusals carry the counts or state that explain the
/// refusal; none of them are retried automatically because the condition
/// is a business fact, not a transient fault.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("No capacity left for role '{role}': {active} active of {planned} planned")]
    CapacityExceeded {
        role: String,
        active: i64,
        planned: i64,
    },

    #[error("Project {project_id} already has a semester report draft open")]
    DraftAlreadyOpen { project_id: DbId },

    #[error("Period '{period}' already has {count} semester reports (maximum {max})")]
    PeriodQuotaExceeded {
        period: String,
        count: i64,
        max: i64,
    },

    #[error("Project code '{0}' is already assigned to an approved project")]
    DuplicateCode(String),

    #[error("A report must keep at least one week while in edition")]
    MinimumWeek,

    #[error("At least one week with a recorded working day is required before submitting")]
    IncompleteReport,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_message_carries_counts() {
        let err = CoreError::CapacityExceeded {
            role: "ayudante".into(),
            active: 2,
            planned: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("ayudante"));
        assert!(msg.contains("2 active of 2 planned"));
    }

    #[test]
    fn quota_message_carries_period_and_count() {
        let err = CoreError::PeriodQuotaExceeded {
            period: "2026-1".into(),
            count: 2,
            max: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("2026-1"));
        assert!(msg.contains("maximum 2"));
    }

    #[test]
    fn not_found_names_the_entity() {
        let err = CoreError::NotFound {
            entity: "Participation",
            id: 7,
        };
        assert_eq!(
            err.to_string(),
            "Entity not found: Participation with id 7"
        );
    }
}
