//! Lifecycle state machines and report-level business rules.
//!
//! This module lives in `core` (zero internal deps) so it can be used by
//! both the API/repository layer and any future CLI tooling. Status IDs
//! are intentionally duplicated from the `db` crate's lookup enums because
//! `core` must not depend on it; the `db` crate pins the mapping with
//! seed-data tests.

use chrono::NaiveDate;

/// A project may accumulate at most this many semester reports per
/// academic period.
pub const MAX_REPORTS_PER_PERIOD: i64 = 2;

// ---------------------------------------------------------------------------
// Project lifecycle
// ---------------------------------------------------------------------------

/// Project status IDs matching `project_statuses` seed data (1-based).
pub mod project {
    /// Valid target status IDs reachable from `from_status`.
    ///
    /// NO_APROBADO (3) and FINALIZADO (4) are terminal.
    pub fn valid_transitions(from_status: i16) -> &'static [i16] {
        match from_status {
            // EnRevision -> Aprobado, NoAprobado
            1 => &[2, 3],
            // Aprobado -> Finalizado (explicit admin action)
            2 => &[4],
            // Terminal: NoAprobado, Finalizado
            3 | 4 => &[],
            _ => &[],
        }
    }

    pub fn can_transition(from: i16, to: i16) -> bool {
        valid_transitions(from).contains(&to)
    }
}

// ---------------------------------------------------------------------------
// Participation lifecycle
// ---------------------------------------------------------------------------

/// Participation status IDs matching `participation_statuses` seed data.
pub mod participation {
    /// RETIRADO (2) and FINALIZADO (3) are both terminal; there is no
    /// reactivation path.
    pub fn valid_transitions(from_status: i16) -> &'static [i16] {
        match from_status {
            // Activo -> Retirado, Finalizado
            1 => &[2, 3],
            2 | 3 => &[],
            _ => &[],
        }
    }

    pub fn can_transition(from: i16, to: i16) -> bool {
        valid_transitions(from).contains(&to)
    }
}

// ---------------------------------------------------------------------------
// Activity report lifecycle
// ---------------------------------------------------------------------------

/// Activity report status IDs matching `activity_report_statuses` seed data.
pub mod activity_report {
    /// RECHAZADO (4) is not terminal: the staff member may return the
    /// report for correction, which re-enters EN_EDICION with all week
    /// data intact.
    pub fn valid_transitions(from_status: i16) -> &'static [i16] {
        match from_status {
            // EnEdicion -> Enviado
            1 => &[2],
            // Enviado -> Aprobado, Rechazado
            2 => &[3, 4],
            // Aprobado: terminal
            3 => &[],
            // Rechazado -> EnEdicion ("return for correction")
            4 => &[1],
            _ => &[],
        }
    }

    pub fn can_transition(from: i16, to: i16) -> bool {
        valid_transitions(from).contains(&to)
    }
}

// ---------------------------------------------------------------------------
// Semester report lifecycle
// ---------------------------------------------------------------------------

/// Semester report status IDs matching `semester_report_statuses` seed data.
pub mod semester_report {
    /// RECHAZADO (4) exists in the lookup table but has no transition into
    /// it; it is deliberately unreachable pending product clarification.
    pub fn valid_transitions(from_status: i16) -> &'static [i16] {
        match from_status {
            // EnEdicion -> Cerrado
            1 => &[2],
            // Cerrado -> Aprobado (Jefatura only)
            2 => &[3],
            3 | 4 => &[],
            _ => &[],
        }
    }

    pub fn can_transition(from: i16, to: i16) -> bool {
        valid_transitions(from).contains(&to)
    }
}

// ---------------------------------------------------------------------------
// Report-level rules
// ---------------------------------------------------------------------------

/// An activity report may leave EN_EDICION only when at least one of its
/// weeks has at least one recorded working day.
pub fn is_report_complete(days_per_week: &[usize]) -> bool {
    days_per_week.iter().any(|&days| days > 0)
}

/// A semester report is overdue when it has not been closed and the
/// current date is past the period's report deadline.
pub fn is_overdue(close_date: Option<NaiveDate>, deadline: NaiveDate, today: NaiveDate) -> bool {
    close_date.is_none() && today > deadline
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_review_splits_into_approved_or_rejected() {
        assert!(project::can_transition(1, 2));
        assert!(project::can_transition(1, 3));
        assert!(!project::can_transition(1, 4));
    }

    #[test]
    fn approved_project_can_only_finalize() {
        assert_eq!(project::valid_transitions(2), &[4]);
        assert!(project::valid_transitions(3).is_empty());
        assert!(project::valid_transitions(4).is_empty());
    }

    #[test]
    fn participation_has_no_resurrection() {
        assert!(participation::can_transition(1, 2));
        assert!(participation::can_transition(1, 3));
        assert!(!participation::can_transition(2, 1));
        assert!(!participation::can_transition(3, 1));
    }

    #[test]
    fn rejected_activity_report_returns_to_edition_only() {
        assert_eq!(activity_report::valid_transitions(4), &[1]);
        assert!(activity_report::can_transition(2, 3));
        assert!(activity_report::can_transition(2, 4));
        assert!(!activity_report::can_transition(1, 3));
        assert!(activity_report::valid_transitions(3).is_empty());
    }

    #[test]
    fn semester_report_rejection_is_unreachable() {
        for from in 1..=4 {
            assert!(
                !semester_report::can_transition(from, 4),
                "no path into RECHAZADO from {from}"
            );
        }
    }

    #[test]
    fn semester_report_approval_requires_closed() {
        assert!(!semester_report::can_transition(1, 3));
        assert!(semester_report::can_transition(2, 3));
    }

    #[test]
    fn completeness_needs_one_worked_day_somewhere() {
        assert!(!is_report_complete(&[]));
        assert!(!is_report_complete(&[0, 0]));
        assert!(is_report_complete(&[0, 1]));
    }

    #[test]
    fn overdue_only_while_open_and_past_deadline() {
        let deadline: NaiveDate = "2026-06-30".parse().unwrap();
        let before: NaiveDate = "2026-06-15".parse().unwrap();
        let after: NaiveDate = "2026-07-01".parse().unwrap();

        assert!(!is_overdue(None, deadline, before));
        assert!(is_overdue(None, deadline, after));
        // Closed reports are never overdue, even past the deadline.
        assert!(!is_overdue(Some(before), deadline, after));
        // The deadline day itself is not yet overdue.
        assert!(!is_overdue(None, deadline, deadline));
    }
}
