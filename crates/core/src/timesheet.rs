//! Worked-day triples and derived hour totals for weekly entries.
//!
//! A weekly entry records up to [`MAX_DAYS_PER_WEEK`] (date, start, end)
//! triples; any slot may be unset, meaning the day was not worked. Hours
//! and day counts are always derived from the triples, never stored.

use chrono::{NaiveDate, NaiveTime};

use crate::error::CoreError;

/// Maximum number of worked-day triples per weekly entry.
pub const MAX_DAYS_PER_WEEK: usize = 5;

/// One recorded working day inside a weekly entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkedDay {
    pub work_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl WorkedDay {
    /// Hours between start and end, fractional.
    pub fn hours(self) -> f64 {
        let minutes = (self.end_time - self.start_time).num_minutes();
        minutes as f64 / 60.0
    }
}

/// Validate one triple: the end time must be strictly after the start time.
pub fn validate_worked_day(day: &WorkedDay) -> Result<(), CoreError> {
    if day.end_time <= day.start_time {
        return Err(CoreError::Validation(format!(
            "End time {} must be after start time {} on {}",
            day.end_time, day.start_time, day.work_date
        )));
    }
    Ok(())
}

/// Validate a full set of triples for one weekly entry.
pub fn validate_week_days(days: &[WorkedDay]) -> Result<(), CoreError> {
    if days.len() > MAX_DAYS_PER_WEEK {
        return Err(CoreError::Validation(format!(
            "A week records at most {MAX_DAYS_PER_WEEK} working days, got {}",
            days.len()
        )));
    }
    for day in days {
        validate_worked_day(day)?;
    }
    Ok(())
}

/// Total hours worked across a set of triples.
pub fn hours_worked(days: &[WorkedDay]) -> f64 {
    days.iter().map(|d| d.hours()).sum()
}

/// Number of days with a recorded date. Unset slots are simply absent.
pub fn days_worked(days: &[WorkedDay]) -> usize {
    days.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(date: &str, start: &str, end: &str) -> WorkedDay {
        WorkedDay {
            work_date: date.parse().unwrap(),
            start_time: start.parse().unwrap(),
            end_time: end.parse().unwrap(),
        }
    }

    #[test]
    fn computes_hours_and_days() {
        // Morning and afternoon shift, three unset days.
        let days = [
            day("2026-03-02", "08:00:00", "12:00:00"),
            day("2026-03-03", "13:00:00", "17:00:00"),
        ];
        assert_eq!(hours_worked(&days), 8.0);
        assert_eq!(days_worked(&days), 2);
    }

    #[test]
    fn fractional_hours() {
        let days = [day("2026-03-02", "08:30:00", "10:00:00")];
        assert_eq!(hours_worked(&days), 1.5);
    }

    #[test]
    fn empty_week_is_zero() {
        assert_eq!(hours_worked(&[]), 0.0);
        assert_eq!(days_worked(&[]), 0);
    }

    #[test]
    fn rejects_end_before_start() {
        let bad = day("2026-03-02", "12:00:00", "08:00:00");
        assert!(validate_worked_day(&bad).is_err());
    }

    #[test]
    fn rejects_zero_length_day() {
        let bad = day("2026-03-02", "08:00:00", "08:00:00");
        assert!(validate_worked_day(&bad).is_err());
    }

    #[test]
    fn rejects_more_than_five_days() {
        let days: Vec<WorkedDay> = (1..=6)
            .map(|d| day(&format!("2026-03-0{d}"), "08:00:00", "09:00:00"))
            .collect();
        let err = validate_week_days(&days).unwrap_err();
        assert!(err.to_string().contains("at most 5"));
    }

    #[test]
    fn five_days_is_accepted() {
        let days: Vec<WorkedDay> = (1..=5)
            .map(|d| day(&format!("2026-03-0{d}"), "08:00:00", "09:00:00"))
            .collect();
        assert!(validate_week_days(&days).is_ok());
    }
}
