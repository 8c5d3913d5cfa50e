use std::time::Duration;

use chrono::{DateTime, Local};
use cron::Schedule;

/// When the next check runs. Times are evaluated in local time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSchedule {
    schedule: Schedule,
}

impl CheckSchedule {
    pub fn new(schedule: Schedule) -> Self {
        Self { schedule }
    }

    pub fn next(&self) -> Option<DateTime<Local>> {
        self.schedule.upcoming(Local).next()
    }

    /// Time left until the next occurrence, or `None` once the schedule
    /// has no occurrences left.
    pub fn until_next(&self) -> Option<(DateTime<Local>, Duration)> {
        let next = self.next()?;
        let delay = (next - Local::now()).to_std().unwrap_or(Duration::ZERO);
        Some((next, delay))
    }
}

impl std::fmt::Display for CheckSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn make_schedule(expr: &str) -> CheckSchedule {
        CheckSchedule::new(Schedule::from_str(expr).expect("Failed to parse cron expression"))
    }

    #[test]
    fn test_every_second_is_due_within_a_second() {
        let schedule = make_schedule("* * * * * *");
        let (next, delay) = schedule.until_next().expect("Expected a next occurrence");

        assert!(delay <= Duration::from_secs(1), "{delay:?}");
        assert!(next >= Local::now() - chrono::Duration::seconds(1));
    }

    #[test]
    fn test_default_schedule_is_within_a_minute() {
        let schedule = make_schedule(crate::config::DEFAULT_SCHEDULE);
        let (_, delay) = schedule.until_next().expect("Expected a next occurrence");

        assert!(delay <= Duration::from_secs(60), "{delay:?}");
    }

    #[test]
    fn test_far_future_is_not_due() {
        // Schedule far in the future (year 2099)
        let schedule = make_schedule("0 0 0 1 1 * 2099");
        let (next, delay) = schedule.until_next().expect("Expected a next occurrence");

        assert!(delay > Duration::from_secs(60 * 60 * 24 * 365));
        assert_eq!(next.format("%Y").to_string(), "2099");
    }

    #[test]
    fn test_exhausted_schedule_has_no_next() {
        let schedule = make_schedule("0 0 0 1 1 * 2001");
        assert!(schedule.until_next().is_none());
    }

    #[test]
    fn test_partial_eq_different_schedule() {
        assert_eq!(make_schedule("0 0 * * * *"), make_schedule("0 0 * * * *"));
        assert_ne!(make_schedule("0 0 * * * *"), make_schedule("0 30 * * * *"));
    }
}
