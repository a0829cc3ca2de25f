//! Recurrence and due-date computation.
//!
//! Pure functions over [`Task`] snapshots: no I/O, no shared state, no
//! failure cases. The caller loads a task, applies an operation, and
//! persists the returned value; concurrent updates to the same task are the
//! store's problem, not ours. Missing optional fields (a custom task with no
//! interval, a legacy record with no schedule) degrade to "no schedule"
//! rather than an error.

use chrono::{DateTime, Duration, Utc};

use crate::domain::task::{Frequency, Task};

/// Whether the task currently needs attention.
///
/// Daily tasks compare calendar dates, so completing at 23:59 covers the
/// rest of that day. Weekly tasks compare elapsed time, so completing at
/// 23:59 covers exactly the next seven days of hours. The asymmetry is
/// intentional and load-bearing for existing clients.
pub fn is_due(task: &Task, now: DateTime<Utc>) -> bool {
    match task.frequency {
        Frequency::OneOff => !task.completed,
        Frequency::Daily => task
            .last_completed_at
            .is_none_or(|done| done.date_naive() < now.date_naive()),
        Frequency::Weekly => task
            .last_completed_at
            .is_none_or(|done| now - done >= Duration::days(7)),
        Frequency::Custom => task.next_due_at.is_some_and(|due| now.date_naive() >= due),
    }
}

/// Compute the initial `next_due_at` for a freshly created task.
///
/// Weekly tasks start without a scheduled date and anchor their cadence on
/// first completion. A custom task with no configured interval is left
/// unscheduled, not rejected, and an interval that would push the date past
/// chrono's representable range degrades the same way.
pub fn initialize_schedule(mut task: Task) -> Task {
    task.next_due_at = match task.frequency {
        Frequency::Daily => task.start_date.checked_add_signed(Duration::days(1)),
        Frequency::Custom => task.custom_interval_days.and_then(|days| {
            task.start_date
                .checked_add_signed(Duration::days(i64::from(days)))
        }),
        Frequency::OneOff | Frequency::Weekly => None,
    };
    task
}

/// Mark the task complete at `now` and advance its schedule.
///
/// Recurring schedules advance from the existing `next_due_at` when one is
/// present, falling back to today only for tasks that were never scheduled.
/// Completing late therefore does not drift the cadence toward "now". An
/// advance past chrono's representable date range leaves the task
/// unscheduled.
pub fn record_completion(mut task: Task, now: DateTime<Utc>) -> Task {
    task.last_completed_at = Some(now);

    if task.frequency == Frequency::OneOff {
        task.completed = true;
        return task;
    }

    if let Some(days) = task.frequency.advance_days(task.custom_interval_days) {
        let anchor = task.next_due_at.unwrap_or_else(|| now.date_naive());
        task.next_due_at = anchor.checked_add_signed(Duration::days(days));
    }

    task
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn instant(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn task(frequency: Frequency) -> Task {
        let created = instant(2024, 1, 1, 8, 0);
        Task {
            id: "task-1".to_string(),
            user_id: "user-1".to_string(),
            title: "water the plants".to_string(),
            description: None,
            frequency,
            custom_interval_days: None,
            start_date: date(2024, 1, 1),
            last_completed_at: None,
            next_due_at: None,
            completed: false,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn one_off_due_until_completed_then_never_again() {
        let t = task(Frequency::OneOff);
        let now = instant(2024, 1, 5, 12, 0);
        assert!(is_due(&t, now));

        let t = record_completion(t, now);
        assert!(t.completed);
        assert!(t.next_due_at.is_none());
        assert!(!is_due(&t, now));
        assert!(!is_due(&t, instant(2030, 1, 1, 0, 0)));

        // Completing again is a no-op on the flag.
        let t = record_completion(t, instant(2024, 1, 6, 12, 0));
        assert!(t.completed);
        assert!(!is_due(&t, instant(2024, 1, 7, 12, 0)));
    }

    #[test]
    fn daily_covered_for_the_rest_of_the_calendar_day() {
        let t = task(Frequency::Daily);
        let morning = instant(2024, 3, 10, 7, 0);
        assert!(is_due(&t, morning));

        let t = record_completion(t, morning);
        // Still the same date, even 16 hours later.
        assert!(!is_due(&t, instant(2024, 3, 10, 23, 59)));
        // Due again one minute past midnight.
        assert!(is_due(&t, instant(2024, 3, 11, 0, 1)));
    }

    #[test]
    fn weekly_uses_elapsed_duration_not_calendar_dates() {
        let t = task(Frequency::Weekly);
        let completed_at = instant(2024, 3, 10, 18, 0);
        let t = record_completion(t, completed_at);

        // Seven calendar days later but an hour short of 7x24h: not due.
        assert!(!is_due(&t, instant(2024, 3, 17, 17, 0)));
        // Exactly 7x24h elapsed: due.
        assert!(is_due(&t, instant(2024, 3, 17, 18, 0)));
        assert!(is_due(&t, instant(2024, 3, 18, 9, 0)));
    }

    #[test]
    fn weekly_never_completed_is_due() {
        let t = task(Frequency::Weekly);
        assert!(is_due(&t, instant(2024, 1, 1, 0, 0)));
    }

    #[test]
    fn initialize_daily_schedules_day_after_start() {
        let t = initialize_schedule(task(Frequency::Daily));
        assert_eq!(t.next_due_at, Some(date(2024, 1, 2)));
    }

    #[test]
    fn initialize_weekly_and_one_off_leave_schedule_unset() {
        assert!(initialize_schedule(task(Frequency::Weekly)).next_due_at.is_none());
        assert!(initialize_schedule(task(Frequency::OneOff)).next_due_at.is_none());
    }

    #[test]
    fn initialize_custom_uses_configured_interval() {
        let mut t = task(Frequency::Custom);
        t.custom_interval_days = Some(3);
        let t = initialize_schedule(t);
        assert_eq!(t.next_due_at, Some(date(2024, 1, 4)));
    }

    #[test]
    fn initialize_custom_without_interval_is_silent_noop() {
        let t = initialize_schedule(task(Frequency::Custom));
        assert!(t.next_due_at.is_none());
    }

    #[test]
    fn completion_advances_from_existing_schedule_not_from_now() {
        let mut t = task(Frequency::Custom);
        t.custom_interval_days = Some(5);
        t.next_due_at = Some(date(2024, 1, 10));

        // Completed a day early; cadence stays anchored to the plan.
        let t = record_completion(t, instant(2024, 1, 9, 10, 0));
        assert_eq!(t.next_due_at, Some(date(2024, 1, 15)));
        assert_eq!(t.last_completed_at, Some(instant(2024, 1, 9, 10, 0)));
    }

    #[test]
    fn completion_falls_back_to_now_for_unscheduled_tasks() {
        // A legacy daily record with no schedule yet.
        let t = task(Frequency::Daily);
        let t = record_completion(t, instant(2024, 2, 1, 9, 0));
        assert_eq!(t.next_due_at, Some(date(2024, 2, 2)));

        // First weekly completion anchors the cadence a week out.
        let t = task(Frequency::Weekly);
        let t = record_completion(t, instant(2024, 2, 1, 9, 0));
        assert_eq!(t.next_due_at, Some(date(2024, 2, 8)));
    }

    #[test]
    fn completion_late_does_not_reset_cadence() {
        let mut t = task(Frequency::Daily);
        t.next_due_at = Some(date(2024, 1, 2));

        // Completed three days late: next due advances one step from the
        // planned date, not from the completion date.
        let t = record_completion(t, instant(2024, 1, 5, 20, 0));
        assert_eq!(t.next_due_at, Some(date(2024, 1, 3)));
    }

    #[test]
    fn custom_without_interval_never_schedules() {
        let t = task(Frequency::Custom);
        let t = record_completion(t, instant(2024, 1, 9, 10, 0));
        assert!(t.next_due_at.is_none());
        assert!(t.last_completed_at.is_some());
        // Not due either, per the compare-to-schedule rule.
        assert!(!is_due(&t, instant(2024, 6, 1, 0, 0)));
    }

    #[test]
    fn extreme_interval_degrades_to_no_schedule() {
        let mut t = task(Frequency::Custom);
        t.custom_interval_days = Some(u32::MAX);

        // Both scheduling paths stay total: the unrepresentable date
        // becomes "no schedule" rather than a panic.
        let t = initialize_schedule(t);
        assert!(t.next_due_at.is_none());

        let t = record_completion(t, instant(2024, 1, 9, 10, 0));
        assert!(t.next_due_at.is_none());
        assert!(t.last_completed_at.is_some());
        assert!(!is_due(&t, instant(2030, 1, 1, 0, 0)));
    }

    #[test]
    fn custom_due_when_now_reaches_schedule() {
        let mut t = task(Frequency::Custom);
        t.custom_interval_days = Some(5);
        t.next_due_at = Some(date(2024, 1, 10));

        assert!(!is_due(&t, instant(2024, 1, 9, 23, 0)));
        assert!(is_due(&t, instant(2024, 1, 10, 0, 0)));
        assert!(is_due(&t, instant(2024, 1, 11, 0, 0)));
    }

    #[test]
    fn recurring_tasks_never_set_completed_flag() {
        for frequency in [Frequency::Daily, Frequency::Weekly, Frequency::Custom] {
            let t = record_completion(task(frequency), instant(2024, 1, 2, 12, 0));
            assert!(!t.completed, "{frequency:?} must stay active");
        }
    }

    #[test]
    fn date_round_trip_preserves_due_comparisons() {
        let mut t = task(Frequency::Custom);
        t.custom_interval_days = Some(2);
        t.next_due_at = Some(date(2024, 1, 10));

        let formatted = t.next_due_at.unwrap().to_string();
        assert_eq!(formatted, "2024-01-10");
        let reparsed: NaiveDate = formatted.parse().unwrap();
        assert_eq!(Some(reparsed), t.next_due_at);

        let mut round_tripped = t.clone();
        round_tripped.next_due_at = Some(reparsed);
        let now = instant(2024, 1, 10, 4, 0);
        assert_eq!(is_due(&t, now), is_due(&round_tripped, now));
    }
}
