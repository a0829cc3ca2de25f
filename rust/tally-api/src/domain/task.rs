//! Task records and frequency definitions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// How often a task recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    /// Done once, then finished forever.
    #[default]
    OneOff,
    /// Due again each new calendar day.
    Daily,
    /// Due again once a full week has elapsed since completion.
    Weekly,
    /// Due on a fixed day interval configured per task.
    Custom,
}

impl Frequency {
    /// Days to add when advancing a schedule, per frequency.
    ///
    /// `None` means the frequency never schedules a next-due date: one-off
    /// tasks by definition, and custom tasks whose interval was never
    /// configured.
    pub fn advance_days(self, custom_interval_days: Option<u32>) -> Option<i64> {
        match self {
            Self::OneOff => None,
            Self::Daily => Some(1),
            Self::Weekly => Some(7),
            Self::Custom => custom_interval_days.map(i64::from),
        }
    }
}

/// A tracked task owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Short title.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Recurrence frequency.
    pub frequency: Frequency,
    /// Day interval for [`Frequency::Custom`]; ignored otherwise.
    pub custom_interval_days: Option<u32>,
    /// Anchor date for recurrence. Callers default this to today (UTC)
    /// when the client supplies none.
    pub start_date: NaiveDate,
    /// When the task was last marked complete.
    pub last_completed_at: Option<DateTime<Utc>>,
    /// Next date the task becomes due. Absent for one-off tasks, for weekly
    /// tasks that were never completed, and for custom tasks without a
    /// configured interval.
    pub next_due_at: Option<NaiveDate>,
    /// Meaningful only for one-off tasks; recurring tasks never set it.
    pub completed: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&Frequency::OneOff).unwrap(),
            "\"one-off\""
        );
        assert_eq!(
            serde_json::from_str::<Frequency>("\"daily\"").unwrap(),
            Frequency::Daily
        );
        assert!(serde_json::from_str::<Frequency>("\"fortnightly\"").is_err());
    }

    #[test]
    fn advance_table_covers_all_frequencies() {
        assert_eq!(Frequency::OneOff.advance_days(None), None);
        assert_eq!(Frequency::Daily.advance_days(None), Some(1));
        assert_eq!(Frequency::Weekly.advance_days(None), Some(7));
        assert_eq!(Frequency::Custom.advance_days(Some(5)), Some(5));
        assert_eq!(Frequency::Custom.advance_days(None), None);
    }
}
