//! Issue tracker and calendar clients for chaos-time.
//!
//! Each client implements one of the source traits below, which is all the
//! report commands depend on:
//! - [`WorklogSource`]: issues with time logged on a given day (Jira)
//! - [`CalendarSource`]: events in a time window (Google Calendar)

use chrono::{DateTime, NaiveDate, Utc};
use ct_core::{Issue, RawEvent};

mod error;
pub mod google;
pub mod jira;

pub use error::SourceError;
pub use google::GoogleCalendarClient;
pub use jira::JiraClient;

/// Lists issues that have worklog entries on a day.
pub trait WorklogSource {
    /// Returns every issue with at least one entry logged on `date` by the
    /// current user, in the tracker's order. Entries on other days may be
    /// included and are filtered out by the aggregator.
    fn issues_logged_on(&self, date: NaiveDate) -> Result<Vec<Issue>, SourceError>;
}

/// Lists calendar events overlapping a time window.
pub trait CalendarSource {
    /// Returns events between `start` and `end`, ordered by start time.
    fn events_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawEvent>, SourceError>;
}
