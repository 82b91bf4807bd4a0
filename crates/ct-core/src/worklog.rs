//! Per-day aggregation of issue tracker worklogs.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Deserialize;

use crate::aggregate::{Aggregate, Tracked};
use crate::time::TimeSpent;
use crate::timestamp::deserialize_timestamp;

/// A single timestamped log of time spent on an issue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorklogEntry {
    /// When the logged work started, in the offset the tracker reported.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub started: DateTime<FixedOffset>,
    /// Time logged by this entry.
    #[serde(rename = "timeSpentSeconds")]
    pub time_spent: TimeSpent,
}

impl WorklogEntry {
    /// Calendar date of the entry's start, in its own UTC offset.
    pub fn logged_on(&self) -> NaiveDate {
        self.started.date_naive()
    }
}

/// An issue returned by the tracker together with its worklog entries.
///
/// The tracker query already restricts issues to those with at least one
/// entry on the requested day, but the entries themselves cover any date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub key: String,
    pub summary: String,
    pub worklogs: Vec<WorklogEntry>,
}

/// Time logged against one issue on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub key: String,
    pub summary: String,
    pub time_spent: TimeSpent,
}

impl Tracked for WorkItem {
    fn time_spent(&self) -> TimeSpent {
        self.time_spent
    }
}

/// Sums each issue's entries logged on `date`.
///
/// Entries from other days are ignored; issues with nothing logged on `date`
/// are dropped. Issue order is preserved.
pub fn aggregate_worklogs<I>(date: NaiveDate, issues: I) -> Aggregate<WorkItem>
where
    I: IntoIterator<Item = Issue>,
{
    issues
        .into_iter()
        .filter_map(|issue| {
            let time_spent: TimeSpent = issue
                .worklogs
                .iter()
                .filter(|entry| entry.logged_on() == date)
                .map(|entry| entry.time_spent)
                .sum();

            if time_spent > TimeSpent::ZERO {
                Some(WorkItem {
                    key: issue.key,
                    summary: issue.summary,
                    time_spent,
                })
            } else {
                tracing::debug!(
                    issue = %issue.key,
                    %date,
                    "no time logged on date, dropping issue"
                );
                None
            }
        })
        .collect()
}
