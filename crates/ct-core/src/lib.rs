//! Core domain logic for chaos-time.
//!
//! This crate contains:
//! - `TimeSpent`: whole-second durations and their report rendering
//! - Worklog aggregation: per-issue time logged on a given day
//! - Calendar selection: accepted, non-private events and their durations

mod aggregate;
pub mod calendar;
mod time;
mod timestamp;
pub mod worklog;

pub use aggregate::{Aggregate, Tracked};
pub use calendar::{CalendarEvent, RawEvent, select_work_events};
pub use time::TimeSpent;
pub use timestamp::{ParseError, parse_timestamp};
pub use worklog::{Issue, WorkItem, WorklogEntry, aggregate_worklogs};

/// Nominal length of a working day.
pub const WORKDAY: TimeSpent = TimeSpent::from_hours(8);
