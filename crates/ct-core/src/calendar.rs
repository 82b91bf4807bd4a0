//! Selection of work-relevant calendar events.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::aggregate::{Aggregate, Tracked};
use crate::time::TimeSpent;
use crate::timestamp::{ParseError, parse_all_day, parse_timestamp};

/// Event visibility as reported by the calendar provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Default,
    Public,
    Private,
    Confidential,
    #[serde(other)]
    Unknown,
}

/// An invitee's answer to an event invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseStatus {
    NeedsAction,
    Declined,
    Tentative,
    Accepted,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawAttendee {
    pub email: Option<String>,
    /// Set on the attendee entry that represents the authenticated user.
    #[serde(rename = "self")]
    pub is_self: bool,
    pub response_status: Option<ResponseStatus>,
}

/// Either end of an event: a full timestamp, or a date for all-day events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawEventTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
}

impl RawEventTime {
    fn resolve(&self, field: &'static str) -> Result<DateTime<FixedOffset>, ParseError> {
        match (&self.date_time, &self.date) {
            (Some(date_time), _) => parse_timestamp(date_time),
            (None, Some(date)) => parse_all_day(date),
            (None, None) => Err(ParseError::MissingEventTime { field }),
        }
    }
}

/// An event as listed by the calendar provider, before filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawEvent {
    pub summary: Option<String>,
    pub visibility: Visibility,
    /// Absent for events the user created without inviting anyone.
    pub attendees: Option<Vec<RawAttendee>>,
    pub start: RawEventTime,
    pub end: RawEventTime,
}

impl RawEvent {
    /// The authenticated user's own response, if they are listed as an attendee.
    pub fn self_response(&self) -> Option<ResponseStatus> {
        self.attendees
            .iter()
            .flatten()
            .find(|attendee| attendee.is_self)
            .and_then(|attendee| attendee.response_status)
    }

    /// Private events and events the user has not accepted are not work time.
    pub fn is_work_event(&self) -> bool {
        self.visibility != Visibility::Private
            && self.self_response() == Some(ResponseStatus::Accepted)
    }
}

/// A retained calendar event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub summary: String,
}

impl CalendarEvent {
    pub fn duration(&self) -> TimeSpent {
        TimeSpent::from(self.end - self.start)
    }
}

impl TryFrom<RawEvent> for CalendarEvent {
    type Error = ParseError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        Ok(Self {
            start: raw.start.resolve("start")?,
            end: raw.end.resolve("end")?,
            summary: raw.summary.unwrap_or_default(),
        })
    }
}

impl Tracked for CalendarEvent {
    fn time_spent(&self) -> TimeSpent {
        self.duration()
    }
}

/// Keeps accepted, non-private events and resolves their start and end.
///
/// Order is preserved, so a chronological listing stays chronological.
pub fn select_work_events<I>(events: I) -> Result<Aggregate<CalendarEvent>, ParseError>
where
    I: IntoIterator<Item = RawEvent>,
{
    let mut kept = Vec::new();
    let mut skipped = 0_usize;

    for event in events {
        if event.is_work_event() {
            kept.push(CalendarEvent::try_from(event)?);
        } else {
            skipped += 1;
        }
    }

    tracing::debug!(kept = kept.len(), skipped, "filtered calendar events");
    Ok(Aggregate::new(kept))
}
