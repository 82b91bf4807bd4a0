//! `chaos-time calendar`: time spent in accepted meetings for one day.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use ct_core::{Aggregate, CalendarEvent, select_work_events};
use ct_sources::CalendarSource;

use super::table::Table;

/// Converts a local wall-clock time to UTC.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant; times in a
/// spring-forward gap are shifted an hour later.
fn local_to_utc(local: NaiveDateTime) -> DateTime<Utc> {
    Local
        .from_local_datetime(&local)
        .earliest()
        .or_else(|| {
            Local
                .from_local_datetime(&(local + TimeDelta::hours(1)))
                .earliest()
        })
        .map_or_else(|| local.and_utc(), |dt| dt.with_timezone(&Utc))
}

/// The local day `00:00:00` to `23:59:59`, as UTC instants.
pub fn day_window(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let last_second = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    (
        local_to_utc(date.and_time(NaiveTime::MIN)),
        local_to_utc(date.and_time(last_second)),
    )
}

/// Header and total time spent; the table is omitted when `list` is set.
pub fn format_report(date: NaiveDate, events: &Aggregate<CalendarEvent>, list: bool) -> String {
    let mut output = String::new();
    writeln!(output, "Communication for {}", date.format("%Y-%m-%d")).unwrap();
    writeln!(output, "Total time spent: {}", events.total()).unwrap();
    if list {
        return output;
    }

    let mut table = Table::new(["Duration", "Start", "End", "Summary"]);
    for event in events.items() {
        table.add_row([
            event.duration().human_readable(),
            event.start.format("%H:%M").to_string(),
            event.end.format("%H:%M").to_string(),
            event.summary.clone(),
        ]);
    }
    output.push_str(&table.render());
    output
}

/// Fetches the day's events from `source` and writes the report.
pub fn run<W, S>(writer: &mut W, source: &S, date: NaiveDate, list: bool) -> Result<()>
where
    W: Write,
    S: CalendarSource + ?Sized,
{
    let (start, end) = day_window(date);
    let raw = source
        .events_between(start, end)
        .with_context(|| format!("failed to fetch calendar events for {date}"))?;
    tracing::debug!(events = raw.len(), %start, %end, "fetched calendar events");

    let events = select_work_events(raw).context("calendar returned a malformed event")?;
    write!(writer, "{}", format_report(date, &events, list))?;
    Ok(())
}
