//! `chaos-time jira`: time logged on Jira issues for one day.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use ct_core::{Aggregate, WORKDAY, WorkItem, aggregate_worklogs};
use ct_sources::WorklogSource;

use super::table::Table;

/// Header, total and the comma-joined issue keys.
pub fn format_summary(date: NaiveDate, worklog: &Aggregate<WorkItem>) -> String {
    let keys = worklog
        .items()
        .iter()
        .map(|item| item.key.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut output = String::new();
    writeln!(output, "Worklog for {date}").unwrap();
    writeln!(output, "Total time: {}", worklog.total()).unwrap();
    writeln!(output, "{keys}").unwrap();
    output
}

/// Header, total, time left in the workday, and a per-issue table.
pub fn format_report(date: NaiveDate, worklog: &Aggregate<WorkItem>) -> String {
    let total = worklog.total();
    let remaining = WORKDAY - total;

    let mut table = Table::new(["Ticket", "Time tracked", "Summary"]);
    for item in worklog.items() {
        table.add_row([
            item.key.clone(),
            item.time_spent.human_readable(),
            item.summary.clone(),
        ]);
    }

    let mut output = String::new();
    writeln!(output, "Worklog for {date}").unwrap();
    writeln!(output, "Total time: {total}").unwrap();
    writeln!(output, "Time remaining: {remaining}").unwrap();
    output.push_str(&table.render());
    output
}

/// Fetches the day's worklogs from `source` and writes the report.
pub fn run<W, S>(writer: &mut W, source: &S, date: NaiveDate, list: bool) -> Result<()>
where
    W: Write,
    S: WorklogSource + ?Sized,
{
    let issues = source
        .issues_logged_on(date)
        .with_context(|| format!("failed to fetch Jira worklogs for {date}"))?;
    tracing::debug!(issues = issues.len(), %date, "fetched issues with worklogs");

    let worklog = aggregate_worklogs(date, issues);
    let output = if list {
        format_summary(date, &worklog)
    } else {
        format_report(date, &worklog)
    };

    write!(writer, "{output}")?;
    Ok(())
}
