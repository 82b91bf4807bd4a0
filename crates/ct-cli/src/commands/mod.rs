//! CLI subcommand implementations.

pub mod calendar;
pub mod jira;
mod table;
