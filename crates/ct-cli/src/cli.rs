//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use clap::{Args, Parser, Subcommand};

use crate::config::ConfigError;

/// Daily time summary from Jira worklogs and Google Calendar.
///
/// Adds up the time you logged or spent in meetings on a given day and
/// prints it as a table.
#[derive(Debug, Parser)]
#[command(name = "chaos-time", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Time logged on Jira issues.
    Jira {
        #[command(flatten)]
        date: DateArgs,

        /// Jira account email.
        #[arg(short, long, env = "JIRA_EMAIL")]
        email: Option<String>,

        /// Jira API token.
        #[arg(short, long, env = "JIRA_API_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Show only the total and the issue keys.
        #[arg(short, long)]
        list: bool,
    },

    /// Time spent in accepted Google Calendar events.
    Calendar {
        #[command(flatten)]
        date: DateArgs,

        /// Show only the total time spent.
        #[arg(short, long)]
        list: bool,
    },
}

/// Day selection; each missing part defaults to today's.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct DateArgs {
    /// Day of the month.
    #[arg(short, long)]
    pub day: Option<u32>,

    /// Month (1-12).
    #[arg(short, long)]
    pub month: Option<u32>,

    /// Year.
    #[arg(short, long)]
    pub year: Option<i32>,
}

impl DateArgs {
    /// Fills unset parts from `today` and validates the result.
    pub fn resolve(self, today: NaiveDate) -> Result<NaiveDate, ConfigError> {
        let year = self.year.unwrap_or_else(|| today.year());
        let month = self.month.unwrap_or_else(|| today.month());
        let day = self.day.unwrap_or_else(|| today.day());

        NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(ConfigError::InvalidDate { year, month, day })
    }
}
