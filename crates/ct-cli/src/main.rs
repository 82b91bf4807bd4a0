use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ct_cli::commands::{calendar, jira};
use ct_cli::{Cli, Commands, Config, JiraCredentials};
use ct_sources::{GoogleCalendarClient, JiraClient};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so the report on stdout stays clean
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let today = Local::now().date_naive();
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Jira {
            date,
            email,
            token,
            list,
        } => {
            let date = date.resolve(today)?;
            let credentials = JiraCredentials::resolve(email, token)?;
            let server = config.jira_server()?;
            let client = JiraClient::new(server, credentials.email, credentials.api_token)
                .context("failed to create Jira client")?;
            jira::run(&mut stdout, &client, date, list)?;
        }
        Commands::Calendar { date, list } => {
            let date = date.resolve(today)?;
            let credentials = config.google_credentials()?;
            tracing::debug!(credentials = %credentials.display(), "using Google client secrets");
            let client = GoogleCalendarClient::connect(&config.google_token_path)
                .context("failed to authorize with Google Calendar")?;
            calendar::run(&mut stdout, &client, date, list)?;
        }
    }

    Ok(())
}
