//! Configuration loading and credential resolution.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Missing or invalid settings, detected before any network call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Jira email is not specified. Please use --email or JIRA_EMAIL env variable")]
    MissingJiraEmail,

    #[error("Jira API token is not specified. Please use --token or JIRA_API_TOKEN env variable")]
    MissingJiraToken,

    #[error(
        "Jira server URL is not specified. Please set JIRA_SERVER_URL or jira_server_url in config.toml"
    )]
    MissingJiraServer,

    #[error(
        "GOOGLE_API_CREDENTIALS environment variable is not set. Please point it at your OAuth client secrets file"
    )]
    MissingGoogleCredentials,

    #[error("{year:04}-{month:02}-{day:02} is not a valid date")]
    InvalidDate { year: i32, month: u32, day: u32 },
}

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the Jira instance.
    pub jira_server_url: Option<String>,
    /// OAuth client secrets file for Google Calendar.
    pub google_api_credentials: Option<PathBuf>,
    /// Cached Google OAuth token.
    pub google_token_path: PathBuf,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("jira_server_url", &self.jira_server_url)
            .field("google_api_credentials", &self.google_api_credentials)
            .field("google_token_path", &self.google_token_path)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            jira_server_url: None,
            google_api_credentials: None,
            google_token_path: home.join("google-calendar-token.json"),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources win: defaults, the user config file, `config_path`,
    /// then environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        file_figment(config_path)
            .merge(Env::raw().only(&["jira_server_url", "google_api_credentials"]))
            .merge(Env::prefixed("CHAOS_TIME_"))
            .extract()
    }

    /// The Jira base URL, if configured.
    pub fn jira_server(&self) -> Result<&str, ConfigError> {
        self.jira_server_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingJiraServer)
    }

    /// The Google OAuth client secrets path, if configured.
    pub fn google_credentials(&self) -> Result<&Path, ConfigError> {
        self.google_api_credentials
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or(ConfigError::MissingGoogleCredentials)
    }
}

/// Defaults layered with config files only.
fn file_figment(config_path: Option<&Path>) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    // Load from default config location
    if let Some(config_dir) = dirs_config_path() {
        figment = figment.merge(Toml::file(config_dir.join("config.toml")));
    }

    // Load from specified config file
    if let Some(path) = config_path {
        figment = figment.merge(Toml::file(path));
    }

    figment
}

/// Returns the platform-specific config directory for chaos-time.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("chaos-time"))
}

/// Jira login taken from flags, which fall back to the environment.
#[derive(Clone, PartialEq, Eq)]
pub struct JiraCredentials {
    pub email: String,
    pub api_token: String,
}

impl fmt::Debug for JiraCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraCredentials")
            .field("email", &self.email)
            .field("api_token", &"[REDACTED]")
            .finish()
    }
}

impl JiraCredentials {
    /// Blank values count as missing. The email is checked first.
    pub fn resolve(email: Option<String>, api_token: Option<String>) -> Result<Self, ConfigError> {
        let email = email
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingJiraEmail)?;
        let api_token = api_token
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingJiraToken)?;
        Ok(Self { email, api_token })
    }
}
