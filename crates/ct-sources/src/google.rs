//! Google Calendar event listing with a cached OAuth token.
//!
//! The token file is the "authorized user" JSON written by Google's client
//! libraries. An expired access token is refreshed once with the stored
//! refresh token and written back; obtaining the first token interactively
//! is not handled here.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use ct_core::RawEvent;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::{CalendarSource, SourceError};

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const EVENTS_URL: &str = "https://www.googleapis.com/calendar/v3/calendars/primary/events";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens this close to expiry are refreshed before use.
const EXPIRY_MARGIN_SECS: i64 = 60;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Cached OAuth credentials for a single user.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthorizedUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
    /// Fields we do not interpret (scopes, account, ...) survive a rewrite.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl fmt::Debug for AuthorizedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizedUser")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("token_uri", &self.token_uri)
            .field("client_id", &self.client_id)
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}

impl AuthorizedUser {
    /// Reads the token file at `path`.
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let raw = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                SourceError::MissingToken {
                    path: path.to_path_buf(),
                }
            } else {
                SourceError::TokenFile {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        serde_json::from_str(&raw).map_err(SourceError::invalid_response)
    }

    /// Writes the token file back to `path`.
    pub fn save(&self, path: &Path) -> Result<(), SourceError> {
        let json = serde_json::to_string_pretty(self).map_err(SourceError::invalid_response)?;
        std::fs::write(path, json).map_err(|source| SourceError::TokenFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Whether the access token can be used at `now`.
    ///
    /// A token without an expiry is treated as valid.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        let margin = TimeDelta::seconds(EXPIRY_MARGIN_SECS);
        self.token.is_some() && self.expiry.is_none_or(|expiry| expiry - margin > now)
    }

    fn can_refresh(&self) -> bool {
        self.refresh_token.is_some() && self.client_id.is_some() && self.client_secret.is_some()
    }

    /// Exchanges the refresh token for a new access token.
    fn refresh(&mut self, http: &Client, now: DateTime<Utc>) -> Result<(), SourceError> {
        let (Some(refresh_token), Some(client_id), Some(client_secret)) = (
            self.refresh_token.as_deref(),
            self.client_id.as_deref(),
            self.client_secret.as_deref(),
        ) else {
            return Err(SourceError::InvalidCredentials {
                reason: "cached Google token cannot be refreshed",
            });
        };

        let response = http
            .post(&self.token_uri)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", client_id),
                ("client_secret", client_secret),
            ])
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(SourceError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let refreshed = parse_token_response(&body)?;
        self.token = Some(refreshed.access_token);
        self.expiry = refreshed
            .expires_in
            .map(|seconds| now + TimeDelta::seconds(seconds));
        if let Some(rotated) = refreshed.refresh_token {
            self.refresh_token = Some(rotated);
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

fn parse_token_response(body: &str) -> Result<TokenResponse, SourceError> {
    serde_json::from_str(body).map_err(SourceError::invalid_response)
}

/// Google Calendar client for the user's primary calendar.
pub struct GoogleCalendarClient {
    http: Client,
    access_token: String,
}

impl fmt::Debug for GoogleCalendarClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleCalendarClient")
            .field("access_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl GoogleCalendarClient {
    /// Creates a client from the cached token at `token_path`, refreshing
    /// and rewriting it if it has expired.
    pub fn connect(token_path: &Path) -> Result<Self, SourceError> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(SourceError::ClientBuild)?;

        let mut user = AuthorizedUser::load(token_path)?;
        let now = Utc::now();
        if !user.is_valid_at(now) {
            if !user.can_refresh() {
                return Err(SourceError::MissingToken {
                    path: token_path.to_path_buf(),
                });
            }
            tracing::info!(path = %token_path.display(), "refreshing expired Google token");
            user.refresh(&http, now)?;
            user.save(token_path)?;
        }

        let access_token = user.token.ok_or_else(|| SourceError::MissingToken {
            path: token_path.to_path_buf(),
        })?;

        Ok(Self { http, access_token })
    }

    fn events_page(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        page_token: Option<&str>,
    ) -> Result<EventsPage, SourceError> {
        let mut query = window_query(start, end);
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        let response = self
            .http
            .get(EVENTS_URL)
            .bearer_auth(&self.access_token)
            .query(&query)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(parse_api_error(status.as_u16(), &body));
        }

        parse_events_page(&body)
    }
}

impl CalendarSource for GoogleCalendarClient {
    fn events_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawEvent>, SourceError> {
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.events_page(start, end, page_token.as_deref())?;
            tracing::debug!(fetched = page.items.len(), "fetched calendar page");
            events.extend(page.items);

            page_token = next_cursor(page.next_page_token);
            if page_token.is_none() {
                break;
            }
        }

        Ok(events)
    }
}

/// The token for the next page, if any. A blank token ends paging.
fn next_cursor(next_page_token: Option<String>) -> Option<String> {
    next_page_token.filter(|token| !token.trim().is_empty())
}

/// Query parameters listing single events in `[start, end]` by start time.
fn window_query(start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<(&'static str, String)> {
    vec![
        ("timeMin", start.to_rfc3339_opts(SecondsFormat::Secs, true)),
        ("timeMax", end.to_rfc3339_opts(SecondsFormat::Secs, true)),
        ("singleEvents", "true".to_string()),
        ("orderBy", "startTime".to_string()),
    ]
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventsPage {
    #[serde(default)]
    items: Vec<RawEvent>,
    #[serde(default)]
    next_page_token: Option<String>,
}

fn parse_events_page(body: &str) -> Result<EventsPage, SourceError> {
    serde_json::from_str(body).map_err(SourceError::invalid_response)
}

fn parse_api_error(status: u16, body: &str) -> SourceError {
    #[derive(Deserialize)]
    struct ErrorPayload {
        error: ErrorDetails,
    }

    #[derive(Deserialize)]
    struct ErrorDetails {
        message: String,
    }

    let message = serde_json::from_str::<ErrorPayload>(body)
        .map_or_else(|_| body.to_string(), |payload| payload.error.message);
    SourceError::Api { status, message }
}
