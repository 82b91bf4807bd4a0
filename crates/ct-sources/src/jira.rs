//! Jira worklog search over the REST API.

use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;
use ct_core::{Issue, WorklogEntry};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::{SourceError, WorklogSource};

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const SEARCH_PATH: &str = "/rest/api/2/search";
const SEARCH_FIELDS: &str = "summary,worklog";
const PAGE_SIZE: usize = 50;

/// JQL selecting issues the current user logged work on during `date`.
pub fn worklog_jql(date: NaiveDate) -> String {
    format!(
        "worklogAuthor = currentUser() AND worklogDate = {}",
        date.format("%Y-%m-%d")
    )
}

/// Jira client authenticated with an account email and API token.
pub struct JiraClient {
    http: Client,
    base_url: String,
    email: String,
    api_token: String,
}

impl fmt::Debug for JiraClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraClient")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("api_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl JiraClient {
    /// Creates a client for the Jira instance at `server_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if any credential is blank, or if the HTTP client
    /// fails to build.
    pub fn new(
        server_url: &str,
        email: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Result<Self, SourceError> {
        let email = email.into();
        let api_token = api_token.into();

        if server_url.trim().is_empty() {
            return Err(SourceError::InvalidCredentials {
                reason: "Jira server URL cannot be empty",
            });
        }
        if email.trim().is_empty() {
            return Err(SourceError::InvalidCredentials {
                reason: "Jira email cannot be empty",
            });
        }
        if api_token.trim().is_empty() {
            return Err(SourceError::InvalidCredentials {
                reason: "Jira API token cannot be empty",
            });
        }

        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(SourceError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: server_url.trim_end_matches('/').to_string(),
            email,
            api_token,
        })
    }

    fn search_url(&self) -> String {
        format!("{}{SEARCH_PATH}", self.base_url)
    }

    fn worklog_url(&self, key: &str) -> String {
        format!("{}/rest/api/2/issue/{key}/worklog", self.base_url)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, SourceError> {
        let response = self
            .http
            .get(url)
            .basic_auth(&self.email, Some(&self.api_token))
            .query(query)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(parse_api_error(status.as_u16(), &body));
        }

        parse_body(&body)
    }

    fn search_page(&self, jql: &str, start_at: usize) -> Result<SearchPage, SourceError> {
        self.get_json(
            &self.search_url(),
            &[
                ("jql", jql.to_string()),
                ("fields", SEARCH_FIELDS.to_string()),
                ("startAt", start_at.to_string()),
                ("maxResults", PAGE_SIZE.to_string()),
            ],
        )
    }

    /// Replaces a truncated embedded worklog with the issue's full list.
    ///
    /// Search results only embed the first few worklog entries of an issue,
    /// oldest first, so the target day's entries may be missing from them.
    fn complete_worklog(&self, issue: &mut SearchIssue) -> Result<(), SourceError> {
        let Some(worklog) = issue.fields.worklog.as_mut() else {
            return Ok(());
        };
        if !worklog.is_truncated() {
            return Ok(());
        }

        tracing::debug!(
            key = %issue.key,
            embedded = worklog.worklogs.len(),
            total = worklog.total,
            "fetching full Jira worklog"
        );

        let url = self.worklog_url(&issue.key);
        let mut entries: Vec<WorklogEntry> = Vec::new();
        loop {
            let page: WorklogField = self.get_json(
                &url,
                &[
                    ("startAt", entries.len().to_string()),
                    ("maxResults", PAGE_SIZE.to_string()),
                ],
            )?;
            let fetched = page.worklogs.len();
            entries.extend(page.worklogs);

            if !has_more_pages(fetched, entries.len(), page.total) {
                break;
            }
        }

        worklog.worklogs = entries;
        Ok(())
    }
}

impl WorklogSource for JiraClient {
    fn issues_logged_on(&self, date: NaiveDate) -> Result<Vec<Issue>, SourceError> {
        let jql = worklog_jql(date);
        let mut issues = Vec::new();

        loop {
            let page = self.search_page(&jql, issues.len())?;
            let fetched = page.issues.len();
            tracing::debug!(fetched, total = page.total, "fetched Jira search page");

            for mut issue in page.issues {
                self.complete_worklog(&mut issue)?;
                issues.push(Issue::from(issue));
            }

            if !has_more_pages(fetched, issues.len(), page.total) {
                break;
            }
        }

        Ok(issues)
    }
}

/// Whether another `startAt` page should be requested.
///
/// An empty page stops the loop even if `total` claims more results.
const fn has_more_pages(fetched: usize, collected: usize, total: usize) -> bool {
    fetched > 0 && collected < total
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchPage {
    #[serde(default)]
    total: usize,
    #[serde(default)]
    issues: Vec<SearchIssue>,
}

#[derive(Debug, Deserialize)]
struct SearchIssue {
    key: String,
    fields: IssueFields,
}

#[derive(Debug, Deserialize)]
struct IssueFields {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    worklog: Option<WorklogField>,
}

/// An issue's worklog, either embedded in a search hit or returned by the
/// worklog endpoint.
#[derive(Debug, Deserialize)]
struct WorklogField {
    #[serde(default)]
    total: usize,
    #[serde(default)]
    worklogs: Vec<WorklogEntry>,
}

impl WorklogField {
    fn is_truncated(&self) -> bool {
        self.total > self.worklogs.len()
    }
}

impl From<SearchIssue> for Issue {
    fn from(issue: SearchIssue) -> Self {
        Self {
            key: issue.key,
            summary: issue.fields.summary,
            worklogs: issue
                .fields
                .worklog
                .map(|w| w.worklogs)
                .unwrap_or_default(),
        }
    }
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, SourceError> {
    serde_json::from_str(body).map_err(SourceError::invalid_response)
}

fn parse_search_page(body: &str) -> Result<SearchPage, SourceError> {
    parse_body(body)
}

fn parse_api_error(status: u16, body: &str) -> SourceError {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct ErrorPayload {
        #[serde(default)]
        error_messages: Vec<String>,
    }

    let message = serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .filter(|payload| !payload.error_messages.is_empty())
        .map_or_else(|| body.to_string(), |payload| payload.error_messages.join("; "));

    SourceError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jql_filters_by_current_user_and_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(
            worklog_jql(date),
            "worklogAuthor = currentUser() AND worklogDate = 2024-01-02"
        );
    }

    #[test]
    fn client_rejects_blank_credentials() {
        assert!(matches!(
            JiraClient::new("https://example.atlassian.net", "", "token"),
            Err(SourceError::InvalidCredentials { .. })
        ));
        assert!(matches!(
            JiraClient::new("https://example.atlassian.net", "me@example.com", "  "),
            Err(SourceError::InvalidCredentials { .. })
        ));
        assert!(matches!(
            JiraClient::new("", "me@example.com", "token"),
            Err(SourceError::InvalidCredentials { .. })
        ));
    }

    #[test]
    fn client_builds_search_url_without_double_slash() {
        let client =
            JiraClient::new("https://example.atlassian.net/", "me@example.com", "token").unwrap();
        assert_eq!(
            client.search_url(),
            "https://example.atlassian.net/rest/api/2/search"
        );
        assert_eq!(
            client.worklog_url("AB-1"),
            "https://example.atlassian.net/rest/api/2/issue/AB-1/worklog"
        );
    }

    #[test]
    fn client_debug_redacts_token() {
        let client =
            JiraClient::new("https://example.atlassian.net", "me@example.com", "secret").unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn search_page_maps_to_issues() {
        let body = r#"{
            "startAt": 0,
            "maxResults": 50,
            "total": 2,
            "issues": [
                {
                    "key": "AB-1",
                    "fields": {
                        "summary": "Fix bug",
                        "worklog": {
                            "total": 1,
                            "worklogs": [
                                {"started": "2024-01-02T09:00:00.000+0100", "timeSpentSeconds": 3600}
                            ]
                        }
                    }
                },
                {"key": "AB-2", "fields": {"summary": "Write docs"}}
            ]
        }"#;

        let page = parse_search_page(body).unwrap();
        assert_eq!(page.total, 2);

        let issues: Vec<Issue> = page.issues.into_iter().map(Issue::from).collect();
        assert_eq!(issues[0].key, "AB-1");
        assert_eq!(issues[0].worklogs.len(), 1);
        assert_eq!(issues[0].worklogs[0].time_spent.total_seconds(), 3600);
        assert_eq!(issues[1].summary, "Write docs");
        assert!(issues[1].worklogs.is_empty());
    }

    fn december_entries(count: usize) -> String {
        (1..=count)
            .map(|day| {
                format!(
                    r#"{{"started": "2023-12-{day:02}T09:00:00.000+0000", "timeSpentSeconds": 600}}"#
                )
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    #[test]
    fn truncated_embedded_worklog_is_detected() {
        let body = format!(
            r#"{{
                "total": 1,
                "issues": [{{
                    "key": "AB-9",
                    "fields": {{
                        "summary": "Long-running ticket",
                        "worklog": {{"startAt": 0, "maxResults": 20, "total": 25, "worklogs": [{}]}}
                    }}
                }}]
            }}"#,
            december_entries(20)
        );

        let page = parse_search_page(&body).unwrap();
        let worklog = page.issues[0].fields.worklog.as_ref().unwrap();
        assert_eq!(worklog.worklogs.len(), 20);
        assert!(worklog.is_truncated());
    }

    #[test]
    fn complete_embedded_worklog_is_not_refetched() {
        let body = format!(
            r#"{{"startAt": 0, "maxResults": 20, "total": 3, "worklogs": [{}]}}"#,
            december_entries(3)
        );
        let worklog: WorklogField = parse_body(&body).unwrap();
        assert!(!worklog.is_truncated());

        let without_total: WorklogField = parse_body(r#"{"worklogs": []}"#).unwrap();
        assert!(!without_total.is_truncated());
    }

    #[test]
    fn worklog_endpoint_page_parses_entries() {
        let body = r#"{
            "startAt": 20,
            "maxResults": 50,
            "total": 25,
            "worklogs": [
                {"id": "10021", "started": "2024-01-02T09:00:00.000+0000", "timeSpentSeconds": 1800},
                {"id": "10022", "started": "2024-01-02T14:00:00.000+0000", "timeSpentSeconds": 900}
            ]
        }"#;
        let page: WorklogField = parse_body(body).unwrap();
        assert_eq!(page.total, 25);
        assert_eq!(page.worklogs.len(), 2);
        assert_eq!(page.worklogs[1].time_spent.total_seconds(), 900);
    }

    #[test]
    fn paging_continues_until_total_is_collected() {
        assert!(has_more_pages(50, 50, 120));
        assert!(has_more_pages(50, 100, 120));
        assert!(!has_more_pages(20, 120, 120));
        assert!(!has_more_pages(1, 1, 1));
    }

    #[test]
    fn paging_stops_on_empty_page() {
        assert!(!has_more_pages(0, 10, 120));
        assert!(!has_more_pages(0, 0, 0));
    }

    #[test]
    fn search_page_rejects_malformed_body() {
        assert!(matches!(
            parse_search_page("<html>"),
            Err(SourceError::InvalidResponse(_))
        ));
    }

    #[test]
    fn api_error_prefers_jira_messages() {
        let err = parse_api_error(400, r#"{"errorMessages":["Bad JQL"],"errors":{}}"#);
        assert!(matches!(
            err,
            SourceError::Api { status: 400, ref message } if message == "Bad JQL"
        ));

        let err = parse_api_error(401, "Unauthorized");
        assert_eq!(err.to_string(), "API error (status 401): Unauthorized");
    }
}
