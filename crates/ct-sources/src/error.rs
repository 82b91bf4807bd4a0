use std::path::PathBuf;

use thiserror::Error;

/// Errors from talking to an upstream service.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A credential was empty or otherwise unusable.
    #[error("invalid credentials: {reason}")]
    InvalidCredentials { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// No usable cached OAuth token.
    #[error(
        "no usable Google token at {}: authorize chaos-time once to create it, or point google_token_path at an existing token file",
        path.display()
    )]
    MissingToken { path: PathBuf },
    /// Reading or writing the cached token failed.
    #[error("failed to access token file {}: {source}", path.display())]
    TokenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    pub(crate) fn invalid_response(err: impl std::fmt::Display) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
