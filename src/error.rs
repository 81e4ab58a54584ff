use std::path::PathBuf;

use thiserror::Error;

/// Malformed dates, years or file names. Always fatal for the caller.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    Date(String),

    #[error("invalid year '{0}': expected four digits")]
    Year(String),

    #[error("file name '{}' does not match <driver>_<date>.<ext>", .0.display())]
    FileName(PathBuf),
}

/// Failures talking to the authentication and translation services.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("authentication failed (status {status}): {body}")]
    Auth { status: u16, body: String },

    #[error("{message}: {uri}")]
    Resolution {
        status: u16,
        message: String,
        uri: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("failed to decode service response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("service response is missing {0}")]
    MissingField(&'static str),
}
