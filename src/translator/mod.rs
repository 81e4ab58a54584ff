use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::error::ServiceError;

pub mod auth;
pub mod uri_api;

/// One identifier the translation service mapped a URI to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Translation {
    #[serde(rename = "URI")]
    pub uri: String,
    #[serde(default)]
    pub canonical: Option<bool>,
}

/// Resolves a URI (e.g. `info:doi:...`) to the identifiers it is known by.
pub trait Translator {
    fn translate(&self, uri: &str) -> Result<Vec<Translation>, ServiceError>;
}

pub(crate) const USER_AGENT: &str = concat!("crossref-citations/", env!("CARGO_PKG_VERSION"));

/// Both services answer with `{"data": [...]}`.
#[derive(Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: Vec<T>,
}

/// Blocking agent shared by the token and translation calls.
///
/// Non-success statuses come back as responses so their bodies can be reported.
pub fn agent() -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_connect(Some(Duration::from_secs(5)))
        .timeout_global(Some(Duration::from_secs(30)))
        .http_status_as_error(false)
        .build();
    ureq::Agent::new_with_config(config)
}

/// Translate `uri`, degrading a rejected lookup to an empty list.
///
/// Only [`ServiceError::Resolution`] is absorbed: it is reported on stderr together with the
/// citation's `timestamp` and the caller carries on with the batch. Transport and decoding
/// failures mean the service itself is unusable and are returned.
pub fn resolve_or_empty(
    translator: &dyn Translator,
    uri: &str,
    timestamp: &str,
) -> Result<Vec<Translation>, ServiceError> {
    match translator.translate(uri) {
        Ok(found) => Ok(found),
        Err(ServiceError::Resolution {
            status,
            message,
            uri,
        }) => {
            warn!(status, uri = %uri, timestamp, "translation rejected: {message}");
            eprintln!("{message}: {uri} ({timestamp})");
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}
