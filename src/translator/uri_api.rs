use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::{
    config::Config,
    error::ServiceError,
    translator::{Envelope, Translation, Translator, USER_AGENT, auth::Session},
};

/// HTTP client for the identifier translation API.
pub struct UriApi<'s> {
    agent: ureq::Agent,
    endpoint: Url,
    scheme: String,
    strict: bool,
    session: &'s Session,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    parameters: Option<ErrorParameters>,
}

#[derive(Deserialize)]
struct ErrorParameters {
    uri: Option<String>,
}

impl<'s> UriApi<'s> {
    pub fn new(agent: ureq::Agent, config: &Config, session: &'s Session) -> Self {
        UriApi {
            agent,
            endpoint: config.uri_endpoint.clone(),
            scheme: config.uri_scheme.clone(),
            strict: config.uri_strict,
            session,
        }
    }
}

impl Translator for UriApi<'_> {
    fn translate(&self, uri: &str) -> Result<Vec<Translation>, ServiceError> {
        let mut request = self
            .agent
            .get(self.endpoint.as_str())
            .query("uri", uri)
            .query("filter", format!("uri_scheme:{}", self.scheme))
            .query("strict", if self.strict { "true" } else { "false" })
            .header("User-Agent", USER_AGENT);
        if let Some(auth) = self.session.authorization() {
            request = request.header("Authorization", auth);
        }

        let mut response = request.call()?;
        let status = response.status();
        let body = response.body_mut().read_to_string()?;
        debug!(uri, status = status.as_u16(), "translation response");

        if !status.is_success() {
            // Error bodies normally echo the request; fall back to the status line otherwise.
            let (message, echoed) = match serde_json::from_str::<ErrorBody>(&body) {
                Ok(e) => (e.message, e.parameters.and_then(|p| p.uri)),
                Err(_) => (
                    status.canonical_reason().unwrap_or("request failed").to_string(),
                    None,
                ),
            };
            return Err(ServiceError::Resolution {
                status: status.as_u16(),
                message,
                uri: echoed.unwrap_or_else(|| uri.to_string()),
            });
        }

        let envelope: Envelope<Translation> = serde_json::from_str(&body)?;
        Ok(envelope.data)
    }
}
