use serde::Deserialize;
use tracing::info;
use url::Url;

use crate::{
    config::Config,
    error::ServiceError,
    translator::{Envelope, USER_AGENT},
};

#[derive(Deserialize)]
struct TokenRecord {
    token: String,
}

/// Exchange credentials for a JWT at the tokens endpoint.
pub fn fetch_token(
    agent: &ureq::Agent,
    endpoint: &Url,
    email: &str,
    password: &str,
) -> Result<String, ServiceError> {
    let payload = serde_json::json!({ "email": email, "password": password }).to_string();

    let mut response = agent
        .post(endpoint.as_str())
        .header("Content-Type", "application/json")
        .header("User-Agent", USER_AGENT)
        .send(payload)?;

    let status = response.status();
    let body = response.body_mut().read_to_string()?;
    if !status.is_success() {
        return Err(ServiceError::Auth {
            status: status.as_u16(),
            body,
        });
    }

    let envelope: Envelope<TokenRecord> = serde_json::from_str(&body)?;
    envelope
        .data
        .into_iter()
        .next()
        .map(|record| record.token)
        .ok_or(ServiceError::MissingField("data[0].token"))
}

/// Authorization state for calls to the translation service.
///
/// Fetched once per run and passed by reference to each request.
#[derive(Debug, Clone, Default)]
pub struct Session {
    authorization: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Session::default()
    }

    pub fn bearer(token: &str) -> Self {
        Session {
            authorization: Some(format!("Bearer {token}")),
        }
    }

    /// Log in with the configured credentials, or stay anonymous when JWT is disabled.
    pub fn establish(agent: &ureq::Agent, config: &Config) -> anyhow::Result<Self> {
        if config.jwt_disabled {
            info!("JWT disabled; translation requests are unauthenticated");
            return Ok(Session::anonymous());
        }

        config.validate()?;
        let (Some(endpoint), Some(user), Some(pass)) = (
            config.auth_endpoint.as_ref(),
            config.uri_user.as_deref(),
            config.uri_pass.as_deref(),
        ) else {
            anyhow::bail!("translation API credentials are not configured");
        };

        let token = fetch_token(agent, endpoint, user, pass)?;
        info!(endpoint = %endpoint, "obtained translation API token");
        Ok(Session::bearer(&token))
    }

    /// Value for the `Authorization` header, if any.
    pub fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }
}
