//! Runtime configuration for the authentication and translation services.

use anyhow::{Context, Result, anyhow};
use url::Url;

pub const AUTH_API_ENDP: &str = "AUTH_API_ENDP";
pub const JWT_DISABLED: &str = "JWT_DISABLED";
pub const URI_API_ENDP: &str = "URI_API_ENDP";
pub const URI_API_USER: &str = "URI_API_USER";
pub const URI_API_PASS: &str = "URI_API_PASS";
pub const URI_SCHEME: &str = "URI_SCHEME";
pub const URI_STRICT: &str = "URI_STRICT";

/// Built once at startup and passed by reference to whatever talks to the services.
#[derive(Debug, Clone)]
pub struct Config {
    /// Token endpoint; only needed while JWT is enabled
    pub auth_endpoint: Option<Url>,
    pub jwt_disabled: bool,
    /// Identifier translation endpoint
    pub uri_endpoint: Url,
    pub uri_user: Option<String>,
    pub uri_pass: Option<String>,
    /// Scheme translations are filtered to, e.g. `urn:uuid`
    pub uri_scheme: String,
    pub uri_strict: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_disabled = parse_bool(&lookup, JWT_DISABLED)?.unwrap_or(false);

        let config = Config {
            auth_endpoint: lookup(AUTH_API_ENDP)
                .map(|v| parse_url(AUTH_API_ENDP, &v))
                .transpose()?,
            jwt_disabled,
            uri_endpoint: parse_url(URI_API_ENDP, &required(&lookup, URI_API_ENDP)?)?,
            uri_user: lookup(URI_API_USER),
            uri_pass: lookup(URI_API_PASS),
            uri_scheme: required(&lookup, URI_SCHEME)?,
            uri_strict: parse_bool(&lookup, URI_STRICT)?.unwrap_or(false),
        };
        config.validate()?;
        Ok(config)
    }

    /// Credentials are mandatory unless JWT is disabled.
    pub fn validate(&self) -> Result<()> {
        if self.jwt_disabled {
            return Ok(());
        }
        for (name, present) in [
            (AUTH_API_ENDP, self.auth_endpoint.is_some()),
            (URI_API_USER, self.uri_user.is_some()),
            (URI_API_PASS, self.uri_pass.is_some()),
        ] {
            if !present {
                return Err(anyhow!(
                    "environment variable {name} must be set unless {JWT_DISABLED}=true"
                ));
            }
        }
        Ok(())
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String> {
    lookup(name).ok_or_else(|| anyhow!("missing environment variable {name}"))
}

fn parse_url(name: &str, value: &str) -> Result<Url> {
    Url::parse(value)
        .with_context(|| format!("failed to parse environment variable {name} = '{value}'"))
}

fn parse_bool(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<bool>> {
    let Some(value) = lookup(name) else {
        return Ok(None);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(Some(true)),
        "false" | "0" | "" => Ok(Some(false)),
        _ => Err(anyhow!(
            "failed to parse environment variable {name} = '{value}': expected true or false"
        )),
    }
}
