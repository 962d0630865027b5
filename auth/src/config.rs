//! Authentication configuration.
//!
//! Values are provided by the application, either through the builders or
//! from `SESSION_GATE_*` environment variables.

use crate::error::ConfigError;
use reqwest::Url;
use std::time::Duration;

/// Environment variable holding the post-success landing URL.
pub const LANDING_URL_VAR: &str = "SESSION_GATE_LANDING_URL";
/// Environment variable holding the in-app home route.
pub const HOME_ROUTE_VAR: &str = "SESSION_GATE_HOME_ROUTE";
/// Environment variable holding the attempt timeout in seconds (`0` disables it).
pub const ATTEMPT_TIMEOUT_VAR: &str = "SESSION_GATE_ATTEMPT_TIMEOUT_SECS";
/// Environment variable holding the Identity Toolkit API key.
pub const API_KEY_VAR: &str = "SESSION_GATE_API_KEY";
/// Environment variable overriding the Identity Toolkit endpoint.
pub const IDENTITY_ENDPOINT_VAR: &str = "SESSION_GATE_IDENTITY_ENDPOINT";
/// Environment variable overriding the federated sign-in request URI.
pub const REQUEST_URI_VAR: &str = "SESSION_GATE_REQUEST_URI";

/// Auth view configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Full-page redirect destination after a successful sign-in or sign-up.
    pub landing_url: String,

    /// In-app route an already signed-in user is sent to.
    ///
    /// Default: `/home`
    pub home_route: String,

    /// Upper bound on a single gateway call. `None` waits forever.
    ///
    /// Default: 30 seconds
    pub attempt_timeout: Option<Duration>,

    /// Provider id used for federated sign-in.
    ///
    /// Default: `google.com`
    pub federated_provider_id: String,
}

impl AuthConfig {
    /// Create a configuration that lands on `landing_url` after success.
    #[must_use]
    pub fn new(landing_url: impl Into<String>) -> Self {
        Self {
            landing_url: landing_url.into(),
            ..Self::default()
        }
    }

    /// Set the in-app home route.
    #[must_use]
    pub fn with_home_route(mut self, route: impl Into<String>) -> Self {
        self.home_route = route.into();
        self
    }

    /// Set or disable the attempt timeout.
    #[must_use]
    pub const fn with_attempt_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Set the federated provider id.
    #[must_use]
    pub fn with_federated_provider(mut self, provider_id: impl Into<String>) -> Self {
        self.federated_provider_id = provider_id.into();
        self
    }

    /// Load from `SESSION_GATE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the landing URL is missing or invalid, or
    /// if the timeout is not a whole number of seconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`AuthConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let landing_url = lookup(LANDING_URL_VAR).ok_or(ConfigError::MissingVar(LANDING_URL_VAR))?;
        validate_url(LANDING_URL_VAR, &landing_url)?;

        let mut config = Self::new(landing_url);

        if let Some(route) = lookup(HOME_ROUTE_VAR) {
            if !route.starts_with('/') {
                return Err(ConfigError::InvalidValue {
                    var: HOME_ROUTE_VAR,
                    reason: "route must start with '/'".to_string(),
                });
            }
            config.home_route = route;
        }

        if let Some(secs) = lookup(ATTEMPT_TIMEOUT_VAR) {
            let secs: u64 = secs.trim().parse().map_err(|e| ConfigError::InvalidValue {
                var: ATTEMPT_TIMEOUT_VAR,
                reason: format!("{e}"),
            })?;
            config.attempt_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(config)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            landing_url: "http://localhost:3000/".to_string(),
            home_route: "/home".to_string(),
            attempt_timeout: Some(Duration::from_secs(30)),
            federated_provider_id: "google.com".to_string(),
        }
    }
}

/// Identity Toolkit REST adapter configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentityToolkitConfig {
    /// Web API key of the identity project.
    pub api_key: String,

    /// Base URL of the service.
    ///
    /// Default: `https://identitytoolkit.googleapis.com`
    pub endpoint: String,

    /// URI the federated credential is bound to.
    ///
    /// Default: `http://localhost`
    pub request_uri: String,
}

impl IdentityToolkitConfig {
    /// Create configuration for the public endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: "https://identitytoolkit.googleapis.com".to_string(),
            request_uri: "http://localhost".to_string(),
        }
    }

    /// Point at a different endpoint (emulator, test server).
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the federated request URI.
    #[must_use]
    pub fn with_request_uri(mut self, uri: impl Into<String>) -> Self {
        self.request_uri = uri.into();
        self
    }

    /// Load from `SESSION_GATE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the API key is missing or a URL is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`IdentityToolkitConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingVar(API_KEY_VAR))?;

        let mut config = Self::new(api_key);

        if let Some(endpoint) = lookup(IDENTITY_ENDPOINT_VAR) {
            validate_url(IDENTITY_ENDPOINT_VAR, &endpoint)?;
            config.endpoint = endpoint;
        }

        if let Some(uri) = lookup(REQUEST_URI_VAR) {
            validate_url(REQUEST_URI_VAR, &uri)?;
            config.request_uri = uri;
        }

        Ok(config)
    }
}

// Keeps the API key out of logs.
impl std::fmt::Debug for IdentityToolkitConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityToolkitConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("request_uri", &self.request_uri)
            .finish()
    }
}

fn validate_url(var: &'static str, value: &str) -> Result<(), ConfigError> {
    Url::parse(value)
        .map(drop)
        .map_err(|e| ConfigError::InvalidValue {
            var,
            reason: e.to_string(),
        })
}
