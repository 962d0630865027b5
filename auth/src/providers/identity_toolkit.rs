//! Identity Toolkit REST gateway.
//!
//! Talks to the hosted identity service's `accounts:*` endpoints with
//! `reqwest`. Tokens in the responses are discarded; this client keeps no
//! credentials.

use super::current_user::CurrentUserChannel;
use super::gateway::IdentityGateway;
use crate::config::IdentityToolkitConfig;
use crate::error::{AuthError, Result};
use crate::state::{Identity, UserId};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// Credential produced by an interactive federated sign-in.
#[derive(Clone, PartialEq, Eq)]
pub struct FederatedCredential {
    /// OpenID Connect ID token issued by the federated provider.
    pub id_token: String,
}

impl std::fmt::Debug for FederatedCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FederatedCredential")
            .field("id_token", &"<redacted>")
            .finish()
    }
}

/// The interactive half of federated sign-in (popup, redirect, device flow).
///
/// # Errors
///
/// Implementations return [`AuthError::ProviderRejected`] when the user
/// closes or cancels the flow.
pub trait FederatedFlow: Send + Sync {
    /// Run the flow for `provider_id` and hand back the resulting credential.
    fn obtain_credential(
        &self,
        provider_id: &str,
    ) -> impl std::future::Future<Output = Result<FederatedCredential>> + Send;
}

/// [`IdentityGateway`] backed by the Identity Toolkit REST API.
///
/// Successful calls publish the identity on the [`CurrentUserChannel`]
/// passed at construction, which is what drives the session.
///
/// # Example
///
/// ```no_run
/// use session_gate_auth::config::IdentityToolkitConfig;
/// use session_gate_auth::providers::{
///     CurrentUserChannel, FederatedCredential, FederatedFlow, IdentityToolkitGateway,
/// };
///
/// struct NoPopup;
///
/// impl FederatedFlow for NoPopup {
///     async fn obtain_credential(
///         &self,
///         _provider_id: &str,
///     ) -> session_gate_auth::Result<FederatedCredential> {
///         Err(session_gate_auth::AuthError::ProviderRejected {
///             reason: "popup unavailable".to_string(),
///         })
///     }
/// }
///
/// let gateway = IdentityToolkitGateway::new(
///     IdentityToolkitConfig::new("web-api-key"),
///     NoPopup,
///     CurrentUserChannel::new(),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct IdentityToolkitGateway<F> {
    config: IdentityToolkitConfig,

    /// HTTP client for making requests.
    http_client: Client,

    federated: F,

    /// Provider id sent with federated credentials.
    ///
    /// Default: `google.com`
    provider_id: String,

    current_user: CurrentUserChannel,
}

impl<F: FederatedFlow> IdentityToolkitGateway<F> {
    /// Create a gateway with a default HTTP client.
    #[must_use]
    pub fn new(
        config: IdentityToolkitConfig,
        federated: F,
        current_user: CurrentUserChannel,
    ) -> Self {
        Self {
            config,
            http_client: Client::new(),
            federated,
            provider_id: "google.com".to_string(),
            current_user,
        }
    }

    /// Use a preconfigured HTTP client (timeouts, proxies).
    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    /// Set the federated provider id.
    #[must_use]
    pub fn with_provider_id(mut self, provider_id: impl Into<String>) -> Self {
        self.provider_id = provider_id.into();
        self
    }

    /// The channel this gateway publishes to.
    #[must_use]
    pub const fn current_user(&self) -> &CurrentUserChannel {
        &self.current_user
    }

    fn url(&self, method: &str) -> Result<String> {
        let key = [("key", self.config.api_key.as_str())];
        let query = serde_urlencoded::to_string(key).map_err(|e| {
            tracing::error!(error = %e, "Failed to encode API key");
            AuthError::ProviderRejected {
                reason: "invalid API key".to_string(),
            }
        })?;

        Ok(format!(
            "{}/v1/accounts:{method}?{query}",
            self.config.endpoint.trim_end_matches('/')
        ))
    }

    /// POST one `accounts:*` call and publish the identity it returns.
    async fn call<B: Serialize + Sync>(&self, method: &str, body: &B) -> Result<Identity> {
        let url = self.url(method)?;

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(method, error = %e, "Identity Toolkit request failed");
                AuthError::NetworkUnavailable
            })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            tracing::warn!(method, error = %e, "Failed to read Identity Toolkit response");
            AuthError::NetworkUnavailable
        })?;

        if !status.is_success() {
            let error = error_from_body(status, &bytes);
            tracing::debug!(method, %status, error = %error, "Identity Toolkit rejected request");
            return Err(error);
        }

        let account: AccountResponse = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!(method, error = %e, "Malformed Identity Toolkit response");
            AuthError::ProviderRejected {
                reason: format!("malformed response: {e}"),
            }
        })?;

        let identity = Identity {
            uid: UserId(account.local_id),
            email: account.email,
        };

        self.current_user.publish(Some(identity.clone()));
        Ok(identity)
    }
}

impl<F: FederatedFlow> IdentityGateway for IdentityToolkitGateway<F> {
    async fn sign_in_with_credentials(&self, email: &str, password: &str) -> Result<Identity> {
        self.call(
            "signInWithPassword",
            &PasswordRequest {
                email,
                password,
                return_secure_token: true,
            },
        )
        .await
    }

    async fn sign_in_with_federated_provider(&self) -> Result<Identity> {
        let credential = self.federated.obtain_credential(&self.provider_id).await?;

        let post_body = serde_urlencoded::to_string([
            ("id_token", credential.id_token.as_str()),
            ("providerId", self.provider_id.as_str()),
        ])
        .map_err(|e| AuthError::ProviderRejected {
            reason: format!("unencodable credential: {e}"),
        })?;

        self.call(
            "signInWithIdp",
            &IdpRequest {
                post_body,
                request_uri: &self.config.request_uri,
                return_secure_token: true,
                return_idp_credential: false,
            },
        )
        .await
    }

    async fn create_account_with_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity> {
        self.call(
            "signUp",
            &PasswordRequest {
                email,
                password,
                return_secure_token: true,
            },
        )
        .await
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Wire types
// ═══════════════════════════════════════════════════════════════════════

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdpRequest<'a> {
    post_body: String,
    request_uri: &'a str,
    return_secure_token: bool,
    return_idp_credential: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn error_from_body(status: StatusCode, body: &[u8]) -> AuthError {
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(envelope) => error_from_message(&envelope.error.message),
        // An outage in front of the service, not a decision by it
        Err(_) if status.is_server_error() => AuthError::NetworkUnavailable,
        Err(_) => AuthError::ProviderRejected {
            reason: format!("HTTP {status}"),
        },
    }
}

/// Map a provider message such as `WEAK_PASSWORD : Password should be ...`.
fn error_from_message(message: &str) -> AuthError {
    let code = message.split(':').next().unwrap_or(message).trim();

    match code {
        "EMAIL_NOT_FOUND" => AuthError::AccountNotFound,
        "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => AuthError::InvalidCredentials,
        "EMAIL_EXISTS" => AuthError::AccountAlreadyExists,
        _ => AuthError::ProviderRejected {
            reason: message.to_string(),
        },
    }
}
