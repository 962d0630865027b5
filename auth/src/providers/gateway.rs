//! Identity gateway trait.

use crate::error::Result;
use crate::state::Identity;

/// Capability for the three identity operations the views need.
///
/// Implementations hold no view state. Each call reaches the provider at
/// most once and never retries; the caller decides whether to try again.
///
/// On success the provider also publishes the identity on its ambient
/// notification stream (see [`super::AuthStateObserver`]). Callers must not
/// rely on the returned identity to update the session.
pub trait IdentityGateway: Send + Sync {
    /// Sign in with an email/password pair.
    ///
    /// # Errors
    ///
    /// - [`crate::AuthError::InvalidCredentials`] for a wrong password
    /// - [`crate::AuthError::AccountNotFound`] for an unknown email
    /// - [`crate::AuthError::NetworkUnavailable`] if the provider is unreachable
    /// - [`crate::AuthError::ProviderRejected`] for any other denial
    fn sign_in_with_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<Identity>> + Send;

    /// Sign in through the provider's interactive federated flow.
    ///
    /// Takes no input; which provider is used is configuration.
    ///
    /// # Errors
    ///
    /// [`crate::AuthError::ProviderRejected`] when the user abandons the flow
    /// or the provider denies it, [`crate::AuthError::NetworkUnavailable`]
    /// on transport failure.
    fn sign_in_with_federated_provider(
        &self,
    ) -> impl std::future::Future<Output = Result<Identity>> + Send;

    /// Provision a new account and sign it in.
    ///
    /// # Errors
    ///
    /// - [`crate::AuthError::AccountAlreadyExists`] if the email is taken
    /// - [`crate::AuthError::NetworkUnavailable`] if the provider is unreachable
    /// - [`crate::AuthError::ProviderRejected`] for weak passwords, malformed
    ///   emails and other denials
    fn create_account_with_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<Identity>> + Send;
}
