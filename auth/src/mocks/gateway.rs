//! Mock identity gateway.

use crate::error::Result;
use crate::providers::{CurrentUserChannel, IdentityGateway};
use crate::state::Identity;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

/// One recorded gateway invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    /// `sign_in_with_credentials(email, password)`
    SignInWithCredentials {
        /// Email passed in
        email: String,
        /// Password passed in
        password: String,
    },
    /// `sign_in_with_federated_provider()`
    SignInWithFederatedProvider,
    /// `create_account_with_credentials(email, password)`
    CreateAccountWithCredentials {
        /// Email passed in
        email: String,
        /// Password passed in
        password: String,
    },
}

/// Mock identity gateway.
///
/// Records every call and answers with a configurable outcome. Calls can be
/// held open with [`MockIdentityGateway::hold`] to test behaviour while an
/// attempt is pending.
#[derive(Debug, Clone)]
pub struct MockIdentityGateway {
    calls: Arc<Mutex<Vec<GatewayCall>>>,
    outcome: Arc<Mutex<Result<Identity>>>,
    gate: Arc<watch::Sender<bool>>,
    current_user: Option<CurrentUserChannel>,
}

impl MockIdentityGateway {
    /// A gateway whose calls all succeed with `identity`.
    #[must_use]
    pub fn succeeding(identity: Identity) -> Self {
        Self::with_outcome(Ok(identity))
    }

    /// A gateway whose calls all fail with `error`.
    #[must_use]
    pub fn failing(error: crate::AuthError) -> Self {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(outcome: Result<Identity>) -> Self {
        let (gate, _) = watch::channel(true);
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            outcome: Arc::new(Mutex::new(outcome)),
            gate: Arc::new(gate),
            current_user: None,
        }
    }

    /// Publish successful identities on `channel`, like a real provider.
    #[must_use]
    pub fn publishing_to(mut self, channel: CurrentUserChannel) -> Self {
        self.current_user = Some(channel);
        self
    }

    /// Change the outcome of subsequent calls.
    pub fn set_outcome(&self, outcome: Result<Identity>) {
        *self.outcome.lock().unwrap_or_else(PoisonError::into_inner) = outcome;
    }

    /// Keep calls pending until [`MockIdentityGateway::release`].
    pub fn hold(&self) {
        self.gate.send_replace(false);
    }

    /// Let held and future calls complete.
    pub fn release(&self) {
        self.gate.send_replace(true);
    }

    /// Every call made so far.
    #[must_use]
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of calls made so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn respond(&self, call: GatewayCall) -> impl Future<Output = Result<Identity>> + Send + use<> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);

        let mut gate = self.gate.subscribe();
        let outcome = Arc::clone(&self.outcome);
        let current_user = self.current_user.clone();

        async move {
            // The sender lives as long as any clone of the mock
            let _ = gate.wait_for(|open| *open).await;

            let result = outcome.lock().unwrap_or_else(PoisonError::into_inner).clone();
            if let (Ok(identity), Some(channel)) = (&result, &current_user) {
                channel.publish(Some(identity.clone()));
            }
            result
        }
    }
}

impl Default for MockIdentityGateway {
    fn default() -> Self {
        Self::succeeding(Identity::new("u1"))
    }
}

impl IdentityGateway for MockIdentityGateway {
    fn sign_in_with_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Identity>> + Send {
        self.respond(GatewayCall::SignInWithCredentials {
            email: email.to_string(),
            password: password.to_string(),
        })
    }

    fn sign_in_with_federated_provider(&self) -> impl Future<Output = Result<Identity>> + Send {
        self.respond(GatewayCall::SignInWithFederatedProvider)
    }

    fn create_account_with_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Identity>> + Send {
        self.respond(GatewayCall::CreateAccountWithCredentials {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AuthError;
    use std::time::Duration;

    #[tokio::test]
    async fn test_records_calls_and_answers() {
        let gateway = MockIdentityGateway::failing(AuthError::AccountNotFound);

        let result = gateway.sign_in_with_credentials("a@b.com", "secret").await;

        assert_eq!(result, Err(AuthError::AccountNotFound));
        assert_eq!(
            gateway.calls(),
            vec![GatewayCall::SignInWithCredentials {
                email: "a@b.com".to_string(),
                password: "secret".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_hold_keeps_call_pending() {
        let gateway = MockIdentityGateway::default();
        gateway.hold();

        let held = gateway.sign_in_with_federated_provider();
        let waited = tokio::time::timeout(Duration::from_millis(20), held).await;
        assert!(waited.is_err());

        gateway.release();
        let result = gateway.sign_in_with_federated_provider().await;
        assert_eq!(result, Ok(Identity::new("u1")));
        assert_eq!(gateway.call_count(), 2);
    }

    #[tokio::test]
    async fn test_success_publishes_to_channel() {
        let channel = CurrentUserChannel::new();
        let gateway =
            MockIdentityGateway::succeeding(Identity::new("u9")).publishing_to(channel.clone());

        let _ = gateway.create_account_with_credentials("n@b.com", "pw").await;

        assert_eq!(channel.current(), Some(Identity::new("u9")));
    }
}
