//! Login view.
//!
//! Email/password sign-in plus a federated sign-in button. Both share one
//! attempt slot, so neither can start while the other is pending.

use super::{
    ButtonRole, ButtonView, FormView, LinkView, Rendered, admit, attempt, begin, busy,
    field_views, session_changed, settle,
};
use crate::config::AuthConfig;
use crate::environment::ViewEnvironment;
use crate::error::Result;
use crate::providers::{IdentityGateway, Navigator};
use crate::state::{Field, FormState, Identity, Session};
use session_gate_core::effect::Effect;
use session_gate_core::reducer::Reducer;
use session_gate_core::{SmallVec, smallvec};
use std::marker::PhantomData;

const VIEW: &str = "login";

/// Fields the login form requires, in display order.
pub const LOGIN_FIELDS: &[Field] = &[Field::Email, Field::Password];

/// Everything the login view reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginAction {
    /// Email input edited
    EmailChanged(String),
    /// Password input edited
    PasswordChanged(String),
    /// Credential form submitted
    Submit,
    /// "Continue with Google" pressed
    SubmitFederated,
    /// The gateway call settled
    AttemptFinished {
        /// Gateway outcome (or timeout)
        result: Result<Identity>,
    },
    /// The session context published a new status
    SessionChanged {
        /// Whether a user is signed in
        authenticated: bool,
    },
}

impl LoginAction {
    /// Build the session feed action for [`super::follow_session`].
    #[must_use]
    pub const fn from_session(session: &Session) -> Self {
        Self::SessionChanged {
            authenticated: session.is_authenticated,
        }
    }
}

/// Login view reducer.
#[derive(Debug, Clone)]
pub struct LoginReducer<G, N> {
    _phantom: PhantomData<fn() -> (G, N)>,
}

impl<G, N> LoginReducer<G, N> {
    /// Create a new login reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<G, N> Default for LoginReducer<G, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G, N> Reducer for LoginReducer<G, N>
where
    G: IdentityGateway + Clone + 'static,
    N: Navigator + Clone + 'static,
{
    type State = FormState;
    type Action = LoginAction;
    type Environment = ViewEnvironment<G, N>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            LoginAction::EmailChanged(email) => {
                state.set(Field::Email, email);
                smallvec![Effect::None]
            },
            LoginAction::PasswordChanged(password) => {
                state.set(Field::Password, password);
                smallvec![Effect::None]
            },

            LoginAction::Submit => {
                if !admit(state, LOGIN_FIELDS, VIEW) {
                    return smallvec![Effect::None];
                }

                let email = state.value(Field::Email).to_string();
                let password = state.value(Field::Password).to_string();
                tracing::info!(view = VIEW, email = %email, "Signing in with credentials");
                begin(state);

                let gateway = env.gateway.clone();
                smallvec![attempt(
                    async move { gateway.sign_in_with_credentials(&email, &password).await },
                    env.config.attempt_timeout,
                    |result| LoginAction::AttemptFinished { result },
                )]
            },

            LoginAction::SubmitFederated => {
                // The federated flow needs no form input
                if !admit(state, &[], VIEW) {
                    return smallvec![Effect::None];
                }

                tracing::info!(
                    view = VIEW,
                    provider = %env.config.federated_provider_id,
                    "Signing in with federated provider"
                );
                begin(state);

                let gateway = env.gateway.clone();
                smallvec![attempt(
                    async move { gateway.sign_in_with_federated_provider().await },
                    env.config.attempt_timeout,
                    |result| LoginAction::AttemptFinished { result },
                )]
            },

            LoginAction::AttemptFinished { result } => {
                smallvec![settle(state, result, &env.navigator, &env.config, VIEW)]
            },

            LoginAction::SessionChanged { authenticated } => {
                smallvec![session_changed(
                    state,
                    authenticated,
                    &env.navigator,
                    &env.config,
                    VIEW
                )]
            },
        }
    }
}

/// Render the login view.
///
/// A signed-in session always wins over the form.
#[must_use]
pub fn render(state: &FormState, session: &Session, config: &AuthConfig) -> Rendered {
    if session.is_authenticated {
        return Rendered::Redirect {
            to: config.home_route.clone(),
        };
    }

    let disabled = busy(state);

    Rendered::Form(FormView {
        title: "Welcome Back",
        fields: field_views(state, LOGIN_FIELDS),
        error: state.error.clone(),
        controls_disabled: disabled,
        buttons: vec![
            ButtonView {
                role: ButtonRole::Submit,
                label: if disabled { "Signing In..." } else { "Sign In" },
                disabled,
            },
            ButtonView {
                role: ButtonRole::Federated,
                label: if disabled {
                    "Signing In..."
                } else {
                    "Continue with Google"
                },
                disabled,
            },
        ],
        alternate: LinkView {
            prompt: "Don't have an account?",
            label: "Sign up",
            route: "/register",
        },
    })
}

#[cfg(all(test, feature = "test-utils"))]
mod tests {
    use super::*;
    use crate::AuthError;
    use crate::mocks::{MockIdentityGateway, RecordingNavigator};
    use crate::state::AttemptPhase;
    use session_gate_testing::{ReducerTest, assertions, effects};

    type Env = ViewEnvironment<MockIdentityGateway, RecordingNavigator>;
    type Login = LoginReducer<MockIdentityGateway, RecordingNavigator>;

    fn env() -> Env {
        ViewEnvironment::new(
            MockIdentityGateway::default(),
            RecordingNavigator::new(),
            AuthConfig::new("https://app.example.com/"),
        )
    }

    fn filled() -> FormState {
        let mut form = FormState::default();
        form.set(Field::Email, "a@b.com".to_string());
        form.set(Field::Password, "secret".to_string());
        form
    }

    #[test]
    fn test_submit_starts_attempt() {
        ReducerTest::new(Login::new())
            .with_env(env())
            .given_state(filled())
            .when_action(LoginAction::Submit)
            .then_state(|state| {
                assert!(state.pending());
                assert_eq!(state.error, None);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn test_submit_with_empty_password_fails_locally() {
        let mut form = FormState::default();
        form.set(Field::Email, "a@b.com".to_string());

        ReducerTest::new(Login::new())
            .with_env(env())
            .given_state(form)
            .when_action(LoginAction::Submit)
            .then_state(|state| {
                assert_eq!(state.phase, AttemptPhase::Failed);
                assert_eq!(state.error.as_deref(), Some("Please enter your password."));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_submit_while_pending_is_ignored() {
        ReducerTest::new(Login::new())
            .with_env(env())
            .given_state(filled())
            .when_actions([LoginAction::Submit])
            .when_action(LoginAction::SubmitFederated)
            .then_state(|state| assert!(state.pending()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_submit_ignored_when_already_signed_in() {
        ReducerTest::new(Login::new())
            .with_env(env())
            .given_state(filled())
            .when_actions([LoginAction::SessionChanged { authenticated: true }])
            .when_action(LoginAction::Submit)
            .then_state(|state| assert_eq!(state.phase, AttemptPhase::Idle))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_failure_populates_message() {
        ReducerTest::new(Login::new())
            .with_env(env())
            .given_state(filled())
            .when_actions([LoginAction::Submit])
            .when_action(LoginAction::AttemptFinished {
                result: Err(AuthError::InvalidCredentials),
            })
            .then_state(|state| {
                assert_eq!(state.phase, AttemptPhase::Failed);
                assert!(!state.pending());
                assert_eq!(state.error.as_deref(), Some("Incorrect email or password."));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_stale_result_is_ignored() {
        ReducerTest::new(Login::new())
            .with_env(env())
            .given_state(filled())
            .when_action(LoginAction::AttemptFinished {
                result: Ok(Identity::new("u1")),
            })
            .then_state(|state| assert_eq!(state.phase, AttemptPhase::Idle))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[tokio::test]
    async fn test_success_navigates_to_landing_url() {
        let env = env();
        let reducer = Login::new();
        let mut state = filled();

        let submit = reducer.reduce(&mut state, LoginAction::Submit, &env);
        let fed_back = effects::drain_all(submit).await;
        assert_eq!(
            fed_back,
            vec![LoginAction::AttemptFinished {
                result: Ok(Identity::new("u1"))
            }]
        );

        let mut navigation = SmallVec::<[Effect<LoginAction>; 4]>::new();
        for action in fed_back {
            navigation.extend(reducer.reduce(&mut state, action, &env));
        }
        assert!(effects::drain_all(navigation).await.is_empty());

        assert_eq!(state.phase, AttemptPhase::Succeeded);
        assert_eq!(
            env.navigator.navigations(),
            vec![crate::providers::Navigation::External(
                "https://app.example.com/".to_string()
            )]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_gateway_times_out() {
        let env = env();
        env.gateway.hold();
        let config = env
            .config
            .clone()
            .with_attempt_timeout(Some(std::time::Duration::from_secs(5)));
        let env = ViewEnvironment::new(env.gateway, env.navigator, config);

        let mut state = filled();
        let effects = Login::new().reduce(&mut state, LoginAction::Submit, &env);

        assert_eq!(
            effects::drain_all(effects).await,
            vec![LoginAction::AttemptFinished {
                result: Err(AuthError::Timeout)
            }]
        );
    }

    #[test]
    fn test_render_labels_follow_phase() {
        let config = AuthConfig::default();
        let mut state = filled();

        let Rendered::Form(idle) = render(&state, &Session::default(), &config) else {
            unreachable!("signed-out session renders the form");
        };
        assert_eq!(idle.buttons[0].label, "Sign In");
        assert_eq!(idle.buttons[1].label, "Continue with Google");
        assert!(!idle.controls_disabled);

        state.phase = AttemptPhase::Pending;
        let Rendered::Form(pending) = render(&state, &Session::default(), &config) else {
            unreachable!("signed-out session renders the form");
        };
        assert!(pending.controls_disabled);
        assert!(pending.buttons.iter().all(|b| b.disabled && b.label == "Signing In..."));
    }
}
