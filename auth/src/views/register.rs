//! Register view.

use super::{
    ButtonRole, ButtonView, FormView, LinkView, Rendered, admit, attempt, begin, busy,
    field_views, reject, session_changed, settle,
};
use crate::config::AuthConfig;
use crate::environment::ViewEnvironment;
use crate::error::{AuthError, Result};
use crate::providers::{IdentityGateway, Navigator};
use crate::state::{Field, FormState, Identity, Session};
use session_gate_core::effect::Effect;
use session_gate_core::reducer::Reducer;
use session_gate_core::{SmallVec, smallvec};
use std::marker::PhantomData;

const VIEW: &str = "register";

/// Fields the register form requires, in display order.
pub const REGISTER_FIELDS: &[Field] = &[Field::Email, Field::Password, Field::ConfirmPassword];

/// Everything the register view reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterAction {
    /// Email input edited
    EmailChanged(String),
    /// Password input edited
    PasswordChanged(String),
    /// Confirm-password input edited
    ConfirmPasswordChanged(String),
    /// Form submitted
    Submit,
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

impl RegisterAction {
    /// Build the session feed action for [`super::follow_session`].
    #[must_use]
    pub const fn from_session(session: &Session) -> Self {
        Self::SessionChanged {
            authenticated: session.is_authenticated,
        }
    }
}

/// Register view reducer.
#[derive(Debug, Clone)]
pub struct RegisterReducer<G, N> {
    _phantom: PhantomData<fn() -> (G, N)>,
}

impl<G, N> RegisterReducer<G, N> {
    /// Create a new register reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<G, N> Default for RegisterReducer<G, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G, N> Reducer for RegisterReducer<G, N>
where
    G: IdentityGateway + Clone + 'static,
    N: Navigator + Clone + 'static,
{
    type State = FormState;
    type Action = RegisterAction;
    type Environment = ViewEnvironment<G, N>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            RegisterAction::EmailChanged(email) => {
                state.set(Field::Email, email);
                smallvec![Effect::None]
            },
            RegisterAction::PasswordChanged(password) => {
                state.set(Field::Password, password);
                smallvec![Effect::None]
            },
            RegisterAction::ConfirmPasswordChanged(confirmation) => {
                state.set(Field::ConfirmPassword, confirmation);
                smallvec![Effect::None]
            },

            RegisterAction::Submit => {
                if !admit(state, REGISTER_FIELDS, VIEW) {
                    return smallvec![Effect::None];
                }

                if state.value(Field::Password) != state.value(Field::ConfirmPassword) {
                    reject(state, &AuthError::PasswordMismatch, VIEW);
                    return smallvec![Effect::None];
                }

                let email = state.value(Field::Email).to_string();
                let password = state.value(Field::Password).to_string();
                tracing::info!(view = VIEW, email = %email, "Creating account");
                begin(state);

                let gateway = env.gateway.clone();
                smallvec![attempt(
                    async move { gateway.create_account_with_credentials(&email, &password).await },
                    env.config.attempt_timeout,
                    |result| RegisterAction::AttemptFinished { result },
                )]
            },

            RegisterAction::AttemptFinished { result } => {
                smallvec![settle(state, result, &env.navigator, &env.config, VIEW)]
            },

            RegisterAction::SessionChanged { authenticated } => {
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

/// Render the register view.
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
        title: "Create a New Account",
        fields: field_views(state, REGISTER_FIELDS),
        error: state.error.clone(),
        controls_disabled: disabled,
        buttons: vec![ButtonView {
            role: ButtonRole::Submit,
            label: if disabled { "Signing Up..." } else { "Sign Up" },
            disabled,
        }],
        alternate: LinkView {
            prompt: "Already have an account?",
            label: "Continue",
            route: "/login",
        },
    })
}
