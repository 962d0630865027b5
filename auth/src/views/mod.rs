//! Auth views.
//!
//! Each view is a reducer over [`FormState`] plus a pure `render` function.
//! Gateway calls and redirects leave the reducer as effects, so a view runs
//! unchanged inside a [`Store`] or under `ReducerTest`.
//!
//! ```text
//!          submit                ok
//!   Idle ─────────▶ Pending ─────────▶ Succeeded   (External(landing_url))
//!    ▲                 │
//!    │ edit / submit   │ err
//!    └──── Failed ◀────┘
//! ```

pub mod login;
pub mod messages;
pub mod register;

pub use login::{LoginAction, LoginReducer};
pub use messages::user_message;
pub use register::{RegisterAction, RegisterReducer};

use crate::config::AuthConfig;
use crate::error::{AuthError, Result};
use crate::providers::{Navigation, Navigator};
use crate::session::SessionWatch;
use crate::state::{AttemptPhase, Field, FormState, Identity, Session};
use session_gate_core::async_effect;
use session_gate_core::effect::Effect;
use session_gate_core::reducer::Reducer;
use session_gate_runtime::Store;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

// ═══════════════════════════════════════════════════════════════════════
// Rendering
// ═══════════════════════════════════════════════════════════════════════

/// What a view shows for a given state and session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// Signed-in users never see the form; they are sent here instead.
    Redirect {
        /// In-app route to replace the current one with
        to: String,
    },
    /// The form itself.
    Form(FormView),
}

impl Rendered {
    /// `true` for [`Rendered::Redirect`].
    #[must_use]
    pub const fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }
}

/// A rendered form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    /// Heading
    pub title: &'static str,
    /// Inputs, in display order
    pub fields: Vec<FieldView>,
    /// Message from the last failed attempt
    pub error: Option<String>,
    /// Inputs and buttons are disabled while an attempt is in flight
    pub controls_disabled: bool,
    /// Buttons, in display order
    pub buttons: Vec<ButtonView>,
    /// Link to the other auth view
    pub alternate: LinkView,
}

/// A rendered input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    /// Which field
    pub field: Field,
    /// Label text
    pub label: &'static str,
    /// HTML input type
    pub input_type: &'static str,
    /// Current value
    pub value: String,
    /// Every auth field is required
    pub required: bool,
}

/// What pressing a button dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonRole {
    /// Submits the credential form
    Submit,
    /// Starts federated sign-in
    Federated,
}

/// A rendered button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonView {
    /// What it does
    pub role: ButtonRole,
    /// Caption
    pub label: &'static str,
    /// Whether it can be pressed
    pub disabled: bool,
}

/// A rendered in-app link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkView {
    /// Text before the link
    pub prompt: &'static str,
    /// Link caption
    pub label: &'static str,
    /// Target route
    pub route: &'static str,
}

fn field_views(state: &FormState, fields: &[Field]) -> Vec<FieldView> {
    fields
        .iter()
        .map(|&field| FieldView {
            field,
            label: field.label(),
            input_type: field.input_type(),
            value: state.value(field).to_string(),
            required: true,
        })
        .collect()
}

/// Controls stay disabled from submit until the view is navigated away.
fn busy(state: &FormState) -> bool {
    matches!(state.phase, AttemptPhase::Pending | AttemptPhase::Succeeded)
}

// ═══════════════════════════════════════════════════════════════════════
// Shared transitions
// ═══════════════════════════════════════════════════════════════════════

/// Whether a submit may start an attempt, recording local validation
/// failures on the form.
fn admit(form: &mut FormState, required: &[Field], view: &'static str) -> bool {
    if !form.accepts_submit() {
        tracing::debug!(
            view,
            phase = ?form.phase,
            authenticated = form.session_authenticated,
            "Submit ignored"
        );
        return false;
    }

    if let Some(field) = form.first_missing(required) {
        reject(form, &AuthError::MissingField { field }, view);
        return false;
    }

    true
}

/// Record a failure that happened before any gateway call.
fn reject(form: &mut FormState, error: &AuthError, view: &'static str) {
    tracing::debug!(view, error = %error, "Submit rejected locally");
    form.phase = AttemptPhase::Failed;
    form.error = Some(user_message(error));
}

fn begin(form: &mut FormState) {
    form.phase = AttemptPhase::Pending;
    form.error = None;
}

/// Gateway call bounded by `timeout`, resolving to the view's result action.
fn attempt<A, Fut, F>(call: Fut, timeout: Option<Duration>, finished: F) -> Effect<A>
where
    A: Send + 'static,
    Fut: Future<Output = Result<Identity>> + Send + 'static,
    F: FnOnce(Result<Identity>) -> A + Send + 'static,
{
    async_effect! {
        let result = match timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or_else(|_| Err(AuthError::Timeout)),
            None => call.await,
        };
        Some(finished(result))
    }
}

fn navigate<A, N>(navigator: &N, to: Navigation) -> Effect<A>
where
    A: Send + 'static,
    N: Navigator + Clone + 'static,
{
    let navigator = navigator.clone();
    async_effect! {
        navigator.navigate(to);
        None
    }
}

/// Apply an attempt result.
fn settle<A, N>(
    form: &mut FormState,
    result: Result<Identity>,
    navigator: &N,
    config: &AuthConfig,
    view: &'static str,
) -> Effect<A>
where
    A: Send + 'static,
    N: Navigator + Clone + 'static,
{
    if !form.pending() {
        tracing::warn!(
            view,
            phase = ?form.phase,
            "Ignoring result for an attempt that is not pending"
        );
        return Effect::None;
    }

    match result {
        Ok(identity) => {
            tracing::info!(view, uid = %identity.uid, "Attempt succeeded");
            form.phase = AttemptPhase::Succeeded;
            navigate(navigator, Navigation::External(config.landing_url.clone()))
        },
        Err(error) => {
            if error.is_user_error() {
                tracing::info!(view, error = %error, "Attempt rejected");
            } else {
                tracing::warn!(view, error = %error, "Attempt failed");
            }
            form.phase = AttemptPhase::Failed;
            form.error = Some(user_message(&error));

            // A session that appeared while this attempt was in flight
            if form.session_authenticated {
                navigate(navigator, Navigation::Replace(config.home_route.clone()))
            } else {
                Effect::None
            }
        },
    }
}

/// Apply a session status change.
///
/// Becoming authenticated sends the user home, unless the view's own
/// attempt is in flight or already landing them elsewhere.
fn session_changed<A, N>(
    form: &mut FormState,
    authenticated: bool,
    navigator: &N,
    config: &AuthConfig,
    view: &'static str,
) -> Effect<A>
where
    A: Send + 'static,
    N: Navigator + Clone + 'static,
{
    let was_authenticated = form.session_authenticated;
    form.session_authenticated = authenticated;

    let settled = matches!(form.phase, AttemptPhase::Idle | AttemptPhase::Failed);

    if authenticated && !was_authenticated && settled {
        tracing::info!(
            view,
            route = %config.home_route,
            "Session authenticated, leaving auth view"
        );
        navigate(navigator, Navigation::Replace(config.home_route.clone()))
    } else {
        Effect::None
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Session feed
// ═══════════════════════════════════════════════════════════════════════

/// Feed the current session, then every change, into a view store.
///
/// Runs until the session context is dropped or the store shuts down.
pub fn follow_session<S, A, E, R, F>(
    store: Store<S, A, E, R>,
    mut watch: SessionWatch,
    to_action: F,
) -> JoinHandle<()>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    A: Send + 'static,
    S: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    F: Fn(&Session) -> A + Send + 'static,
{
    tokio::spawn(async move {
        let mut session = watch.current();
        loop {
            if store.send(to_action(&session)).await.is_err() {
                tracing::debug!("View store shut down, no longer following session");
                break;
            }

            match watch.changed().await {
                Some(next) => session = next,
                None => break,
            }
        }
    })
}
