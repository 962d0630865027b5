//! Login Flow Demo
//!
//! Drives the login view against a live Identity Toolkit endpoint (or the
//! local auth emulator) and prints where the view ends up.
//!
//! # Running the Example
//!
//! ```bash
//! export SESSION_GATE_API_KEY=...
//! export SESSION_GATE_LANDING_URL=https://app.example.com/chat
//!
//! # Email and password
//! cargo run -p login-flow -- a@b.com secret
//!
//! # Federated sign-in with an ID token obtained elsewhere
//! LOGIN_FLOW_ID_TOKEN=eyJ... cargo run -p login-flow -- --federated
//! ```
//!
//! Point `SESSION_GATE_IDENTITY_ENDPOINT` at
//! `http://localhost:9099/identitytoolkit.googleapis.com` to use the emulator.

#![allow(missing_docs)]

use anyhow::{Context, bail};
use session_gate_auth::prelude::*;
use session_gate_auth::providers::{
    FederatedCredential, FederatedFlow, IdentityToolkitGateway, TracingNavigator,
};
use session_gate_auth::views::login;
use session_gate_runtime::Store;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const ID_TOKEN_VAR: &str = "LOGIN_FLOW_ID_TOKEN";

/// Federated flow that hands over a pre-issued ID token instead of a popup.
#[derive(Clone)]
struct PresetTokenFlow {
    id_token: Option<String>,
}

impl FederatedFlow for PresetTokenFlow {
    async fn obtain_credential(&self, provider_id: &str) -> Result<FederatedCredential> {
        match &self.id_token {
            Some(id_token) => {
                tracing::debug!(provider = provider_id, "Using preset ID token");
                Ok(FederatedCredential {
                    id_token: id_token.clone(),
                })
            },
            None => Err(AuthError::ProviderRejected {
                reason: "popup-closed-by-user".to_string(),
            }),
        }
    }
}

enum Mode {
    Credentials { email: String, password: String },
    Federated,
}

fn parse_args() -> anyhow::Result<Mode> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [flag] if flag == "--federated" => Ok(Mode::Federated),
        [email, password] => Ok(Mode::Credentials {
            email: email.clone(),
            password: password.clone(),
        }),
        _ => bail!("usage: login-flow <email> <password> | login-flow --federated"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,session_gate=debug,login_flow=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let mode = parse_args()?;
    let config = AuthConfig::from_env().context("loading view configuration")?;
    let toolkit =
        IdentityToolkitConfig::from_env().context("loading identity service configuration")?;

    tracing::info!(
        endpoint = %toolkit.endpoint,
        landing = %config.landing_url,
        "Starting login flow"
    );

    let provider = CurrentUserChannel::new();
    let context = SessionContext::attach(&provider);

    let flow = PresetTokenFlow {
        id_token: std::env::var(ID_TOKEN_VAR).ok(),
    };
    let gateway = IdentityToolkitGateway::new(toolkit, flow, provider.clone())
        .with_provider_id(config.federated_provider_id.clone());

    let env = ViewEnvironment::new(gateway, TracingNavigator, config.clone());
    let store = Store::new(FormState::default(), LoginReducer::new(), env);
    let follower = follow_session(store.clone(), context.watch(), LoginAction::from_session);

    let submit = match mode {
        Mode::Credentials { email, password } => {
            store.send(LoginAction::EmailChanged(email)).await?;
            store.send(LoginAction::PasswordChanged(password)).await?;
            LoginAction::Submit
        },
        Mode::Federated => LoginAction::SubmitFederated,
    };

    let mut handle = store.send(submit).await?;
    handle.wait().await;

    // Give the session feed a moment to reach the view
    tokio::time::sleep(Duration::from_millis(50)).await;

    let form = store.state(Clone::clone).await;
    match login::render(&form, &context.current(), &config) {
        Rendered::Redirect { to } => {
            let uid = context.current().identity.map(|i| i.uid);
            tracing::info!(route = %to, uid = ?uid, "Signed in");
        },
        Rendered::Form(view) => {
            tracing::warn!(
                phase = ?form.phase,
                error = view.error.as_deref().unwrap_or("none"),
                "Still on the login form"
            );
        },
    }

    context.detach();
    follower.abort();
    store.shutdown(Duration::from_secs(5)).await?;

    Ok(())
}
