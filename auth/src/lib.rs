//! # Session Gate Authentication
//!
//! Client-side authentication session lifecycle: tracking whether a user is
//! signed in, running sign-in and sign-up against an external identity
//! service, and reacting to the outcome.
//!
//! ## Components
//!
//! - **Identity Gateway** ([`providers::IdentityGateway`]): the three
//!   provider operations, with a REST implementation
//!   ([`providers::IdentityToolkitGateway`])
//! - **Session Context** ([`session::SessionContext`]): the authoritative
//!   signed-in status, derived only from provider notifications
//! - **Auth Views** ([`views::login`], [`views::register`]): reducers over a
//!   per-view [`FormState`] with pure render functions
//!
//! ## Architecture
//!
//! Views are reducers; gateway calls and redirects are effects:
//!
//! ```text
//! input → Action → Reducer → (FormState, Effects) → gateway / navigator
//!                     ▲                                   │
//!                     └──── AttemptFinished / SessionChanged
//! ```
//!
//! ## Example: Login
//!
//! ```rust,ignore
//! use session_gate_auth::prelude::*;
//! use session_gate_runtime::Store;
//!
//! let provider = CurrentUserChannel::new();
//! let context = SessionContext::attach(&provider);
//!
//! let env = ViewEnvironment::new(gateway, navigator, AuthConfig::from_env()?);
//! let store = Store::new(FormState::default(), LoginReducer::new(), env);
//! follow_session(store.clone(), context.watch(), LoginAction::from_session);
//!
//! store.send(LoginAction::EmailChanged("a@b.com".into())).await?;
//! store.send(LoginAction::PasswordChanged("secret".into())).await?;
//! store.send(LoginAction::Submit).await?.wait().await;
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod config;
pub mod environment;
pub mod error;
pub mod providers;
pub mod session;
pub mod state;
pub mod views;

#[cfg(feature = "test-utils")]
pub mod mocks;

// Re-export main types for convenience
pub use config::{AuthConfig, IdentityToolkitConfig};
pub use environment::ViewEnvironment;
pub use error::{AuthError, ConfigError, Result};
pub use session::{SessionContext, SessionWatch};
pub use state::{AttemptPhase, Field, FormState, Identity, Session, UserId};

/// Everything needed to wire up an auth view.
pub mod prelude {
    pub use crate::config::{AuthConfig, IdentityToolkitConfig};
    pub use crate::environment::ViewEnvironment;
    pub use crate::error::{AuthError, Result};
    pub use crate::providers::{
        AuthStateObserver, CurrentUserChannel, IdentityGateway, Navigation, Navigator,
    };
    pub use crate::session::{SessionContext, SessionWatch};
    pub use crate::state::{AttemptPhase, Field, FormState, Identity, Session};
    pub use crate::views::{
        LoginAction, LoginReducer, RegisterAction, RegisterReducer, Rendered, follow_session,
    };
}
