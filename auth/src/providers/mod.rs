//! Authentication providers.
//!
//! Traits for every capability the auth views depend on, plus the real
//! implementations. Reducers only see the traits; the application picks
//! implementations when it builds a [`crate::environment::ViewEnvironment`].
//!
//! ```text
//!   view reducer ──effect──▶ IdentityGateway ──(success)──▶ provider cache
//!        ▲                                                       │
//!        │ SessionChanged                                        ▼
//!   SessionContext ◀──────── AuthStateObserver::subscribe ◀──── notify
//! ```

pub mod current_user;
pub mod gateway;
pub mod identity_toolkit;
pub mod navigator;
pub mod observer;

pub use current_user::CurrentUserChannel;
pub use gateway::IdentityGateway;
pub use identity_toolkit::{FederatedCredential, FederatedFlow, IdentityToolkitGateway};
pub use navigator::{Navigation, Navigator, TracingNavigator};
pub use observer::{AuthStateObserver, Listener, Subscription};
