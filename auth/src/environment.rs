//! Auth view environment.
//!
//! The dependencies injected into the login and register reducers.

use crate::config::AuthConfig;
use crate::providers::{IdentityGateway, Navigator};

/// Everything an auth view reducer needs from the outside world.
///
/// # Type Parameters
///
/// - `G`: Identity gateway
/// - `N`: Navigator
#[derive(Debug, Clone)]
pub struct ViewEnvironment<G, N>
where
    G: IdentityGateway + Clone,
    N: Navigator + Clone,
{
    /// Identity gateway (sign-in / sign-up calls).
    pub gateway: G,

    /// Navigator receiving redirect commands.
    pub navigator: N,

    /// Landing URL, home route and timeout.
    pub config: AuthConfig,
}

impl<G, N> ViewEnvironment<G, N>
where
    G: IdentityGateway + Clone,
    N: Navigator + Clone,
{
    /// Create a new view environment.
    #[must_use]
    pub const fn new(gateway: G, navigator: N, config: AuthConfig) -> Self {
        Self {
            gateway,
            navigator,
            config,
        }
    }
}
