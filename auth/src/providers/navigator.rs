//! Navigation commands and the navigator capability.

use std::fmt;

/// A redirect issued by an auth view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Full page load of an absolute URL, leaving this client.
    External(String),
    /// In-app route replacement; the auth page is not kept in history.
    Replace(String),
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::External(url) => write!(f, "external {url}"),
            Self::Replace(route) => write!(f, "replace {route}"),
        }
    }
}

/// Performs navigation on behalf of the views.
///
/// Views never navigate directly. They return a navigation effect and the
/// store hands the command to this capability.
pub trait Navigator: Send + Sync {
    /// Carry out a navigation command.
    fn navigate(&self, to: Navigation);
}

/// Navigator that only logs, for headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, to: Navigation) {
        tracing::info!(navigation = %to, "Navigating");
    }
}
