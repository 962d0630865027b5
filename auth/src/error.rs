//! Error types for authentication operations.

use crate::state::Field;
use thiserror::Error;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Every way an authentication attempt can fail.
///
/// The first five kinds come from the identity provider. The rest are raised
/// locally before (or instead of) a provider call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    // ═══════════════════════════════════════════════════════════
    // Provider Errors
    // ═══════════════════════════════════════════════════════════

    /// Email/password pair was rejected.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No account exists for the given email.
    #[error("Account not found")]
    AccountNotFound,

    /// An account already exists for the given email.
    #[error("Account already exists")]
    AccountAlreadyExists,

    /// The provider could not be reached.
    #[error("Network unavailable")]
    NetworkUnavailable,

    /// Any other provider-side denial (malformed email, weak password,
    /// popup closed by the user, disabled account, ...).
    #[error("Provider rejected the request: {reason}")]
    ProviderRejected {
        /// Provider's reason code or description
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════
    // Local Validation
    // ═══════════════════════════════════════════════════════════

    /// Password and confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// A required field was left empty.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The empty field
        field: Field,
    },

    /// The provider did not answer within the attempt timeout.
    #[error("Timed out waiting for the identity provider")]
    Timeout,
}

impl AuthError {
    /// Returns `true` if this error is due to what the user typed.
    ///
    /// # Examples
    ///
    /// ```
    /// # use session_gate_auth::AuthError;
    /// assert!(AuthError::InvalidCredentials.is_user_error());
    /// assert!(!AuthError::NetworkUnavailable.is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials
                | Self::AccountNotFound
                | Self::AccountAlreadyExists
                | Self::PasswordMismatch
                | Self::MissingField { .. }
        )
    }

    /// Returns `true` if resubmitting the same form unchanged may succeed.
    ///
    /// # Examples
    ///
    /// ```
    /// # use session_gate_auth::AuthError;
    /// assert!(AuthError::Timeout.is_retryable());
    /// assert!(!AuthError::PasswordMismatch.is_retryable());
    /// ```
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkUnavailable | Self::Timeout)
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("Missing environment variable {0}")]
    MissingVar(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// Variable name
        var: &'static str,
        /// What was wrong with it
        reason: String,
    },
}
