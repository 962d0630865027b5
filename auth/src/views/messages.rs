//! User-facing error messages.

use crate::error::AuthError;

const RETRY_HINT: &str = "Please try again.";

/// Message shown on the form after a failed attempt. Never empty.
///
/// Errors that may clear up on their own end with a retry hint.
#[must_use]
pub fn user_message(error: &AuthError) -> String {
    let message = match error {
        AuthError::InvalidCredentials => "Incorrect email or password.".to_string(),
        AuthError::AccountNotFound => "No account exists for that email.".to_string(),
        AuthError::AccountAlreadyExists => {
            "An account with that email already exists. Try signing in instead.".to_string()
        },
        AuthError::NetworkUnavailable => {
            "Could not reach the sign-in service. Check your connection.".to_string()
        },
        AuthError::ProviderRejected { reason } => provider_message(reason),
        AuthError::PasswordMismatch => "Passwords do not match.".to_string(),
        AuthError::MissingField { field } => format!("Please enter your {field}."),
        AuthError::Timeout => "The sign-in service took too long to respond.".to_string(),
    };

    if error.is_retryable() {
        format!("{message} {RETRY_HINT}")
    } else {
        message
    }
}

/// Best-effort wording for the provider's catch-all denials.
fn provider_message(reason: &str) -> String {
    let code = reason.split(':').next().unwrap_or(reason).trim();

    match code {
        "INVALID_EMAIL" | "auth/invalid-email" => "That email address is not valid.".to_string(),
        "WEAK_PASSWORD" | "auth/weak-password" => {
            "Password is too weak. Use at least 6 characters.".to_string()
        },
        "USER_DISABLED" => "This account has been disabled.".to_string(),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => {
            "Too many attempts. Please wait and try again.".to_string()
        },
        "auth/popup-closed-by-user" | "POPUP_CLOSED" => "Sign-in was cancelled.".to_string(),
        _ => "Sign-in was rejected. Please try again.".to_string(),
    }
}
