//! Authentication state types.
//!
//! All types are `Clone` so reducers can own them and tests can snapshot
//! them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════
// Identity
// ═══════════════════════════════════════════════════════════════════════

/// Provider-assigned unique identifier for a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Wrap a provider identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The identity provider's record of a signed-in user.
///
/// Read-only on this side: it is never enriched or persisted locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique user identifier.
    pub uid: UserId,

    /// Email address, when the provider shares one.
    pub email: Option<String>,
}

impl Identity {
    /// Create an identity without an email address.
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: UserId::new(uid),
            email: None,
        }
    }

    /// Attach an email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Session
// ═══════════════════════════════════════════════════════════════════════

/// Signed-in status as last reported by the identity provider.
///
/// The default value (not authenticated, no identity) is the state before
/// the first provider notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Whether a user is signed in.
    pub is_authenticated: bool,

    /// The signed-in user, if any.
    pub identity: Option<Identity>,
}

impl Session {
    /// Build the session a provider notification describes.
    ///
    /// The result depends only on `identity`; nothing carries over from an
    /// earlier session.
    #[must_use]
    pub fn from_notification(identity: Option<Identity>) -> Self {
        Self {
            is_authenticated: identity.is_some(),
            identity,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Forms
// ═══════════════════════════════════════════════════════════════════════

/// Input fields on the auth forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    /// Email address
    Email,
    /// Password
    Password,
    /// Password confirmation (register only)
    ConfirmPassword,
}

impl Field {
    /// Label shown next to the input.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Password => "Password",
            Self::ConfirmPassword => "Confirm Password",
        }
    }

    /// HTML input type used to render the field.
    #[must_use]
    pub const fn input_type(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password | Self::ConfirmPassword => "password",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirm password",
        })
    }
}

/// Where a view is in its sign-in / sign-up attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptPhase {
    /// Nothing submitted, or ready to retry.
    #[default]
    Idle,
    /// A gateway call is outstanding.
    Pending,
    /// The gateway call succeeded. Terminal for the view.
    Succeeded,
    /// The last attempt failed; `FormState::error` holds the message.
    Failed,
}

/// Per-view form state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    /// Current field values. Absent means empty.
    pub fields: BTreeMap<Field, String>,

    /// Attempt lifecycle.
    pub phase: AttemptPhase,

    /// User-facing message from the last failed attempt.
    pub error: Option<String>,

    /// Last session status this view was told about.
    pub session_authenticated: bool,
}

impl FormState {
    /// `true` while an attempt is outstanding. Controls are disabled.
    #[must_use]
    pub fn pending(&self) -> bool {
        self.phase == AttemptPhase::Pending
    }

    /// Current value of a field, empty if never edited.
    #[must_use]
    pub fn value(&self, field: Field) -> &str {
        self.fields.get(&field).map_or("", String::as_str)
    }

    /// Record an edit.
    ///
    /// Editing after a failure returns the form to `Idle` and clears the
    /// message. Edits during an attempt are kept but leave the phase alone.
    pub fn set(&mut self, field: Field, value: String) {
        self.fields.insert(field, value);

        if self.phase == AttemptPhase::Failed {
            self.phase = AttemptPhase::Idle;
            self.error = None;
        }
    }

    /// First required field that is empty, in form order.
    #[must_use]
    pub fn first_missing(&self, required: &[Field]) -> Option<Field> {
        required
            .iter()
            .copied()
            .find(|field| self.value(*field).is_empty())
    }

    /// Whether a new attempt may start right now.
    #[must_use]
    pub fn accepts_submit(&self) -> bool {
        !self.session_authenticated
            && matches!(self.phase, AttemptPhase::Idle | AttemptPhase::Failed)
    }
}
