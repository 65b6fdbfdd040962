use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Authenticated identity handed over by the auth provider.
///
/// `user_id` is the provider's subject, unrelated to the roster's own
/// `OrgUser::id`. Roster matching only looks at `email`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuthIdentity {
    pub user_id: String,
    pub email: String,
}

impl AuthIdentity {
    #[must_use]
    pub fn new(user_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
        }
    }
}

/// Current state of the authentication collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "status", content = "identity", rename_all = "snake_case")]
pub enum AuthStatus {
    /// The provider has not reported yet.
    #[default]
    Loading,
    SignedOut,
    SignedIn(AuthIdentity),
}

impl AuthStatus {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Email of the signed-in identity, if any.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::SignedIn(identity) => Some(identity.email.as_str()),
            Self::Loading | Self::SignedOut => None,
        }
    }
}
