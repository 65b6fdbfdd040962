use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::AccessLevel;
use crate::errors::CoreError;

/// An organization-roster entry.
///
/// Distinct from the auth provider's identity: `auth_user_id` stays `None`
/// until the person signs in, and may never be set. `access_level` is the
/// store's denormalized copy and may be stale; resolve through
/// `access_level_id` instead.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct OrgUser {
    pub id: String,
    pub auth_user_id: Option<String>,
    pub email: String,
    pub name: Option<String>,
    pub access_level_id: Option<String>,
    pub access_level: Option<AccessLevel>,
    pub is_owner: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for inviting an org user (or bootstrapping the owner).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewOrgUser {
    pub email: String,
    pub name: Option<String>,
    pub access_level_id: Option<String>,
    pub is_owner: bool,
}

impl NewOrgUser {
    #[must_use]
    pub fn invite(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn owner(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            is_owner: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn name(mut self, name: Option<String>) -> Self {
        self.name = name.filter(|n| !n.is_empty());
        self
    }

    #[must_use]
    pub fn access_level_id(mut self, access_level_id: Option<String>) -> Self {
        self.access_level_id = access_level_id;
        self
    }

    /// Shallow email check: one `@`, non-empty local part and domain, no
    /// whitespace. Case is preserved; roster matching is exact.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for a malformed email.
    pub fn validate(&self) -> Result<(), CoreError> {
        let email = self.email.as_str();
        let well_formed = !email.chars().any(char::is_whitespace)
            && email
                .split_once('@')
                .is_some_and(|(local, domain)| {
                    !local.is_empty() && !domain.is_empty() && !domain.contains('@')
                });
        if !well_formed {
            return Err(CoreError::Validation(format!("invalid email '{email}'")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("a@x.com")]
    #[case("Ana.Silva@agencia.com.br")]
    fn accepts_plain_emails(#[case] email: &str) {
        assert!(NewOrgUser::invite(email).validate().is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("no-at-sign")]
    #[case("@x.com")]
    #[case("a@")]
    #[case("a@b@c")]
    #[case("a @x.com")]
    fn rejects_malformed_emails(#[case] email: &str) {
        assert!(NewOrgUser::invite(email).validate().is_err());
    }

    #[test]
    fn owner_constructor_sets_flag() {
        let owner = NewOrgUser::owner("boss@x.com");
        assert!(owner.is_owner);
        assert!(owner.access_level_id.is_none());
    }

    #[test]
    fn empty_name_is_dropped() {
        let user = NewOrgUser::invite("a@x.com").name(Some(String::new()));
        assert!(user.name.is_none());
    }
}
