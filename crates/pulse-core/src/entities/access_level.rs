use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::routes::Route;

/// A named permission profile: either a route whitelist or full admin access.
///
/// When `is_admin` is set, `allowed_routes` is ignored by every check.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AccessLevel {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub allowed_routes: BTreeSet<Route>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccessLevel {
    /// Whether this level lets its holders reach `route`.
    #[must_use]
    pub fn permits(&self, route: Route) -> bool {
        self.is_admin || self.allowed_routes.contains(&route)
    }
}

/// Input for creating an access level.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewAccessLevel {
    pub name: String,
    pub description: Option<String>,
    pub allowed_routes: BTreeSet<Route>,
    pub is_admin: bool,
}

impl NewAccessLevel {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the description. An empty string is stored as no description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.is_empty()).then_some(description);
        self
    }

    #[must_use]
    pub fn routes(mut self, routes: impl IntoIterator<Item = Route>) -> Self {
        self.allowed_routes = routes.into_iter().collect();
        self
    }

    #[must_use]
    pub const fn admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the name is blank.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation(
                "access level name must not be empty".into(),
            ));
        }
        Ok(())
    }
}
