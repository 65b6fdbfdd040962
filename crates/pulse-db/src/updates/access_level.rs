//! Access level update builder.

use std::collections::BTreeSet;

use pulse_core::Route;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccessLevelUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_routes: Option<BTreeSet<Route>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
}

impl AccessLevelUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.allowed_routes.is_none()
            && self.is_admin.is_none()
    }
}

#[derive(Default)]
pub struct AccessLevelUpdateBuilder(AccessLevelUpdate);

impl AccessLevelUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(AccessLevelUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.0.description = Some(description);
        self
    }

    #[must_use]
    pub fn allowed_routes(mut self, routes: impl IntoIterator<Item = Route>) -> Self {
        self.0.allowed_routes = Some(routes.into_iter().collect());
        self
    }

    #[must_use]
    pub const fn is_admin(mut self, is_admin: bool) -> Self {
        self.0.is_admin = Some(is_admin);
        self
    }

    #[must_use]
    pub fn build(self) -> AccessLevelUpdate {
        self.0
    }
}
