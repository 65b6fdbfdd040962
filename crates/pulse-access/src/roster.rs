//! Loaded roster snapshot and identity resolution over it.
//!
//! Everything here is pure: no I/O, no shared state. The engine rebuilds a
//! [`Resolution`] from a [`Roster`] whenever either the roster or the
//! authenticated identity changes.

use std::collections::BTreeSet;

use pulse_core::Route;
use pulse_core::entities::{AccessLevel, OrgUser};
use serde::Serialize;

/// Every access level and org user as of the last successful load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Roster {
    pub access_levels: Vec<AccessLevel>,
    pub org_users: Vec<OrgUser>,
}

impl Roster {
    #[must_use]
    pub const fn new(access_levels: Vec<AccessLevel>, org_users: Vec<OrgUser>) -> Self {
        Self {
            access_levels,
            org_users,
        }
    }

    /// Exact, case-sensitive email match.
    #[must_use]
    pub fn find_user_by_email(&self, email: &str) -> Option<&OrgUser> {
        self.org_users.iter().find(|user| user.email == email)
    }

    #[must_use]
    pub fn access_level(&self, id: &str) -> Option<&AccessLevel> {
        self.access_levels.iter().find(|level| level.id == id)
    }

    #[must_use]
    pub fn owner(&self) -> Option<&OrgUser> {
        self.org_users.iter().find(|user| user.is_owner)
    }

    /// Resolve an authenticated email against this roster.
    ///
    /// The access level comes from this roster's own list; the copy nested
    /// in the org user row is ignored since it may be older than the list.
    #[must_use]
    pub fn resolve(&self, email: Option<&str>) -> Resolution {
        let Some(user) = email.and_then(|email| self.find_user_by_email(email)) else {
            return Resolution::default();
        };
        let access_level = user
            .access_level_id
            .as_deref()
            .and_then(|id| self.access_level(id))
            .cloned();
        Resolution {
            current_user: Some(user.clone()),
            access_level,
        }
    }
}

/// The resolved authorization state of one identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub current_user: Option<OrgUser>,
    pub access_level: Option<AccessLevel>,
}

impl Resolution {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.access_level.as_ref().is_some_and(|level| level.is_admin)
    }

    #[must_use]
    pub fn is_owner(&self) -> bool {
        self.current_user.as_ref().is_some_and(|user| user.is_owner)
    }

    /// Whitelist of the resolved access level; empty when there is none.
    #[must_use]
    pub fn allowed_routes(&self) -> BTreeSet<Route> {
        self.access_level
            .as_ref()
            .map(|level| level.allowed_routes.clone())
            .unwrap_or_default()
    }

    /// Whether this identity may reach `route`.
    ///
    /// Only a non-admin access level restricts. A missing user, an owner,
    /// or a user without a resolvable level is unrestricted.
    #[must_use]
    pub fn can_access(&self, route: Route) -> bool {
        self.decide(Some(route))
    }

    /// [`Self::can_access`] for a raw path. A path that names no known route
    /// is only reachable through the unrestricted branches.
    #[must_use]
    pub fn can_access_path(&self, path: &str) -> bool {
        self.decide(Route::from_path(path))
    }

    fn decide(&self, route: Option<Route>) -> bool {
        let Some(user) = &self.current_user else {
            return true;
        };
        if user.is_owner {
            return true;
        }
        let Some(level) = &self.access_level else {
            return true;
        };
        level.is_admin || route.is_some_and(|route| level.permits(route))
    }
}
