//! Closed catalogue of dashboard routes.
//!
//! Every page the dashboard serves is a `Route` variant with exactly one path.
//! Path strings only exist at the edges (stored whitelists, navigation
//! input); everything past the boundary works with `Route`. Adding a page is
//! a new variant, and the exhaustive matches below force it to be wired up.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum Route {
    #[serde(rename = "/")]
    Overview,
    #[serde(rename = "/campanhas")]
    Campaigns,
    #[serde(rename = "/leads")]
    Leads,
    #[serde(rename = "/redes-sociais")]
    SocialMedia,
    #[serde(rename = "/relatorios")]
    Reports,
    #[serde(rename = "/agente-ia")]
    AiAgent,
    #[serde(rename = "/configuracoes")]
    Settings,
    #[serde(rename = "/acessos")]
    AccessAdmin,
    #[serde(rename = "/login")]
    Login,
    #[serde(rename = "/cadastro")]
    Signup,
    #[serde(rename = "/recuperar-senha")]
    ResetPassword,
    #[serde(rename = "/auth/callback")]
    AuthCallback,
}

impl Route {
    /// Redirect target for denied navigation.
    pub const ROOT: Self = Self::Overview;

    pub const ALL: &'static [Self] = &[
        Self::Overview,
        Self::Campaigns,
        Self::Leads,
        Self::SocialMedia,
        Self::Reports,
        Self::AiAgent,
        Self::Settings,
        Self::AccessAdmin,
        Self::Login,
        Self::Signup,
        Self::ResetPassword,
        Self::AuthCallback,
    ];

    /// Authentication pages, reachable without any authorization check.
    pub const PUBLIC: &'static [Self] = &[
        Self::Login,
        Self::Signup,
        Self::ResetPassword,
        Self::AuthCallback,
    ];

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Overview => "/",
            Self::Campaigns => "/campanhas",
            Self::Leads => "/leads",
            Self::SocialMedia => "/redes-sociais",
            Self::Reports => "/relatorios",
            Self::AiAgent => "/agente-ia",
            Self::Settings => "/configuracoes",
            Self::AccessAdmin => "/acessos",
            Self::Login => "/login",
            Self::Signup => "/cadastro",
            Self::ResetPassword => "/recuperar-senha",
            Self::AuthCallback => "/auth/callback",
        }
    }

    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(
            self,
            Self::Login | Self::Signup | Self::ResetPassword | Self::AuthCallback
        )
    }

    /// Look up a route by its exact path. No trailing-slash or case folding.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|route| route.path() == path)
    }
}

impl FromStr for Route {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_path(s).ok_or_else(|| CoreError::UnknownRoute(s.to_string()))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
