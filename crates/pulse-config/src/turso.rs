//! Turso/libSQL configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TursoConfig {
    /// Database URL (e.g., `libsql://pulse-agencia.turso.io`).
    #[serde(default)]
    pub url: String,

    /// Database auth token.
    #[serde(default)]
    pub auth_token: String,

    /// Local database file, used when no remote database is configured.
    #[serde(default)]
    pub local_path: String,
}

impl TursoConfig {
    /// Check if the Turso config has the minimum required fields for remote access.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.auth_token.is_empty()
    }

    #[must_use]
    pub fn has_local_path(&self) -> bool {
        !self.local_path.is_empty()
    }
}
