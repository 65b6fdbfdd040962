//! General application configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Identity the CLI acts as when `--email` is not given.
    #[serde(default)]
    pub owner_email: String,
}

impl GeneralConfig {
    #[must_use]
    pub fn owner_email(&self) -> Option<&str> {
        (!self.owner_email.is_empty()).then_some(self.owner_email.as_str())
    }
}
