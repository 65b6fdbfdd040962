//! Access-control policy configuration.

use serde::{Deserialize, Serialize};

/// What an unresolved identity may reach while the roster failed to load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadFailurePolicy {
    /// Treat a failed load like an unconfigured organization: allow.
    #[default]
    FailOpen,
    /// Deny every non-public route until a load succeeds.
    FailClosed,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AccessConfig {
    #[serde(default)]
    pub load_failure_policy: LoadFailurePolicy,
}
