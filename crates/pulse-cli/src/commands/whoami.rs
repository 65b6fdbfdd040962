use std::collections::BTreeSet;

use pulse_access::AccessState;
use pulse_core::Route;
use pulse_core::entities::{AccessLevel, OrgUser};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::WhoamiArgs;
use crate::context::AppContext;
use crate::output::output;

/// Resolved access state of one identity, as shown by `whoami` and `check`.
#[derive(Debug, Serialize)]
pub struct ResolvedIdentity {
    pub email: Option<String>,
    pub current_user: Option<OrgUser>,
    pub access_level: Option<AccessLevel>,
    pub is_admin: bool,
    pub is_owner: bool,
    pub allowed_routes: BTreeSet<Route>,
    /// Every route `can_access` says yes to.
    pub reachable_routes: Vec<Route>,
    pub error: Option<String>,
}

impl ResolvedIdentity {
    pub fn from_state(email: Option<String>, state: &AccessState) -> Self {
        Self {
            email,
            current_user: state.resolution.current_user.clone(),
            access_level: state.resolution.access_level.clone(),
            is_admin: state.resolution.is_admin(),
            is_owner: state.resolution.is_owner(),
            allowed_routes: state.resolution.allowed_routes(),
            reachable_routes: Route::ALL
                .iter()
                .copied()
                .filter(|route| state.can_access(*route))
                .collect(),
            error: state.error.clone(),
        }
    }
}

/// Handle `pulse whoami`.
pub fn handle(args: &WhoamiArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let email = ctx.sign_in(args.email.as_deref());
    let state = ctx.access.snapshot();
    output(&ResolvedIdentity::from_state(email, &state), flags.format)
}
