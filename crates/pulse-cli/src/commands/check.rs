use std::sync::{Arc, Mutex};

use pulse_access::{GuardState, RouteGuard};
use pulse_core::Route;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CheckArgs;
use crate::commands::whoami::ResolvedIdentity;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct CheckResponse {
    path: String,
    can_access: bool,
    guard: GuardState,
    redirects: Vec<Route>,
    identity: ResolvedIdentity,
}

/// Handle `pulse check`.
pub fn handle(args: &CheckArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = evaluate(args, ctx);
    output(&response, flags.format)
}

fn evaluate(args: &CheckArgs, ctx: &AppContext) -> CheckResponse {
    let email = ctx.sign_in(args.email.as_deref());
    let state = ctx.access.snapshot();

    let redirects = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&redirects);
    let mut guard = RouteGuard::new(ctx.access.clone(), move |to: Route| {
        if let Ok(mut redirects) = sink.lock() {
            redirects.push(to);
        }
    });
    let guard_state = guard.navigate(args.path.as_str()).clone();
    let redirects = redirects.lock().map(|r| r.clone()).unwrap_or_default();

    CheckResponse {
        path: args.path.clone(),
        can_access: state.can_access_path(&args.path),
        guard: guard_state,
        redirects,
        identity: ResolvedIdentity::from_state(email, &state),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use pulse_config::PulseConfig;
    use pulse_core::entities::{NewAccessLevel, NewOrgUser};

    use super::*;
    use crate::cli::{GlobalFlags, OutputFormat};

    async fn viewer_ctx(dir: &tempfile::TempDir) -> AppContext {
        let flags = GlobalFlags {
            format: OutputFormat::Raw,
            database: Some(dir.path().join("pulse.db").to_string_lossy().into_owned()),
        };
        let ctx = AppContext::init(PulseConfig::default(), &flags).await.unwrap();
        let viewer = ctx
            .access
            .create_access_level(&NewAccessLevel::new("Viewer").routes([Route::Overview]))
            .await
            .unwrap();
        ctx.access
            .create_org_user(&NewOrgUser::invite("a@x.com").access_level_id(Some(viewer.id)))
            .await
            .unwrap();
        ctx
    }

    fn args(email: &str, path: &str) -> CheckArgs {
        CheckArgs {
            email: Some(email.into()),
            path: path.into(),
        }
    }

    #[tokio::test]
    async fn viewer_is_redirected_from_campaigns() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = viewer_ctx(&dir).await;
        let response = evaluate(&args("a@x.com", "/campanhas"), &ctx);

        assert!(!response.can_access);
        assert_eq!(response.redirects, vec![Route::Overview]);
        assert!(matches!(response.guard, GuardState::Allowed { ref path, .. } if path == "/"));
        // Public routes are the guard's concern, not the whitelist's.
        assert_eq!(response.identity.reachable_routes, vec![Route::Overview]);
    }

    #[tokio::test]
    async fn stranger_passes_as_first_time_setup() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = viewer_ctx(&dir).await;
        let response = evaluate(&args("stranger@x.com", "/acessos"), &ctx);

        assert!(response.can_access);
        assert!(response.redirects.is_empty());
        assert!(response.identity.current_user.is_none());
    }
}
