//! Navigation-time enforcement.
//!
//! A [`RouteGuard`] sits in front of the protected application shell. Every
//! path change goes through [`RouteGuard::navigate`]; nothing may render
//! until the guard reports [`GuardState::Allowed`].
//!
//! ```text
//! Loading ──settled──▶ Evaluating ──permitted──▶ Allowed
//!                          ▲   │
//!                          │   └──denied──▶ Redirecting ──▶ (root path)
//!                          └────────────────────┘
//! ```
//!
//! A denied root route settles in `Denied` instead of looping.

use pulse_core::Route;
use serde::Serialize;
use tracing::{debug, warn};

use crate::context::AccessContext;
use crate::engine::AccessState;

/// Performs the navigation side effect of a redirect.
pub trait Navigator: Send + Sync {
    fn redirect(&self, to: Route);
}

impl<F> Navigator for F
where
    F: Fn(Route) + Send + Sync,
{
    fn redirect(&self, to: Route) {
        self(to);
    }
}

/// Which permissive branch let a navigation through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowReason {
    PublicRoute,
    /// No roster entry for the identity: the organization is still being set up.
    FirstTimeSetup,
    Admin,
    /// `can_access` said yes (owner, unassigned level, or whitelisted).
    Permitted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GuardState {
    /// Roster or identity not known yet. Render a placeholder only.
    Loading,
    Evaluating { path: String },
    Allowed { path: String, reason: AllowReason },
    Redirecting { from: String, to: Route },
    Denied { path: String },
}

/// Decide a single path against one state snapshot.
///
/// `None` means the path must not render.
#[must_use]
pub fn evaluate(state: &AccessState, path: &str) -> Option<AllowReason> {
    if Route::from_path(path).is_some_and(Route::is_public) {
        return Some(AllowReason::PublicRoute);
    }
    if state.resolution.current_user.is_none() && !state.is_fail_closed() {
        return Some(AllowReason::FirstTimeSetup);
    }
    if state.resolution.is_admin() {
        return Some(AllowReason::Admin);
    }
    state
        .can_access_path(path)
        .then_some(AllowReason::Permitted)
}

pub struct RouteGuard<N> {
    access: AccessContext,
    navigator: N,
    state: GuardState,
    /// Last requested path, replayed once the engine settles.
    path: Option<String>,
}

impl<N: Navigator> RouteGuard<N> {
    #[must_use]
    pub const fn new(access: AccessContext, navigator: N) -> Self {
        Self {
            access,
            navigator,
            state: GuardState::Loading,
            path: None,
        }
    }

    #[must_use]
    pub const fn access(&self) -> &AccessContext {
        &self.access
    }

    #[must_use]
    pub const fn state(&self) -> &GuardState {
        &self.state
    }

    /// Whether the protected content may be shown.
    #[must_use]
    pub const fn should_render(&self) -> bool {
        matches!(self.state, GuardState::Allowed { .. })
    }

    /// Handle a path change.
    ///
    /// While the engine is still loading the path is remembered and the
    /// guard stays in `Loading`; call [`Self::ready`] to resume.
    pub fn navigate(&mut self, path: impl Into<String>) -> &GuardState {
        let path = path.into();
        self.path = Some(path.clone());
        let snapshot = self.access.snapshot();
        if !snapshot.is_settled() {
            debug!(path = %path, "navigation deferred until access state settles");
            self.state = GuardState::Loading;
            return &self.state;
        }
        self.run(path, &snapshot);
        &self.state
    }

    /// Wait for the engine to settle, then evaluate the remembered path.
    pub async fn ready(&mut self) -> &GuardState {
        let mut rx = self.access.subscribe();
        if rx.wait_for(AccessState::is_settled).await.is_err() {
            return &self.state;
        }
        self.reevaluate()
    }

    /// Evaluate the remembered path again, e.g. after a roster reload.
    pub fn reevaluate(&mut self) -> &GuardState {
        match self.path.clone() {
            Some(path) => self.navigate(path),
            None => &self.state,
        }
    }

    fn run(&mut self, mut path: String, snapshot: &AccessState) {
        loop {
            self.state = GuardState::Evaluating { path: path.clone() };
            if let Some(reason) = evaluate(snapshot, &path) {
                debug!(path = %path, ?reason, "navigation allowed");
                self.state = GuardState::Allowed { path, reason };
                return;
            }
            let root = Route::ROOT;
            if path == root.path() {
                warn!(path = %path, "root route denied, nowhere to redirect");
                self.state = GuardState::Denied { path };
                return;
            }
            debug!(from = %path, to = %root, "navigation denied, redirecting");
            self.state = GuardState::Redirecting {
                from: path,
                to: root,
            };
            self.navigator.redirect(root);
            path = root.path().to_string();
            self.path = Some(path.clone());
        }
    }
}
