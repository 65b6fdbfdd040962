//! Application-scoped access to the engine.
//!
//! `AccessContext` is a cheap, cloneable handle to one [`AccessControl`].
//! Build it once at startup and either pass it to consumers directly or
//! install it for a task with [`AccessContext::scope`], after which any code
//! running inside that future can reach it with [`AccessContext::current`].
//!
//! Tokio task-locals are not inherited by spawned tasks; wrap the spawned
//! future in `scope` again to carry the context across.

use std::future::Future;
use std::ops::Deref;
use std::sync::Arc;

use pulse_config::AccessConfig;
use pulse_core::identity::AuthStatus;
use tokio::task::futures::TaskLocalFuture;
use tokio::task_local;

use crate::engine::AccessControl;
use crate::error::AccessError;
use crate::store::AccessStore;

task_local! {
    static CURRENT: AccessContext;
}

#[derive(Clone)]
pub struct AccessContext {
    inner: Arc<AccessControl>,
}

impl AccessContext {
    #[must_use]
    pub fn new(control: AccessControl) -> Self {
        Self {
            inner: Arc::new(control),
        }
    }

    /// Build the engine for `auth` and perform the initial load.
    pub async fn provide(
        store: Arc<dyn AccessStore>,
        config: &AccessConfig,
        auth: AuthStatus,
    ) -> Self {
        let control = AccessControl::new(store, config);
        control.set_auth(auth);
        control.refresh().await;
        Self::new(control)
    }

    /// Run `fut` with this context installed as the current one.
    ///
    /// The returned future owns its handle, so it can be spawned.
    pub fn scope<F>(&self, fut: F) -> TaskLocalFuture<Self, F>
    where
        F: Future,
    {
        CURRENT.scope(self.clone(), fut)
    }

    /// The context installed by the nearest enclosing [`Self::scope`].
    ///
    /// # Errors
    ///
    /// Returns `AccessError::MissingProvider` when called outside any scope.
    pub fn current() -> Result<Self, AccessError> {
        CURRENT
            .try_with(Clone::clone)
            .map_err(|_| AccessError::MissingProvider)
    }

    /// Whether two handles share one engine.
    #[must_use]
    pub fn same_engine(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Deref for AccessContext {
    type Target = AccessControl;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl std::fmt::Debug for AccessContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.snapshot();
        f.debug_struct("AccessContext")
            .field("is_loading", &state.is_loading)
            .field("error", &state.error)
            .field("current_user", &state.resolution.current_user.as_ref().map(|u| u.email.as_str()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use pulse_core::Route;
    use pulse_core::entities::{NewAccessLevel, NewOrgUser};
    use pulse_core::identity::AuthIdentity;

    use super::*;
    use crate::store::MemoryStore;

    async fn context() -> AccessContext {
        let store = Arc::new(MemoryStore::new());
        let level = store
            .insert_access_level(&NewAccessLevel::new("Viewer").routes([Route::Overview]))
            .await
            .unwrap();
        store
            .insert_org_user(&NewOrgUser::invite("a@x.com").access_level_id(Some(level.id)))
            .await
            .unwrap();
        AccessContext::provide(
            store,
            &AccessConfig::default(),
            AuthStatus::SignedIn(AuthIdentity::new("auth|a", "a@x.com")),
        )
        .await
    }

    #[tokio::test]
    async fn current_outside_scope_is_missing_provider() {
        assert!(matches!(
            AccessContext::current(),
            Err(AccessError::MissingProvider)
        ));
    }

    #[tokio::test]
    async fn current_inside_scope_is_the_same_engine() {
        let ctx = context().await;
        let found = ctx
            .scope(async { AccessContext::current() })
            .await
            .unwrap();
        assert!(found.same_engine(&ctx));
        assert!(!found.can_access(Route::Campaigns));
    }

    #[tokio::test]
    async fn spawned_tasks_need_their_own_scope() {
        let ctx = context().await;
        let (bare, scoped) = ctx
            .scope(async {
                let inner = AccessContext::current().unwrap();
                let bare = tokio::spawn(async { AccessContext::current().is_ok() });
                let scoped = tokio::spawn(inner.scope(async { AccessContext::current().is_ok() }));
                (bare.await.unwrap(), scoped.await.unwrap())
            })
            .await;
        assert!(!bare);
        assert!(scoped);
    }

    #[tokio::test]
    async fn provide_loads_immediately() {
        let ctx = context().await;
        assert!(!ctx.is_loading());
        assert_eq!(ctx.org_users().len(), 1);
        assert_eq!(
            ctx.current_user().map(|u| u.email).as_deref(),
            Some("a@x.com")
        );
    }

    #[tokio::test]
    async fn clones_share_state() {
        let ctx = context().await;
        let other = ctx.clone();
        ctx.create_access_level(&NewAccessLevel::new("Marketing"))
            .await
            .unwrap();
        assert_eq!(other.access_levels().len(), 2);
    }
}
