//! The access-control engine.
//!
//! `AccessControl` owns the roster snapshot and the resolved identity. State
//! lives in a `watch` channel: readers clone a cheap [`AccessState`] (the
//! roster is behind an `Arc`), every load replaces it in a single
//! `send_modify`, and subscribers such as the route guard wake on change.
//!
//! Loads never fail from the caller's point of view. A failed load is
//! recorded in [`AccessState::error`] and the identity resolves to nobody
//! until the next successful load. Mutations write through the store,
//! surface store failures to the caller, and always finish with a full
//! reload.

use std::collections::BTreeSet;
use std::sync::Arc;

use pulse_config::{AccessConfig, LoadFailurePolicy};
use pulse_core::Route;
use pulse_core::entities::{AccessLevel, NewAccessLevel, NewOrgUser, OrgUser};
use pulse_core::identity::AuthStatus;
use pulse_db::updates::access_level::AccessLevelUpdate;
use pulse_db::updates::org_user::OrgUserUpdate;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::AccessError;
use crate::roster::{Resolution, Roster};
use crate::store::AccessStore;

/// Point-in-time view of the engine.
#[derive(Debug, Clone)]
pub struct AccessState {
    pub roster: Arc<Roster>,
    pub resolution: Resolution,
    pub auth: AuthStatus,
    /// True until the first load completes, successful or not.
    pub is_loading: bool,
    /// Message of the last failed load; cleared by the next successful one.
    pub error: Option<String>,
    pub policy: LoadFailurePolicy,
}

impl AccessState {
    fn initial(policy: LoadFailurePolicy) -> Self {
        Self {
            roster: Arc::default(),
            resolution: Resolution::default(),
            auth: AuthStatus::default(),
            is_loading: true,
            error: None,
            policy,
        }
    }

    /// Both the roster and the identity are known.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.is_loading && !self.auth.is_loading()
    }

    /// The roster failed to load, nobody is resolved, and policy says deny.
    #[must_use]
    pub fn is_fail_closed(&self) -> bool {
        self.policy == LoadFailurePolicy::FailClosed
            && self.error.is_some()
            && self.resolution.current_user.is_none()
    }

    #[must_use]
    pub fn can_access(&self, route: Route) -> bool {
        if self.is_fail_closed() {
            return route.is_public();
        }
        self.resolution.can_access(route)
    }

    #[must_use]
    pub fn can_access_path(&self, path: &str) -> bool {
        if self.is_fail_closed() {
            return Route::from_path(path).is_some_and(Route::is_public);
        }
        self.resolution.can_access_path(path)
    }
}

pub struct AccessControl {
    store: Arc<dyn AccessStore>,
    state: watch::Sender<AccessState>,
}

impl AccessControl {
    /// Build an engine over `store`. Nothing is loaded until [`Self::refresh`].
    #[must_use]
    pub fn new(store: Arc<dyn AccessStore>, config: &AccessConfig) -> Self {
        let (state, _) = watch::channel(AccessState::initial(config.load_failure_policy));
        Self { store, state }
    }

    /// Receiver that observes every state replacement.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AccessState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> AccessState {
        self.state.borrow().clone()
    }

    /// Replace the authenticated identity and re-resolve against the
    /// current roster.
    pub fn set_auth(&self, auth: AuthStatus) {
        self.state.send_modify(|state| {
            state.resolution = if state.error.is_some() {
                Resolution::default()
            } else {
                state.roster.resolve(auth.email())
            };
            state.auth = auth;
        });
    }

    /// Reload both entity lists and re-resolve the identity.
    ///
    /// On failure the previous lists are kept for display, the identity
    /// resolves to nobody, and the error message is recorded.
    pub async fn refresh(&self) {
        debug!("loading access roster");
        let loaded = tokio::try_join!(self.store.list_access_levels(), self.store.list_org_users());
        match loaded {
            Ok((access_levels, org_users)) => {
                let roster = Arc::new(Roster::new(access_levels, org_users));
                self.state.send_modify(|state| {
                    state.resolution = roster.resolve(state.auth.email());
                    debug!(
                        access_levels = roster.access_levels.len(),
                        org_users = roster.org_users.len(),
                        resolved = state.resolution.current_user.is_some(),
                        "access roster loaded"
                    );
                    state.roster = roster;
                    state.is_loading = false;
                    state.error = None;
                });
            }
            Err(error) => {
                warn!(%error, "failed to load access roster");
                self.state.send_modify(|state| {
                    state.resolution = Resolution::default();
                    state.is_loading = false;
                    state.error = Some(error.to_string());
                });
            }
        }
    }

    // --- Read side ---

    #[must_use]
    pub fn roster(&self) -> Arc<Roster> {
        Arc::clone(&self.state.borrow().roster)
    }

    #[must_use]
    pub fn current_user(&self) -> Option<OrgUser> {
        self.state.borrow().resolution.current_user.clone()
    }

    #[must_use]
    pub fn access_level(&self) -> Option<AccessLevel> {
        self.state.borrow().resolution.access_level.clone()
    }

    #[must_use]
    pub fn allowed_routes(&self) -> BTreeSet<Route> {
        self.state.borrow().resolution.allowed_routes()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.state.borrow().resolution.is_admin()
    }

    #[must_use]
    pub fn is_owner(&self) -> bool {
        self.state.borrow().resolution.is_owner()
    }

    #[must_use]
    pub fn access_levels(&self) -> Vec<AccessLevel> {
        self.state.borrow().roster.access_levels.clone()
    }

    #[must_use]
    pub fn org_users(&self) -> Vec<OrgUser> {
        self.state.borrow().roster.org_users.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    #[must_use]
    pub fn can_access(&self, route: Route) -> bool {
        self.state.borrow().can_access(route)
    }

    #[must_use]
    pub fn can_access_path(&self, path: &str) -> bool {
        self.state.borrow().can_access_path(path)
    }

    // --- Write side ---

    /// # Errors
    ///
    /// Returns `AccessError::Store` if the store rejects the insert.
    pub async fn create_access_level(
        &self,
        input: &NewAccessLevel,
    ) -> Result<AccessLevel, AccessError> {
        let level = self.store.insert_access_level(input).await?;
        info!(id = %level.id, name = %level.name, is_admin = level.is_admin, "created access level");
        self.refresh().await;
        Ok(level)
    }

    /// # Errors
    ///
    /// Returns `AccessError::Store` for an unknown id or a rejected update.
    pub async fn update_access_level(
        &self,
        id: &str,
        update: &AccessLevelUpdate,
    ) -> Result<(), AccessError> {
        self.store.update_access_level(id, update).await?;
        info!(id, "updated access level");
        self.refresh().await;
        Ok(())
    }

    /// Delete an access level. Users holding it become unrestricted.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::Store` if the store call fails.
    pub async fn delete_access_level(&self, id: &str) -> Result<(), AccessError> {
        self.store.delete_access_level(id).await?;
        info!(id, "deleted access level");
        self.refresh().await;
        Ok(())
    }

    /// Add a user to the roster (invite).
    ///
    /// # Errors
    ///
    /// Returns `AccessError::Store` for a duplicate or malformed email.
    pub async fn create_org_user(&self, input: &NewOrgUser) -> Result<OrgUser, AccessError> {
        let user = self.store.insert_org_user(input).await?;
        info!(id = %user.id, email = %user.email, is_owner = user.is_owner, "created org user");
        self.refresh().await;
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns `AccessError::Store` for an unknown id or a rejected update.
    pub async fn update_org_user(&self, id: &str, update: &OrgUserUpdate) -> Result<(), AccessError> {
        self.store.update_org_user(id, update).await?;
        info!(id, "updated org user");
        self.refresh().await;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `AccessError::Store` if the store call fails.
    pub async fn delete_org_user(&self, id: &str) -> Result<(), AccessError> {
        self.store.delete_org_user(id).await?;
        info!(id, "deleted org user");
        self.refresh().await;
        Ok(())
    }

    /// Create the organization owner if the roster is empty.
    ///
    /// Reads the store directly rather than the snapshot so a failed earlier
    /// load cannot cause a second owner, and so the outcome reflects what
    /// the store holds.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::Store` if the store cannot be read or written.
    pub async fn bootstrap_owner(
        &self,
        email: &str,
        name: Option<String>,
    ) -> Result<Bootstrap, AccessError> {
        let users = self.store.list_org_users().await?;
        if !users.is_empty() {
            let owner = users.into_iter().find(|user| user.is_owner);
            debug!(has_owner = owner.is_some(), "roster not empty, skipping owner bootstrap");
            return Ok(owner.map_or(Bootstrap::NoOwner, Bootstrap::Existing));
        }
        let owner = self
            .store
            .insert_org_user(&NewOrgUser::owner(email).name(name))
            .await?;
        info!(id = %owner.id, email = %owner.email, "bootstrapped organization owner");
        self.refresh().await;
        Ok(Bootstrap::Created(owner))
    }
}

/// Outcome of [`AccessControl::bootstrap_owner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bootstrap {
    /// The roster was empty and the owner was created.
    Created(OrgUser),
    /// The roster already had an owner; nothing was written.
    Existing(OrgUser),
    /// The roster has users but none of them is the owner.
    NoOwner,
}

impl Bootstrap {
    #[must_use]
    pub const fn owner(&self) -> Option<&OrgUser> {
        match self {
            Self::Created(owner) | Self::Existing(owner) => Some(owner),
            Self::NoOwner => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use pulse_core::identity::AuthIdentity;
    use pulse_db::updates::access_level::AccessLevelUpdateBuilder;
    use pulse_db::updates::org_user::OrgUserUpdateBuilder;
    use rstest::rstest;

    use super::*;
    use crate::error::StoreError;
    use crate::store::MemoryStore;

    fn signed_in(email: &str) -> AuthStatus {
        AuthStatus::SignedIn(AuthIdentity::new(format!("auth|{email}"), email))
    }

    fn engine(store: &Arc<MemoryStore>) -> AccessControl {
        AccessControl::new(store.clone(), &AccessConfig::default())
    }

    /// Viewer level (root only) assigned to `a@x.com`, signed in as them.
    async fn viewer_engine() -> (Arc<MemoryStore>, AccessControl, AccessLevel) {
        let store = Arc::new(MemoryStore::new());
        let viewer = store
            .insert_access_level(&NewAccessLevel::new("Viewer").routes([Route::Overview]))
            .await
            .unwrap();
        store
            .insert_org_user(&NewOrgUser::invite("a@x.com").access_level_id(Some(viewer.id.clone())))
            .await
            .unwrap();
        let engine = engine(&store);
        engine.set_auth(signed_in("a@x.com"));
        engine.refresh().await;
        (store, engine, viewer)
    }

    #[tokio::test]
    async fn starts_loading_until_first_refresh() {
        let store = Arc::new(MemoryStore::new());
        let engine = engine(&store);
        assert!(engine.is_loading());
        engine.refresh().await;
        assert!(!engine.is_loading());
        assert_eq!(engine.error(), None);
    }

    #[tokio::test]
    async fn viewer_scenario() {
        let (_store, engine, viewer) = viewer_engine().await;
        assert_eq!(engine.current_user().map(|u| u.email), Some("a@x.com".into()));
        assert_eq!(engine.access_level(), Some(viewer));
        assert!(!engine.can_access(Route::Campaigns));
        assert!(engine.can_access(Route::Overview));
        assert!(!engine.can_access_path("/campanhas"));
        assert!(!engine.is_admin());
        assert!(!engine.is_owner());
    }

    #[rstest]
    #[case::owner(NewOrgUser::owner("o@x.com"), None)]
    #[case::unassigned(NewOrgUser::invite("o@x.com"), None)]
    #[case::admin(NewOrgUser::invite("o@x.com"), Some(true))]
    #[tokio::test]
    async fn unrestricted_identities_reach_every_route(
        #[case] user: NewOrgUser,
        #[case] admin_level: Option<bool>,
    ) {
        let store = Arc::new(MemoryStore::new());
        let user = match admin_level {
            Some(is_admin) => {
                let level = store
                    .insert_access_level(&NewAccessLevel::new("Admin").admin(is_admin))
                    .await
                    .unwrap();
                user.access_level_id(Some(level.id))
            }
            None => user,
        };
        store.insert_org_user(&user).await.unwrap();

        let engine = engine(&store);
        engine.set_auth(signed_in("o@x.com"));
        engine.refresh().await;

        assert!(engine.current_user().is_some());
        for route in Route::ALL {
            assert!(engine.can_access(*route), "{route} should be reachable");
        }
    }

    #[tokio::test]
    async fn unknown_identity_is_unrestricted() {
        let (_store, engine, _) = viewer_engine().await;
        engine.set_auth(signed_in("stranger@x.com"));
        assert!(engine.current_user().is_none());
        for route in Route::ALL {
            assert!(engine.can_access(*route));
        }
    }

    #[tokio::test]
    async fn refresh_twice_yields_equal_roster() {
        let (_store, engine, _) = viewer_engine().await;
        engine.refresh().await;
        let first = engine.roster();
        engine.refresh().await;
        assert_eq!(*first, *engine.roster());
    }

    #[tokio::test]
    async fn insert_then_refresh_round_trip() {
        let store = Arc::new(MemoryStore::new());
        let engine = engine(&store);
        engine.refresh().await;
        engine
            .create_access_level(
                &NewAccessLevel::new("Marketing")
                    .description("")
                    .routes([Route::Campaigns]),
            )
            .await
            .unwrap();
        engine.refresh().await;

        let levels = engine.access_levels();
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].name, "Marketing");
        assert_eq!(levels[0].description, None);
        assert_eq!(levels[0].allowed_routes, [Route::Campaigns].into_iter().collect());
        assert!(!levels[0].is_admin);
    }

    #[tokio::test]
    async fn mutations_reload_and_re_resolve() {
        let (_store, engine, viewer) = viewer_engine().await;
        assert!(!engine.can_access(Route::Reports));

        engine
            .update_access_level(
                &viewer.id,
                &AccessLevelUpdateBuilder::new()
                    .allowed_routes([Route::Overview, Route::Reports])
                    .build(),
            )
            .await
            .unwrap();
        assert!(engine.can_access(Route::Reports));

        let user_id = engine.current_user().unwrap().id;
        engine
            .update_org_user(&user_id, &OrgUserUpdateBuilder::new().access_level_id(None).build())
            .await
            .unwrap();
        assert!(engine.access_level().is_none());
        assert!(engine.can_access(Route::Campaigns));

        engine.delete_org_user(&user_id).await.unwrap();
        assert!(engine.current_user().is_none());
        assert!(engine.org_users().is_empty());
    }

    #[tokio::test]
    async fn deleting_referenced_level_falls_back_to_unrestricted() {
        let (_store, engine, viewer) = viewer_engine().await;
        engine.delete_access_level(&viewer.id).await.unwrap();

        let user = engine.current_user().unwrap();
        assert_eq!(user.access_level_id.as_deref(), Some(viewer.id.as_str()));
        assert!(engine.access_level().is_none());
        assert!(engine.can_access(Route::Campaigns));
    }

    #[tokio::test]
    async fn failed_mutation_leaves_roster_untouched() {
        let (store, engine, viewer) = viewer_engine().await;
        let before = engine.snapshot();
        store.set_fail_writes(true);

        let result = engine.create_access_level(&NewAccessLevel::new("Marketing")).await;
        assert!(matches!(result, Err(AccessError::Store(StoreError::Unavailable(_)))));
        let result = engine.delete_access_level(&viewer.id).await;
        assert!(result.is_err());

        let after = engine.snapshot();
        assert_eq!(*after.roster, *before.roster);
        assert_eq!(after.resolution, before.resolution);
        assert_eq!(after.error, None);
    }

    #[tokio::test]
    async fn update_of_unknown_id_propagates_not_found() {
        let (_store, engine, _) = viewer_engine().await;
        let result = engine
            .update_access_level("acl-missing", &AccessLevelUpdateBuilder::new().name("X").build())
            .await;
        assert!(matches!(
            result,
            Err(AccessError::Store(StoreError::NotFound { entity: "access level", .. }))
        ));
    }

    #[tokio::test]
    async fn load_failure_records_error_and_resolves_nobody() {
        let (store, engine, _) = viewer_engine().await;
        store.set_fail_reads(true);
        engine.refresh().await;

        let state = engine.snapshot();
        assert!(!state.is_loading);
        assert!(state.error.is_some());
        assert!(state.resolution.current_user.is_none());
        // Lists are still available for display.
        assert_eq!(state.roster.org_users.len(), 1);
        // Fail-open by default.
        assert!(engine.can_access(Route::Campaigns));

        // Re-auth does not resolve against a roster that failed to reload.
        engine.set_auth(signed_in("a@x.com"));
        assert!(engine.current_user().is_none());

        store.set_fail_reads(false);
        engine.refresh().await;
        assert_eq!(engine.error(), None);
        assert!(!engine.can_access(Route::Campaigns));
    }

    #[tokio::test]
    async fn reload_failure_after_write_does_not_fail_mutation() {
        let (store, engine, _) = viewer_engine().await;
        store.set_fail_reads(true);
        let level = engine
            .create_access_level(&NewAccessLevel::new("Marketing"))
            .await
            .unwrap();
        assert_eq!(level.name, "Marketing");
        assert!(engine.error().is_some());
    }

    #[tokio::test]
    async fn fail_closed_policy_denies_private_routes_on_load_failure() {
        let store = Arc::new(MemoryStore::new());
        store.set_fail_reads(true);
        let engine = AccessControl::new(
            store.clone(),
            &AccessConfig {
                load_failure_policy: LoadFailurePolicy::FailClosed,
            },
        );
        engine.set_auth(signed_in("a@x.com"));
        engine.refresh().await;

        assert!(!engine.can_access(Route::Overview));
        assert!(!engine.can_access_path("/legado"));
        assert!(engine.can_access(Route::Login));
        assert!(engine.can_access_path("/auth/callback"));

        store.set_fail_reads(false);
        engine.refresh().await;
        assert!(engine.can_access(Route::Overview));
    }

    #[tokio::test]
    async fn bootstrap_owner_only_on_empty_roster() {
        let store = Arc::new(MemoryStore::new());
        let engine = engine(&store);
        engine.set_auth(signed_in("boss@x.com"));
        engine.refresh().await;

        let Bootstrap::Created(owner) = engine
            .bootstrap_owner("boss@x.com", Some("Boss".into()))
            .await
            .unwrap()
        else {
            panic!("expected the owner to be created");
        };
        assert!(owner.is_owner);
        assert_eq!(owner.name.as_deref(), Some("Boss"));
        assert!(engine.is_owner());

        let again = engine.bootstrap_owner("other@x.com", None).await.unwrap();
        assert_eq!(again, Bootstrap::Existing(owner));
        assert_eq!(engine.org_users().len(), 1);
    }

    #[tokio::test]
    async fn bootstrap_owner_skips_roster_without_owner() {
        let (_store, engine, _) = viewer_engine().await;
        assert_eq!(
            engine.bootstrap_owner("boss@x.com", None).await.unwrap(),
            Bootstrap::NoOwner
        );
        assert_eq!(engine.org_users().len(), 1);
    }

    #[tokio::test]
    async fn bootstrap_owner_reports_existing_owner_when_snapshot_is_empty() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_org_user(&NewOrgUser::owner("boss@x.com"))
            .await
            .unwrap();
        store.set_fail_reads(true);
        let engine = engine(&store);
        engine.refresh().await;
        assert!(engine.error().is_some());
        assert!(engine.org_users().is_empty());

        store.set_fail_reads(false);
        let outcome = engine.bootstrap_owner("other@x.com", None).await.unwrap();
        assert!(matches!(&outcome, Bootstrap::Existing(owner) if owner.email == "boss@x.com"));
        assert_eq!(store.list_org_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn subscribers_see_each_load() {
        let store = Arc::new(MemoryStore::new());
        let engine = engine(&store);
        let mut rx = engine.subscribe();
        assert!(rx.borrow_and_update().is_loading);

        engine.refresh().await;
        assert!(rx.has_changed().unwrap());
        assert!(!rx.borrow_and_update().is_loading);
    }

    #[tokio::test]
    async fn load_fetches_both_lists() {
        let store = Arc::new(MemoryStore::new());
        let engine = engine(&store);
        engine.refresh().await;
        assert_eq!(store.list_calls(), 2);
    }

    /// Store whose nested access level disagrees with its level list.
    struct StaleNestedStore {
        level: AccessLevel,
        user: OrgUser,
    }

    #[async_trait]
    impl AccessStore for StaleNestedStore {
        async fn list_access_levels(&self) -> Result<Vec<AccessLevel>, StoreError> {
            Ok(vec![self.level.clone()])
        }
        async fn list_org_users(&self) -> Result<Vec<OrgUser>, StoreError> {
            Ok(vec![self.user.clone()])
        }
        async fn insert_access_level(&self, _: &NewAccessLevel) -> Result<AccessLevel, StoreError> {
            Err(StoreError::Rejected("read only".into()))
        }
        async fn update_access_level(&self, _: &str, _: &AccessLevelUpdate) -> Result<(), StoreError> {
            Err(StoreError::Rejected("read only".into()))
        }
        async fn delete_access_level(&self, _: &str) -> Result<(), StoreError> {
            Err(StoreError::Rejected("read only".into()))
        }
        async fn insert_org_user(&self, _: &NewOrgUser) -> Result<OrgUser, StoreError> {
            Err(StoreError::Rejected("read only".into()))
        }
        async fn update_org_user(&self, _: &str, _: &OrgUserUpdate) -> Result<(), StoreError> {
            Err(StoreError::Rejected("read only".into()))
        }
        async fn delete_org_user(&self, _: &str) -> Result<(), StoreError> {
            Err(StoreError::Rejected("read only".into()))
        }
    }

    #[tokio::test]
    async fn nested_level_from_store_is_not_authoritative() {
        let now = Utc::now();
        let level = AccessLevel {
            id: "acl-1".into(),
            name: "Viewer".into(),
            description: None,
            allowed_routes: [Route::Overview].into_iter().collect(),
            is_admin: false,
            created_at: now,
            updated_at: now,
        };
        let stale = AccessLevel {
            is_admin: true,
            ..level.clone()
        };
        let user = OrgUser {
            id: "usr-1".into(),
            auth_user_id: None,
            email: "a@x.com".into(),
            name: None,
            access_level_id: Some("acl-1".into()),
            access_level: Some(stale),
            is_owner: false,
            created_at: now,
            updated_at: now,
        };
        let engine = AccessControl::new(
            Arc::new(StaleNestedStore { level, user }),
            &AccessConfig::default(),
        );
        engine.set_auth(signed_in("a@x.com"));
        engine.refresh().await;

        assert!(!engine.is_admin());
        assert!(!engine.can_access(Route::Campaigns));
    }
}
