//! In-process `AccessStore` for tests, demos, and offline runs.
//!
//! Mirrors the libSQL store's observable behavior: unique emails, no
//! cascade when an access level is deleted, nested access level resolved at
//! read time. Reads and writes can be made to fail on demand.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use pulse_core::entities::{AccessLevel, NewAccessLevel, NewOrgUser, OrgUser};
use pulse_core::ids::{PREFIX_ACCESS_LEVEL, PREFIX_ORG_USER};
use pulse_db::updates::access_level::AccessLevelUpdate;
use pulse_db::updates::org_user::OrgUserUpdate;
use tokio::sync::Mutex;

use super::AccessStore;
use crate::error::StoreError;

#[derive(Default)]
struct Tables {
    access_levels: Vec<AccessLevel>,
    org_users: Vec<OrgUser>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    next_id: AtomicU32,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    list_calls: AtomicUsize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every list call fail until reset.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every insert/update/delete fail until reset.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of list calls served so far (both entity kinds).
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn next_id(&self, prefix: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{prefix}-{n:08x}")
    }

    fn check_read(&self) -> Result<(), StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store: reads disabled".into()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store: writes disabled".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl AccessStore for MemoryStore {
    async fn list_access_levels(&self) -> Result<Vec<AccessLevel>, StoreError> {
        self.check_read()?;
        Ok(self.tables.lock().await.access_levels.clone())
    }

    async fn list_org_users(&self) -> Result<Vec<OrgUser>, StoreError> {
        self.check_read()?;
        let tables = self.tables.lock().await;
        Ok(tables
            .org_users
            .iter()
            .map(|user| OrgUser {
                access_level: user.access_level_id.as_deref().and_then(|id| {
                    tables
                        .access_levels
                        .iter()
                        .find(|level| level.id == id)
                        .cloned()
                }),
                ..user.clone()
            })
            .collect())
    }

    async fn insert_access_level(
        &self,
        input: &NewAccessLevel,
    ) -> Result<AccessLevel, StoreError> {
        self.check_write()?;
        input
            .validate()
            .map_err(|e| StoreError::Rejected(e.to_string()))?;
        let now = Utc::now();
        let level = AccessLevel {
            id: self.next_id(PREFIX_ACCESS_LEVEL),
            name: input.name.clone(),
            description: input.description.clone(),
            allowed_routes: input.allowed_routes.clone(),
            is_admin: input.is_admin,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().await.access_levels.push(level.clone());
        Ok(level)
    }

    async fn update_access_level(
        &self,
        id: &str,
        update: &AccessLevelUpdate,
    ) -> Result<(), StoreError> {
        self.check_write()?;
        let mut tables = self.tables.lock().await;
        let level = tables
            .access_levels
            .iter_mut()
            .find(|level| level.id == id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "access level",
                id: id.to_string(),
            })?;
        if let Some(ref name) = update.name {
            if name.trim().is_empty() {
                return Err(StoreError::Rejected(
                    "access level name must not be empty".into(),
                ));
            }
            level.name.clone_from(name);
        }
        if let Some(ref description) = update.description {
            level.description.clone_from(description);
        }
        if let Some(ref routes) = update.allowed_routes {
            level.allowed_routes.clone_from(routes);
        }
        if let Some(is_admin) = update.is_admin {
            level.is_admin = is_admin;
        }
        if !update.is_empty() {
            level.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete_access_level(&self, id: &str) -> Result<(), StoreError> {
        self.check_write()?;
        self.tables
            .lock()
            .await
            .access_levels
            .retain(|level| level.id != id);
        Ok(())
    }

    async fn insert_org_user(&self, input: &NewOrgUser) -> Result<OrgUser, StoreError> {
        self.check_write()?;
        input
            .validate()
            .map_err(|e| StoreError::Rejected(e.to_string()))?;
        let mut tables = self.tables.lock().await;
        if tables.org_users.iter().any(|user| user.email == input.email) {
            return Err(StoreError::Rejected(format!(
                "email '{}' already in roster",
                input.email
            )));
        }
        let now = Utc::now();
        let user = OrgUser {
            id: self.next_id(PREFIX_ORG_USER),
            auth_user_id: None,
            email: input.email.clone(),
            name: input.name.clone(),
            access_level_id: input.access_level_id.clone(),
            access_level: None,
            is_owner: input.is_owner,
            created_at: now,
            updated_at: now,
        };
        tables.org_users.push(user.clone());
        Ok(OrgUser {
            access_level: user.access_level_id.as_deref().and_then(|id| {
                tables
                    .access_levels
                    .iter()
                    .find(|level| level.id == id)
                    .cloned()
            }),
            ..user
        })
    }

    async fn update_org_user(&self, id: &str, update: &OrgUserUpdate) -> Result<(), StoreError> {
        self.check_write()?;
        let mut tables = self.tables.lock().await;
        let user = tables
            .org_users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "org user",
                id: id.to_string(),
            })?;
        if let Some(ref name) = update.name {
            user.name.clone_from(name);
        }
        if let Some(ref access_level_id) = update.access_level_id {
            user.access_level_id.clone_from(access_level_id);
        }
        if !update.is_empty() {
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete_org_user(&self, id: &str) -> Result<(), StoreError> {
        self.check_write()?;
        self.tables.lock().await.org_users.retain(|user| user.id != id);
        Ok(())
    }
}
