//! Storage seam for the access-control roster.

mod db;
pub mod memory;

use async_trait::async_trait;
use pulse_core::entities::{AccessLevel, NewAccessLevel, NewOrgUser, OrgUser};
use pulse_db::updates::access_level::AccessLevelUpdate;
use pulse_db::updates::org_user::OrgUserUpdate;

use crate::error::StoreError;

pub use memory::MemoryStore;

/// Read/write operations the engine needs from the roster store.
///
/// `list_org_users` returns each user with its access level nested as the
/// store sees it; the engine treats that copy as a hint only.
#[async_trait]
pub trait AccessStore: Send + Sync {
    async fn list_access_levels(&self) -> Result<Vec<AccessLevel>, StoreError>;

    async fn list_org_users(&self) -> Result<Vec<OrgUser>, StoreError>;

    async fn insert_access_level(&self, input: &NewAccessLevel)
    -> Result<AccessLevel, StoreError>;

    async fn update_access_level(
        &self,
        id: &str,
        update: &AccessLevelUpdate,
    ) -> Result<(), StoreError>;

    async fn delete_access_level(&self, id: &str) -> Result<(), StoreError>;

    async fn insert_org_user(&self, input: &NewOrgUser) -> Result<OrgUser, StoreError>;

    async fn update_org_user(&self, id: &str, update: &OrgUserUpdate) -> Result<(), StoreError>;

    async fn delete_org_user(&self, id: &str) -> Result<(), StoreError>;
}
