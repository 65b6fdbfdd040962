//! `AccessStore` over the libSQL roster database (`PulseDb`).

use async_trait::async_trait;
use pulse_core::entities::{AccessLevel, NewAccessLevel, NewOrgUser, OrgUser};
use pulse_db::PulseDb;
use pulse_db::error::DatabaseError;
use pulse_db::updates::access_level::AccessLevelUpdate;
use pulse_db::updates::org_user::OrgUserUpdate;

use super::AccessStore;
use crate::error::StoreError;

fn not_found(entity: &'static str, id: &str) -> impl FnOnce(DatabaseError) -> StoreError {
    move |error| match error {
        DatabaseError::NoResult => StoreError::NotFound {
            entity,
            id: id.to_string(),
        },
        other => other.into(),
    }
}

#[async_trait]
impl AccessStore for PulseDb {
    async fn list_access_levels(&self) -> Result<Vec<AccessLevel>, StoreError> {
        Ok(PulseDb::list_access_levels(self).await?)
    }

    async fn list_org_users(&self) -> Result<Vec<OrgUser>, StoreError> {
        Ok(PulseDb::list_org_users(self).await?)
    }

    async fn insert_access_level(
        &self,
        input: &NewAccessLevel,
    ) -> Result<AccessLevel, StoreError> {
        Ok(self.create_access_level(input).await?)
    }

    async fn update_access_level(
        &self,
        id: &str,
        update: &AccessLevelUpdate,
    ) -> Result<(), StoreError> {
        PulseDb::update_access_level(self, id, update)
            .await
            .map_err(not_found("access level", id))?;
        Ok(())
    }

    async fn delete_access_level(&self, id: &str) -> Result<(), StoreError> {
        Ok(PulseDb::delete_access_level(self, id).await?)
    }

    async fn insert_org_user(&self, input: &NewOrgUser) -> Result<OrgUser, StoreError> {
        Ok(self.create_org_user(input).await?)
    }

    async fn update_org_user(&self, id: &str, update: &OrgUserUpdate) -> Result<(), StoreError> {
        PulseDb::update_org_user(self, id, update)
            .await
            .map_err(not_found("org user", id))?;
        Ok(())
    }

    async fn delete_org_user(&self, id: &str) -> Result<(), StoreError> {
        Ok(PulseDb::delete_org_user(self, id).await?)
    }
}
