//! Org user update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrgUserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_level_id: Option<Option<String>>,
}

impl OrgUserUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.access_level_id.is_none()
    }
}

#[derive(Default)]
pub struct OrgUserUpdateBuilder(OrgUserUpdate);

impl OrgUserUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(OrgUserUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: Option<String>) -> Self {
        self.0.name = Some(name);
        self
    }

    /// Assign (`Some`) or clear (`None`) the user's access level.
    #[must_use]
    pub fn access_level_id(mut self, access_level_id: Option<String>) -> Self {
        self.0.access_level_id = Some(access_level_id);
        self
    }

    #[must_use]
    pub fn build(self) -> OrgUserUpdate {
        self.0
    }
}
