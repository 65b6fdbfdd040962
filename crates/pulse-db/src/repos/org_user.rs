//! Org user repository — CRUD, with the referenced access level joined in.

use chrono::Utc;

use pulse_core::entities::{NewOrgUser, OrgUser};
use pulse_core::ids::PREFIX_ORG_USER;

use crate::PulseDb;
use crate::error::DatabaseError;
use crate::helpers::{get_flag, get_opt_string, parse_datetime};
use crate::repos::access_level::row_to_access_level_at;
use crate::updates::org_user::OrgUserUpdate;

const INSERT_COLS: &str =
    "id, auth_user_id, email, name, access_level_id, is_owner, created_at, updated_at";

/// User columns followed by the joined access level columns (offset 8).
const SELECT_JOINED: &str = "SELECT u.id, u.auth_user_id, u.email, u.name, u.access_level_id,
        u.is_owner, u.created_at, u.updated_at,
        l.id, l.name, l.description, l.allowed_routes, l.is_admin, l.created_at, l.updated_at
     FROM org_users u
     LEFT JOIN access_levels l ON l.id = u.access_level_id";

const LEVEL_OFFSET: i32 = 8;

fn row_to_org_user(row: &libsql::Row) -> Result<OrgUser, DatabaseError> {
    let access_level = match row.get::<Option<String>>(LEVEL_OFFSET)? {
        Some(_) => Some(row_to_access_level_at(row, LEVEL_OFFSET)?),
        None => None,
    };
    Ok(OrgUser {
        id: row.get(0)?,
        auth_user_id: get_opt_string(row, 1)?,
        email: row.get(2)?,
        name: get_opt_string(row, 3)?,
        access_level_id: get_opt_string(row, 4)?,
        access_level,
        is_owner: get_flag(row, 5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
        updated_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl PulseDb {
    pub async fn create_org_user(&self, input: &NewOrgUser) -> Result<OrgUser, DatabaseError> {
        input.validate()?;
        let now = Utc::now();
        let id = self.generate_id(PREFIX_ORG_USER).await?;

        self.conn()
            .execute(
                &format!(
                    "INSERT INTO org_users ({INSERT_COLS})
                     VALUES (?1, NULL, ?2, ?3, ?4, ?5, ?6, ?7)"
                ),
                libsql::params![
                    id.as_str(),
                    input.email.as_str(),
                    input.name.as_deref(),
                    input.access_level_id.as_deref(),
                    i64::from(input.is_owner),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        self.get_org_user(&id).await
    }

    pub async fn get_org_user(&self, id: &str) -> Result<OrgUser, DatabaseError> {
        let mut rows = self
            .conn()
            .query(&format!("{SELECT_JOINED} WHERE u.id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_org_user(&row)
    }

    pub async fn list_org_users(&self) -> Result<Vec<OrgUser>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(&format!("{SELECT_JOINED} ORDER BY u.created_at, u.id"), ())
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_org_user(&row)?);
        }
        Ok(results)
    }

    /// Apply a partial update. Returns `DatabaseError::NoResult` for an unknown id.
    ///
    /// The referenced access level is not checked for existence.
    pub async fn update_org_user(
        &self,
        id: &str,
        update: &OrgUserUpdate,
    ) -> Result<OrgUser, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref name) = update.name {
            sets.push(format!("name = ?{idx}"));
            params.push(name.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(ref access_level_id) = update.access_level_id {
            sets.push(format!("access_level_id = ?{idx}"));
            params.push(
                access_level_id
                    .clone()
                    .map_or(libsql::Value::Null, Into::into),
            );
            idx += 1;
        }

        if sets.is_empty() {
            return self.get_org_user(id).await;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(Utc::now().to_rfc3339().into());
        idx += 1;

        params.push(id.into());
        let sql = format!("UPDATE org_users SET {} WHERE id = ?{idx}", sets.join(", "));
        let changed = self
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }

        self.get_org_user(id).await
    }

    pub async fn delete_org_user(&self, id: &str) -> Result<(), DatabaseError> {
        self.conn()
            .execute("DELETE FROM org_users WHERE id = ?1", [id])
            .await?;
        Ok(())
    }
}
