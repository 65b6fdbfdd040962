//! Access level repository — CRUD.

use chrono::Utc;

use pulse_core::entities::{AccessLevel, NewAccessLevel};
use pulse_core::ids::PREFIX_ACCESS_LEVEL;

use crate::PulseDb;
use crate::error::DatabaseError;
use crate::helpers::{get_flag, get_opt_string, parse_datetime, parse_routes, routes_to_json};
use crate::updates::access_level::AccessLevelUpdate;

const SELECT_COLS: &str =
    "id, name, description, allowed_routes, is_admin, created_at, updated_at";

/// Parse an access level starting at column `offset`.
///
/// Org user queries join the level's columns after their own, so the same
/// parser serves both.
pub(crate) fn row_to_access_level_at(
    row: &libsql::Row,
    offset: i32,
) -> Result<AccessLevel, DatabaseError> {
    Ok(AccessLevel {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        description: get_opt_string(row, offset + 2)?,
        allowed_routes: parse_routes(&row.get::<String>(offset + 3)?)?,
        is_admin: get_flag(row, offset + 4)?,
        created_at: parse_datetime(&row.get::<String>(offset + 5)?)?,
        updated_at: parse_datetime(&row.get::<String>(offset + 6)?)?,
    })
}

fn row_to_access_level(row: &libsql::Row) -> Result<AccessLevel, DatabaseError> {
    row_to_access_level_at(row, 0)
}

impl PulseDb {
    pub async fn create_access_level(
        &self,
        input: &NewAccessLevel,
    ) -> Result<AccessLevel, DatabaseError> {
        input.validate()?;
        let now = Utc::now();
        let id = self.generate_id(PREFIX_ACCESS_LEVEL).await?;

        self.conn()
            .execute(
                &format!(
                    "INSERT INTO access_levels ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
                ),
                libsql::params![
                    id.as_str(),
                    input.name.as_str(),
                    input.description.as_deref(),
                    routes_to_json(&input.allowed_routes),
                    i64::from(input.is_admin),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(AccessLevel {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
            allowed_routes: input.allowed_routes.clone(),
            is_admin: input.is_admin,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_access_level(&self, id: &str) -> Result<AccessLevel, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM access_levels WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_access_level(&row)
    }

    pub async fn list_access_levels(&self) -> Result<Vec<AccessLevel>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM access_levels ORDER BY created_at, id"),
                (),
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_access_level(&row)?);
        }
        Ok(results)
    }

    /// Apply a partial update. Returns `DatabaseError::NoResult` for an unknown id.
    pub async fn update_access_level(
        &self,
        id: &str,
        update: &AccessLevelUpdate,
    ) -> Result<AccessLevel, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref name) = update.name {
            if name.trim().is_empty() {
                return Err(pulse_core::errors::CoreError::Validation(
                    "access level name must not be empty".into(),
                )
                .into());
            }
            sets.push(format!("name = ?{idx}"));
            params.push(name.clone().into());
            idx += 1;
        }
        if let Some(ref description) = update.description {
            sets.push(format!("description = ?{idx}"));
            params.push(description.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(ref routes) = update.allowed_routes {
            sets.push(format!("allowed_routes = ?{idx}"));
            params.push(routes_to_json(routes).into());
            idx += 1;
        }
        if let Some(is_admin) = update.is_admin {
            sets.push(format!("is_admin = ?{idx}"));
            params.push(i64::from(is_admin).into());
            idx += 1;
        }

        if sets.is_empty() {
            return self.get_access_level(id).await;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(Utc::now().to_rfc3339().into());
        idx += 1;

        params.push(id.into());
        let sql = format!(
            "UPDATE access_levels SET {} WHERE id = ?{idx}",
            sets.join(", ")
        );
        let changed = self
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }

        self.get_access_level(id).await
    }

    /// Delete an access level. Users that reference it are left untouched.
    pub async fn delete_access_level(&self, id: &str) -> Result<(), DatabaseError> {
        self.conn()
            .execute("DELETE FROM access_levels WHERE id = ?1", [id])
            .await?;
        Ok(())
    }
}
