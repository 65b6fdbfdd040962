//! # pulse-db
//!
//! libSQL storage for the Pulse access-control roster: access levels and
//! organization users.
//!
//! Production talks to a remote Turso database; development and tests use a
//! local file or `:memory:`. The schema is the same in both cases and is
//! migrated on open.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod updates;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle for roster operations.
pub struct PulseDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    remote: bool,
}

impl PulseDb {
    /// Open a local database at the given path (`":memory:"` for tests).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        let pulse_db = Self {
            db,
            conn,
            remote: false,
        };
        pulse_db.run_migrations().await?;
        tracing::debug!(path, "opened local roster database");
        Ok(pulse_db)
    }

    /// Open a remote Turso database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection cannot be established or
    /// migrations fail.
    pub async fn open_remote(url: &str, auth_token: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await?;
        let conn = db.connect()?;
        let pulse_db = Self {
            db,
            conn,
            remote: true,
        };
        pulse_db.run_migrations().await?;
        tracing::debug!(url, "opened remote roster database");
        Ok(pulse_db)
    }

    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    #[must_use]
    pub const fn is_remote(&self) -> bool {
        self.remote
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"acl-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}
