//! Row-to-entity parsing helpers.
//!
//! Handles the dual datetime format (`SQLite`'s `datetime('now')` vs Rust's
//! `to_rfc3339()`) and the route whitelist, which is stored as a JSON array
//! of path strings.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use pulse_core::Route;

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Read an INTEGER column holding a boolean flag.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_flag(row: &libsql::Row, idx: i32) -> Result<bool, DatabaseError> {
    Ok(row.get::<i64>(idx)? != 0)
}

/// Parse a stored route whitelist.
///
/// Entries that do not name a known route are dropped with a warning: they
/// can never match a navigation, and refusing the whole row would lock
/// every holder of the level out of the roster.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the column is not a JSON array of strings.
pub fn parse_routes(json: &str) -> Result<BTreeSet<Route>, DatabaseError> {
    let paths: Vec<String> = serde_json::from_str(json)
        .map_err(|e| DatabaseError::Query(format!("Invalid route whitelist '{json}': {e}")))?;
    Ok(paths
        .iter()
        .filter_map(|path| {
            let route = Route::from_path(path);
            if route.is_none() {
                tracing::warn!(path = %path, "dropping unknown route from whitelist");
            }
            route
        })
        .collect())
}

/// Serialize a route whitelist for storage.
#[must_use]
pub fn routes_to_json(routes: &BTreeSet<Route>) -> String {
    let paths: Vec<&str> = routes.iter().map(|route| route.path()).collect();
    serde_json::Value::from(paths).to_string()
}
