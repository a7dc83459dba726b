//! Row-to-entity parsing helpers.
//!
//! Every repo needs to convert `libsql::Row` (column-indexed) into typed entity
//! structs. These helpers isolate the parsing logic and handle the dual datetime
//! format issue (`SQLite`'s `datetime('now')` vs Rust's `to_rfc3339()`).

use chrono::{DateTime, Utc};

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

/// Parse an optional TEXT column as `Option<DateTime<Utc>>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// Works with every lab-core enum, whatever its `rename_all` casing.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
/// You must use `get::<Option<String>>()` for nullable columns.
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

/// Read an INTEGER column that must hold a non-negative count.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` for a negative value.
pub fn get_count(row: &libsql::Row, idx: i32) -> Result<u64, DatabaseError> {
    let raw = row.get::<i64>(idx)?;
    u64::try_from(raw)
        .map_err(|_| DatabaseError::InvalidState(format!("negative count {raw} in column {idx}")))
}

/// Read an INTEGER column that must fit a `u32` (positions, months).
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if the value is out of range.
pub fn get_u32(row: &libsql::Row, idx: i32) -> Result<u32, DatabaseError> {
    let raw = row.get::<i64>(idx)?;
    u32::try_from(raw)
        .map_err(|_| DatabaseError::InvalidState(format!("value {raw} in column {idx} out of range")))
}

/// Read an INTEGER column as an `i32` (years).
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if the value is out of range.
pub fn get_i32(row: &libsql::Row, idx: i32) -> Result<i32, DatabaseError> {
    let raw = row.get::<i64>(idx)?;
    i32::try_from(raw)
        .map_err(|_| DatabaseError::InvalidState(format!("value {raw} in column {idx} out of range")))
}

/// Run a `SELECT COUNT(*) ...` style query and return the single value.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails or returns no row.
pub async fn query_count(
    conn: &libsql::Connection,
    sql: &str,
    params: impl libsql::params::IntoParams,
) -> Result<u64, DatabaseError> {
    let mut rows = conn.query(sql, params).await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    get_count(&row, 0)
}

/// Extract an optional JSON value from a TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string contains invalid JSON.
pub fn parse_optional_json(s: Option<&str>) -> Result<Option<serde_json::Value>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => {
            let val = serde_json::from_str(s)
                .map_err(|e| DatabaseError::Query(format!("Invalid JSON in column: {e}")))?;
            Ok(Some(val))
        }
        _ => Ok(None),
    }
}

/// Map `EntityType` to the corresponding SQL table name.
///
/// Exhaustive: adding a new `EntityType` variant forces updating this.
#[must_use]
pub const fn entity_type_to_table(entity: lab_core::enums::EntityType) -> &'static str {
    use lab_core::enums::EntityType;
    match entity {
        EntityType::Research => "research_submissions",
        EntityType::CitationTrend => "citation_trends",
        EntityType::DownloadTrend => "download_trends",
        EntityType::Survey => "surveys",
        EntityType::SurveyForm => "survey_forms",
        EntityType::Question => "questions",
        EntityType::Choice => "choices",
        EntityType::Review => "reviews",
        EntityType::Collaborator => "collaborators",
    }
}

/// Check that a row with the given primary key exists.
///
/// # Errors
///
/// Returns `CoreError::NotFound` (wrapped) when it does not.
pub async fn ensure_exists(
    conn: &libsql::Connection,
    entity: lab_core::enums::EntityType,
    id: &str,
) -> Result<(), DatabaseError> {
    let table = entity_type_to_table(entity);
    let mut rows = conn
        .query(&format!("SELECT 1 FROM {table} WHERE id = ?1"), [id])
        .await?;
    if rows.next().await?.is_none() {
        return Err(lab_core::errors::CoreError::not_found(entity, id).into());
    }
    Ok(())
}
