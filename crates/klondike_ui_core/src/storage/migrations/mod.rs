//! Schema history of the blob store database.
//!
//! # Invariants
//! - Step versions start at 1 and increase by one.
//! - The applied version lives in `PRAGMA user_version`.
//! - A database stamped by a newer build is refused and left untouched.
//! - Pending steps run in one transaction; a failing step leaves the stored
//!   version where it was.

use crate::storage::{StorageError, StorageResult};
use log::info;
use rusqlite::Connection;

const SCHEMA_STEPS: &[(u32, &str)] = &[(1, include_str!("0001_kv_blobs.sql"))];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |(version, _)| *version)
}

/// Version stamped on `conn`; 0 for a database never touched by this crate.
pub fn schema_version(conn: &Connection) -> StorageResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Brings `conn` up to [`latest_version`]. Returns how many steps ran.
pub fn apply_migrations(conn: &mut Connection) -> StorageResult<usize> {
    let from = schema_version(conn)?;
    let latest = latest_version();
    if from > latest {
        return Err(StorageError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }

    let pending: Vec<&(u32, &str)> = SCHEMA_STEPS
        .iter()
        .filter(|(version, _)| *version > from)
        .collect();
    if pending.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    for &&(version, sql) in &pending {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;
    info!(
        "event=db_migrate module=storage status=ok from_version={} to_version={} steps={}",
        from,
        latest,
        pending.len()
    );
    Ok(pending.len())
}
