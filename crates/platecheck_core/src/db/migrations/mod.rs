//! Schema versioning for the plate/list store.
//!
//! # Responsibility
//! - Bring a connection's schema up to `latest_version()` in one transaction.
//! - Report which schema steps ran, and the schema state for readiness checks.
//!
//! # Invariants
//! - Step versions start at 1 and increase by exactly 1.
//! - `PRAGMA user_version` equals the last applied step.
//! - A database newer than this binary is refused, never downgraded.
//! - Steps create schema only. Well-known list rows come from `db::provision`.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// One schema step, named for `db_migrate` events.
struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "plates_lists_memberships",
    sql: include_str!("0001_init.sql"),
}];

/// Schema version stored in a database next to what this binary supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaStatus {
    pub current: u32,
    pub latest: u32,
}

impl SchemaStatus {
    pub fn is_current(&self) -> bool {
        self.current == self.latest
    }
}

/// Returns the latest schema version known by this binary.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.len() as u32
}

/// Reads the schema version of `conn` without changing it.
pub fn schema_status(conn: &Connection) -> DbResult<SchemaStatus> {
    let current = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(SchemaStatus {
        current,
        latest: latest_version(),
    })
}

/// Applies pending schema steps and returns the versions applied, in order.
///
/// Returns an empty list when the schema is already current.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<Vec<u32>> {
    let status = schema_status(conn)?;
    if status.current > status.latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: status.current,
            latest_supported: status.latest,
        });
    }

    let pending: Vec<&SchemaStep> = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > status.current)
        .collect();
    if pending.is_empty() {
        return Ok(Vec::new());
    }

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
    }
    tx.commit()?;

    for step in &pending {
        info!(
            "event=db_migrate module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    Ok(pending.iter().map(|step| step.version).collect())
}
