//! Deployment-time provisioning and readiness check.
//!
//! # Responsibility
//! - Insert the well-known allow/deny lists once, before core is exercised.
//! - Report whether a connection can serve queries.
//!
//! # Invariants
//! - Provisioning is idempotent: existing rows (by name) are left untouched.
//! - Provisioning never deletes or renames lists.

use super::DbResult;
use crate::model::list::{ListKind, ListNames};
use log::info;
use rusqlite::{params, Connection};
use uuid::Uuid;

/// Ensures the allow and deny lists named in `names` exist.
///
/// Returns how many list rows were inserted by this call (0 when already
/// provisioned).
pub fn provision_default_lists(conn: &mut Connection, names: &ListNames) -> DbResult<usize> {
    let tx = conn.transaction()?;
    let mut inserted = 0;
    for (name, kind, description) in [
        (names.allow.as_str(), ListKind::Allow, "Default allow list"),
        (names.deny.as_str(), ListKind::Deny, "Default deny list"),
    ] {
        inserted += tx.execute(
            "INSERT INTO lists (id, name, kind, description)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(name) DO NOTHING;",
            params![
                Uuid::new_v4().to_string(),
                name,
                kind.as_db_str(),
                description
            ],
        )?;
    }
    tx.commit()?;

    info!("event=db_provision module=db status=ok inserted={inserted}");
    Ok(inserted)
}

/// Runs a trivial query to confirm the connection is usable.
pub fn health_check(conn: &Connection) -> DbResult<()> {
    conn.query_row("SELECT 1;", [], |row| row.get::<_, i64>(0))?;
    Ok(())
}
