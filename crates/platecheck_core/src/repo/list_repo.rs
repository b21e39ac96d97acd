//! List store contract and SQLite implementation.
//!
//! # Responsibility
//! - Resolve provisioned lists by name or id.
//! - Own `list_items` membership rows.
//!
//! # Invariants
//! - Lists are read-only here; provisioning lives in `db::provision`.
//! - The `(list_id, plate_id)` primary key is the only duplicate guard, so
//!   sequential and concurrent duplicate adds are classified identically.
//! - An existing membership note is never overwritten by a re-add.

use super::error::parse_uuid;
use super::{RepoError, RepoResult};
use crate::db::DbError;
use crate::model::list::{ListHit, ListId, ListKind, ListRecord, MembershipRecord};
use crate::model::plate::PlateId;
use rusqlite::{params, Connection, Row};

const LIST_SELECT_SQL: &str = "SELECT
    id,
    name,
    kind,
    description,
    created_at
FROM lists";

/// Result of an add-membership write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipOutcome {
    /// A new membership row was written.
    Added,
    /// The pair was already a member; nothing changed.
    AlreadyMember,
}

/// Repository interface for lists and memberships.
pub trait ListRepository {
    /// Gets one list by its unique name.
    fn get_by_name(&self, name: &str) -> RepoResult<Option<ListRecord>>;
    /// Gets one list by id.
    fn get(&self, id: ListId) -> RepoResult<Option<ListRecord>>;
    /// Records `plate_id` as a member of `list_id`.
    fn add_membership(
        &self,
        list_id: ListId,
        plate_id: PlateId,
        note: Option<&str>,
    ) -> RepoResult<MembershipOutcome>;
    /// Deletes the membership row, `RepoError::MembershipNotFound` if absent.
    fn remove_membership(&self, list_id: ListId, plate_id: PlateId) -> RepoResult<()>;
    /// Lists every list containing `plate_id`, sorted by list name.
    fn list_memberships_for_plate(&self, plate_id: PlateId) -> RepoResult<Vec<ListHit>>;
    /// Gets one membership row.
    fn get_membership(
        &self,
        list_id: ListId,
        plate_id: PlateId,
    ) -> RepoResult<Option<MembershipRecord>>;
}

/// SQLite-backed list store.
pub struct SqliteListRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteListRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_one_list(&self, filter: &str, value: &str) -> RepoResult<Option<ListRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LIST_SELECT_SQL} WHERE {filter} = ?1;"))?;

        let mut rows = stmt.query([value])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_list_row(row)?));
        }

        Ok(None)
    }
}

impl ListRepository for SqliteListRepository<'_> {
    fn get_by_name(&self, name: &str) -> RepoResult<Option<ListRecord>> {
        self.query_one_list("name", name)
    }

    fn get(&self, id: ListId) -> RepoResult<Option<ListRecord>> {
        self.query_one_list("id", id.to_string().as_str())
    }

    fn add_membership(
        &self,
        list_id: ListId,
        plate_id: PlateId,
        note: Option<&str>,
    ) -> RepoResult<MembershipOutcome> {
        let inserted = self.conn.execute(
            "INSERT INTO list_items (list_id, plate_id, note) VALUES (?1, ?2, ?3);",
            params![list_id.to_string(), plate_id.to_string(), note],
        );

        match inserted {
            Ok(_) => Ok(MembershipOutcome::Added),
            Err(err) => {
                let err = DbError::from(err);
                if err.is_unique_violation() {
                    Ok(MembershipOutcome::AlreadyMember)
                } else {
                    Err(err.into())
                }
            }
        }
    }

    fn remove_membership(&self, list_id: ListId, plate_id: PlateId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM list_items WHERE list_id = ?1 AND plate_id = ?2;",
            params![list_id.to_string(), plate_id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::MembershipNotFound { list_id, plate_id });
        }

        Ok(())
    }

    fn list_memberships_for_plate(&self, plate_id: PlateId) -> RepoResult<Vec<ListHit>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                l.id AS list_id,
                l.name AS list_name,
                l.kind AS list_kind
             FROM list_items li
             INNER JOIN lists l ON l.id = li.list_id
             WHERE li.plate_id = ?1
             ORDER BY l.name ASC;",
        )?;

        let mut rows = stmt.query([plate_id.to_string()])?;
        let mut hits = Vec::new();
        while let Some(row) = rows.next()? {
            let id_text: String = row.get("list_id")?;
            let kind_text: String = row.get("list_kind")?;
            hits.push(ListHit {
                list_id: parse_uuid(&id_text, "lists.id")?,
                list_name: row.get("list_name")?,
                list_kind: parse_kind(&kind_text)?,
            });
        }

        Ok(hits)
    }

    fn get_membership(
        &self,
        list_id: ListId,
        plate_id: PlateId,
    ) -> RepoResult<Option<MembershipRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT note, created_at
             FROM list_items
             WHERE list_id = ?1 AND plate_id = ?2;",
        )?;

        let mut rows = stmt.query(params![list_id.to_string(), plate_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(MembershipRecord {
                list_id,
                plate_id,
                note: row.get("note")?,
                created_at: row.get("created_at")?,
            }));
        }

        Ok(None)
    }
}

fn parse_list_row(row: &Row<'_>) -> RepoResult<ListRecord> {
    let id_text: String = row.get("id")?;
    let kind_text: String = row.get("kind")?;

    Ok(ListRecord {
        id: parse_uuid(&id_text, "lists.id")?,
        name: row.get("name")?,
        kind: parse_kind(&kind_text)?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_kind(value: &str) -> RepoResult<ListKind> {
    ListKind::from_db_str(value)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid list kind `{value}` in lists.kind")))
}
