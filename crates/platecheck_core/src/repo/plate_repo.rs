//! Plate store contract and SQLite implementation.
//!
//! # Responsibility
//! - Own `plates` rows and their canonical-key dedup.
//! - Resolve concurrent first sightings of the same plate to one row.
//!
//! # Invariants
//! - Exactly one row per canonical key, guarded by `ux_plates_canonical`.
//! - A UNIQUE violation on insert means another writer won the race; the
//!   row is re-read once instead of surfacing the conflict.
//! - More than one row per canonical key is reported as
//!   `RepoError::DuplicateCanonical`, never silently picked from.

use super::error::parse_uuid;
use super::{RepoError, RepoResult};
use crate::db::DbError;
use crate::model::plate::{PlateId, PlateRecord};
use log::{debug, warn};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const PLATE_SELECT_SQL: &str = "SELECT
    id,
    raw,
    canonical,
    country,
    region,
    created_at
FROM plates";

/// Repository interface for observed plates.
pub trait PlateRepository {
    /// Returns the plate id for `canonical`, inserting a row with `raw` when
    /// the key has never been seen.
    fn get_or_create(&self, canonical: &str, raw: &str) -> RepoResult<PlateId>;
    /// Returns every row stored under `canonical` (normally zero or one).
    fn find_by_canonical(&self, canonical: &str) -> RepoResult<Vec<PlateRecord>>;
    /// Gets one plate by id.
    fn get(&self, id: PlateId) -> RepoResult<Option<PlateRecord>>;
    /// Counts all observed plates.
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed plate store.
pub struct SqlitePlateRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePlateRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn find_id(&self, canonical: &str) -> RepoResult<Option<PlateId>> {
        let mut plates = self.find_by_canonical(canonical)?;
        match plates.len() {
            0 => Ok(None),
            1 => Ok(plates.pop().map(|plate| plate.id)),
            count => Err(RepoError::DuplicateCanonical {
                canonical: canonical.to_string(),
                count,
            }),
        }
    }
}

impl PlateRepository for SqlitePlateRepository<'_> {
    fn get_or_create(&self, canonical: &str, raw: &str) -> RepoResult<PlateId> {
        if let Some(id) = self.find_id(canonical)? {
            return Ok(id);
        }

        let id = Uuid::new_v4();
        let inserted = self.conn.execute(
            "INSERT INTO plates (id, raw, canonical) VALUES (?1, ?2, ?3);",
            params![id.to_string(), raw, canonical],
        );

        match inserted {
            Ok(_) => {
                debug!("event=plate_create module=repo status=ok plate_id={id}");
                Ok(id)
            }
            Err(err) => {
                let err = DbError::from(err);
                if !err.is_unique_violation() {
                    return Err(err.into());
                }

                warn!("event=plate_create module=repo status=conflict action=reread");
                self.find_id(canonical)?
                    .ok_or(RepoError::InconsistentState(
                        "plate missing after canonical key conflict",
                    ))
            }
        }
    }

    fn find_by_canonical(&self, canonical: &str) -> RepoResult<Vec<PlateRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PLATE_SELECT_SQL}
             WHERE canonical = ?1
             ORDER BY created_at ASC, id ASC;"
        ))?;

        let mut rows = stmt.query([canonical])?;
        let mut plates = Vec::new();
        while let Some(row) = rows.next()? {
            plates.push(parse_plate_row(row)?);
        }

        Ok(plates)
    }

    fn get(&self, id: PlateId) -> RepoResult<Option<PlateRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PLATE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_plate_row(row)?));
        }

        Ok(None)
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM plates;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative plate count `{count}`")))
    }
}

fn parse_plate_row(row: &Row<'_>) -> RepoResult<PlateRecord> {
    let id_text: String = row.get("id")?;
    let canonical: String = row.get("canonical")?;
    if canonical.is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty canonical key for plate `{id_text}`"
        )));
    }

    Ok(PlateRecord {
        id: parse_uuid(&id_text, "plates.id")?,
        raw: row.get("raw")?,
        canonical,
        country: row.get("country")?,
        region: row.get("region")?,
        created_at: row.get("created_at")?,
    })
}
