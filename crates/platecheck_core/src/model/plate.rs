//! Plate domain model.
//!
//! # Responsibility
//! - Define the persisted shape of one observed plate.
//!
//! # Invariants
//! - `id` is assigned on first insert and never reused.
//! - `raw` keeps the text submitted when the plate was first seen; later
//!   equivalent spellings do not overwrite it.
//! - Plates are never deleted by core.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one observed plate.
pub type PlateId = Uuid;

/// One row of `plates`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlateRecord {
    pub id: PlateId,
    /// Text as submitted at creation time.
    pub raw: String,
    /// Normalized dedup/lookup key.
    pub canonical: String,
    /// Reserved for registration metadata. Not written by core.
    pub country: Option<String>,
    /// Reserved for registration metadata. Not written by core.
    pub region: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}
