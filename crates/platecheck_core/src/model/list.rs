//! List and membership domain model.
//!
//! # Responsibility
//! - Define named lists, their kinds, and plate membership rows.
//! - Define the well-known list names the service resolves by kind.
//!
//! # Invariants
//! - List names are unique.
//! - Core resolves lists by name only; rows are provisioned externally.

use super::plate::PlateId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of one named list.
pub type ListId = Uuid;

/// Default name of the provisioned allow list.
pub const DEFAULT_ALLOW_LIST_NAME: &str = "default_allow";
/// Default name of the provisioned deny list.
pub const DEFAULT_DENY_LIST_NAME: &str = "default_deny";

/// Category of a list, independent from its display name.
///
/// Provisioning tooling may add kinds core has no built-in meaning for; those
/// round-trip through `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ListKind {
    Allow,
    Deny,
    Other(String),
}

impl ListKind {
    /// Storage representation used in `lists.kind`.
    pub fn as_db_str(&self) -> &str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
            Self::Other(kind) => kind.as_str(),
        }
    }

    /// Parses a stored kind. Unknown non-empty values map to `Other`.
    pub fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "" => None,
            "allow" => Some(Self::Allow),
            "deny" => Some(Self::Deny),
            other => Some(Self::Other(other.to_string())),
        }
    }
}

impl From<ListKind> for String {
    fn from(value: ListKind) -> Self {
        value.as_db_str().to_string()
    }
}

impl TryFrom<String> for ListKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_db_str(value.as_str()).ok_or_else(|| "list kind must not be empty".to_string())
    }
}

impl Display for ListKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_db_str())
    }
}

/// One row of `lists`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRecord {
    pub id: ListId,
    pub name: String,
    pub kind: ListKind,
    pub description: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// One row of `list_items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipRecord {
    pub list_id: ListId,
    pub plate_id: PlateId,
    pub note: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// A list that contains a checked plate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListHit {
    pub list_id: ListId,
    pub list_name: String,
    pub list_kind: ListKind,
}

/// Well-known list names, one per built-in kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNames {
    pub allow: String,
    pub deny: String,
}

impl ListNames {
    /// Returns the well-known list name for `kind`.
    ///
    /// `Other` kinds have no well-known list and return `None`.
    pub fn name_for(&self, kind: &ListKind) -> Option<&str> {
        match kind {
            ListKind::Allow => Some(self.allow.as_str()),
            ListKind::Deny => Some(self.deny.as_str()),
            ListKind::Other(_) => None,
        }
    }
}

impl Default for ListNames {
    fn default() -> Self {
        Self {
            allow: DEFAULT_ALLOW_LIST_NAME.to_string(),
            deny: DEFAULT_DENY_LIST_NAME.to_string(),
        }
    }
}
