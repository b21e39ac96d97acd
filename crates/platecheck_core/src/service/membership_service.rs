//! Plate membership use-case service.
//!
//! # Responsibility
//! - Normalize raw plate input and validate it before touching storage.
//! - Orchestrate plate store and list store into check/add/remove.
//! - Classify every storage failure before it reaches callers.
//!
//! # Invariants
//! - `check` persists every valid plate it sees, matched or not.
//! - `add_to_list` creates unseen plates; `remove_from_list` never does.
//! - Re-adding an existing member succeeds and keeps the original note.
//! - Service holds no mutable state; consistency is delegated to storage.
//! - Logs carry ids and counts, never raw plate input or notes.

use crate::model::list::{ListHit, ListKind, ListNames, ListRecord};
use crate::model::plate::PlateId;
use crate::normalize::normalize_plate;
use crate::repo::list_repo::{ListRepository, MembershipOutcome};
use crate::repo::plate_repo::PlateRepository;
use crate::repo::RepoError;
use log::{debug, error, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Caller-facing classification of a membership failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    Internal,
}

/// Errors from membership service operations.
#[derive(Debug)]
pub enum MembershipError {
    /// Plate input normalizes to nothing.
    InvalidPlate,
    /// Plate has never been observed (remove only).
    PlateNotFound(String),
    /// No provisioned list for the requested kind.
    ListNotFound(ListKind),
    /// Plate is not a member of the requested list (remove only).
    NotMember { list_name: String, plate_id: PlateId },
    /// Unexpected storage failure, including integrity violations.
    Internal(RepoError),
}

impl MembershipError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPlate => ErrorKind::InvalidInput,
            Self::PlateNotFound(_) | Self::ListNotFound(_) | Self::NotMember { .. } => {
                ErrorKind::NotFound
            }
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl Display for MembershipError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPlate => write!(f, "invalid input: plate number cannot be empty"),
            Self::PlateNotFound(canonical) => write!(f, "plate not found: {canonical}"),
            Self::ListNotFound(kind) => write!(f, "list not found for kind `{kind}`"),
            Self::NotMember {
                list_name,
                plate_id,
            } => write!(f, "plate {plate_id} is not on list `{list_name}`"),
            Self::Internal(err) => write!(f, "internal error: {err}"),
        }
    }
}

impl Error for MembershipError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Internal(err) => Some(err),
            _ => None,
        }
    }
}

/// Outcome of one plate check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub plate_id: PlateId,
    pub canonical_key: String,
    pub raw_plate: String,
    /// Lists containing the plate, sorted by name. Empty when on none.
    pub hits: Vec<ListHit>,
}

/// Membership service facade over plate and list stores.
pub struct MembershipService<P: PlateRepository, L: ListRepository> {
    plates: P,
    lists: L,
    names: ListNames,
}

impl<P: PlateRepository, L: ListRepository> MembershipService<P, L> {
    /// Creates a service over the given stores and well-known list names.
    pub fn new(plates: P, lists: L, names: ListNames) -> Self {
        Self {
            plates,
            lists,
            names,
        }
    }

    /// Checks one raw plate against all lists.
    ///
    /// # Side effects
    /// - Persists the plate when first seen, even when it matches nothing.
    pub fn check(&self, raw_plate: &str) -> Result<CheckResult, MembershipError> {
        let started_at = Instant::now();
        let canonical_key = canonical_or_invalid(raw_plate)?;

        let plate_id = self
            .plates
            .get_or_create(&canonical_key, raw_plate)
            .map_err(|err| internal("plate_check", "get_or_create", err))?;
        let hits = self
            .lists
            .list_memberships_for_plate(plate_id)
            .map_err(|err| internal("plate_check", "list_memberships", err))?;

        info!(
            "event=plate_check module=service status=ok plate_id={} hits={} duration_ms={}",
            plate_id,
            hits.len(),
            started_at.elapsed().as_millis()
        );
        Ok(CheckResult {
            plate_id,
            canonical_key,
            raw_plate: raw_plate.to_string(),
            hits,
        })
    }

    /// Adds one raw plate to the well-known list for `kind`.
    ///
    /// Blank notes are stored as absent. Existing memberships are left as-is.
    pub fn add_to_list(
        &self,
        raw_plate: &str,
        kind: ListKind,
        note: Option<&str>,
    ) -> Result<(), MembershipError> {
        let canonical_key = canonical_or_invalid(raw_plate)?;

        let plate_id = self
            .plates
            .get_or_create(&canonical_key, raw_plate)
            .map_err(|err| internal("list_add", "get_or_create", err))?;
        let list = self.resolve_list(&kind, "list_add")?;
        let note = note.map(str::trim).filter(|value| !value.is_empty());

        let outcome = self
            .lists
            .add_membership(list.id, plate_id, note)
            .map_err(|err| internal("list_add", "add_membership", err))?;

        info!(
            "event=list_add module=service status=ok list_kind={} plate_id={} outcome={}",
            list.kind,
            plate_id,
            match outcome {
                MembershipOutcome::Added => "added",
                MembershipOutcome::AlreadyMember => "already_member",
            }
        );
        Ok(())
    }

    /// Removes one raw plate from the well-known list for `kind`.
    ///
    /// Never creates a plate: an unseen plate is `PlateNotFound`.
    pub fn remove_from_list(&self, raw_plate: &str, kind: ListKind) -> Result<(), MembershipError> {
        let canonical_key = canonical_or_invalid(raw_plate)?;

        let mut plates = self
            .plates
            .find_by_canonical(&canonical_key)
            .map_err(|err| internal("list_remove", "find_by_canonical", err))?;
        let plate = match plates.len() {
            0 => {
                debug!("event=list_remove module=service status=not_found reason=plate");
                return Err(MembershipError::PlateNotFound(canonical_key));
            }
            1 => plates.remove(0),
            count => {
                return Err(internal(
                    "list_remove",
                    "find_by_canonical",
                    RepoError::DuplicateCanonical {
                        canonical: canonical_key,
                        count,
                    },
                ));
            }
        };

        let list = self.resolve_list(&kind, "list_remove")?;
        match self.lists.remove_membership(list.id, plate.id) {
            Ok(()) => {
                info!(
                    "event=list_remove module=service status=ok list_kind={} plate_id={}",
                    list.kind, plate.id
                );
                Ok(())
            }
            Err(RepoError::MembershipNotFound { plate_id, .. }) => {
                debug!("event=list_remove module=service status=not_found reason=membership");
                Err(MembershipError::NotMember {
                    list_name: list.name,
                    plate_id,
                })
            }
            Err(err) => Err(internal("list_remove", "remove_membership", err)),
        }
    }

    fn resolve_list(&self, kind: &ListKind, event: &str) -> Result<ListRecord, MembershipError> {
        let Some(name) = self.names.name_for(kind) else {
            return Err(MembershipError::ListNotFound(kind.clone()));
        };

        match self.lists.get_by_name(name) {
            Ok(Some(list)) => Ok(list),
            Ok(None) => {
                error!(
                    "event={event} module=service status=error error_code=list_not_provisioned list_kind={kind}"
                );
                Err(MembershipError::ListNotFound(kind.clone()))
            }
            Err(err) => Err(internal(event, "get_list_by_name", err)),
        }
    }
}

fn canonical_or_invalid(raw_plate: &str) -> Result<String, MembershipError> {
    let canonical = normalize_plate(raw_plate);
    if canonical.is_empty() {
        return Err(MembershipError::InvalidPlate);
    }
    Ok(canonical)
}

fn internal(event: &str, step: &str, err: RepoError) -> MembershipError {
    error!(
        "event={event} module=service status=error step={step} {}",
        err.log_summary()
    );
    MembershipError::Internal(err)
}
