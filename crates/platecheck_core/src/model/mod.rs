//! Domain records for plates, lists and memberships.
//!
//! # Responsibility
//! - Define the row shapes owned by the plate and list stores.
//! - Define transient view objects returned by the membership service.
//!
//! # Invariants
//! - `PlateRecord::canonical` is unique across all plates.
//! - At most one `MembershipRecord` exists per `(list_id, plate_id)`.

pub mod list;
pub mod plate;
