//! Core domain logic for PlateCheck.
//! This crate is the single source of truth for plate dedup and list
//! membership invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::list::{
    ListHit, ListId, ListKind, ListNames, ListRecord, MembershipRecord, DEFAULT_ALLOW_LIST_NAME,
    DEFAULT_DENY_LIST_NAME,
};
pub use model::plate::{PlateId, PlateRecord};
pub use normalize::normalize_plate;
pub use repo::list_repo::{ListRepository, MembershipOutcome, SqliteListRepository};
pub use repo::plate_repo::{PlateRepository, SqlitePlateRepository};
pub use repo::{RepoError, RepoResult};
pub use service::membership_service::{
    CheckResult, ErrorKind, MembershipError, MembershipService,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
