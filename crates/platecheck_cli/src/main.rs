//! PlateCheck command-line entry point.
//!
//! # Responsibility
//! - Wrap core check/add/remove contracts for operators and scripts.
//! - Run deployment tooling (provisioning, readiness) against the database.
//!
//! # Invariants
//! - Stdout carries exactly one JSON envelope: `{"data": ...}` on success.
//! - Failures print `{"error": ...}` to stderr and exit with a code derived
//!   from the core error kind.

mod cli;

use clap::Parser;
use cli::{Cli, Commands, ListArg};
use log::error;
use platecheck_core::db::migrations::schema_status;
use platecheck_core::db::{health_check, open_db, provision_default_lists};
use platecheck_core::{
    core_version, init_logging, CoreConfig, ErrorKind, MembershipError, MembershipService,
    PlateRepository, SqliteListRepository, SqlitePlateRepository,
};
use rusqlite::Connection;
use serde_json::{json, Value};
use std::process::ExitCode;

const EXIT_INTERNAL: u8 = 1;
const EXIT_INVALID_INPUT: u8 = 2;
const EXIT_NOT_FOUND: u8 = 3;

/// A printable failure with its exit code.
struct Failure {
    code: u8,
    message: String,
}

impl Failure {
    fn internal(message: impl Into<String>) -> Self {
        Self {
            code: EXIT_INTERNAL,
            message: message.into(),
        }
    }
}

impl From<MembershipError> for Failure {
    fn from(err: MembershipError) -> Self {
        let code = match err.kind() {
            ErrorKind::InvalidInput => EXIT_INVALID_INPUT,
            ErrorKind::NotFound => EXIT_NOT_FOUND,
            ErrorKind::Internal => EXIT_INTERNAL,
        };
        Self {
            code,
            message: err.to_string(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(data) => {
            println!("{}", json!({ "data": data }));
            ExitCode::SUCCESS
        }
        Err(failure) => {
            eprintln!("{}", json!({ "error": failure.message }));
            ExitCode::from(failure.code)
        }
    }
}

fn run(cli: Cli) -> Result<Value, Failure> {
    let mut config = CoreConfig::from_env().map_err(|err| Failure::internal(err.to_string()))?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    init_logging(config.log_level, config.log_dir_str()).map_err(Failure::internal)?;

    let mut conn = open_db(&config.db_path).map_err(|err| {
        error!("event=cli_open module=cli status=error error={err}");
        Failure::internal(format!("failed to open database: {err}"))
    })?;

    match cli.command {
        Commands::Check { plate } => {
            let result = service(&conn, &config).check(&plate)?;
            serde_json::to_value(result).map_err(|err| Failure::internal(err.to_string()))
        }
        Commands::Add { list, plate, note } => {
            service(&conn, &config).add_to_list(&plate, list.into(), note.as_deref())?;
            Ok(json!({ "message": format!("added to {} list", list_label(list)) }))
        }
        Commands::Remove { list, plate } => {
            service(&conn, &config).remove_from_list(&plate, list.into())?;
            Ok(json!({ "message": format!("removed from {} list", list_label(list)) }))
        }
        Commands::Provision => {
            let inserted = provision_default_lists(&mut conn, &config.list_names)
                .map_err(|err| Failure::internal(format!("provisioning failed: {err}")))?;
            Ok(json!({
                "inserted": inserted,
                "allow_list": config.list_names.allow,
                "deny_list": config.list_names.deny,
            }))
        }
        Commands::Health => {
            health_check(&conn).map_err(|err| Failure::internal(format!("unhealthy: {err}")))?;
            let schema = schema_status(&conn)
                .map_err(|err| Failure::internal(format!("unhealthy: {err}")))?;
            let plates = SqlitePlateRepository::new(&conn)
                .count()
                .map_err(|err| Failure::internal(format!("unhealthy: {err}")))?;
            Ok(json!({
                "status": "ok",
                "plates": plates,
                "schema_version": schema.current,
                "version": core_version(),
            }))
        }
    }
}

fn service<'conn>(
    conn: &'conn Connection,
    config: &CoreConfig,
) -> MembershipService<SqlitePlateRepository<'conn>, SqliteListRepository<'conn>> {
    MembershipService::new(
        SqlitePlateRepository::new(conn),
        SqliteListRepository::new(conn),
        config.list_names.clone(),
    )
}

fn list_label(list: ListArg) -> &'static str {
    match list {
        ListArg::Allow => "allow",
        ListArg::Deny => "deny",
    }
}
