use clap::{Parser, Subcommand, ValueEnum};
use platecheck_core::ListKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "platecheck", version, about = "Plate allow/deny list checker")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "SQLite database path (overrides PLATECHECK_DB_PATH)"
    )]
    pub db: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a plate against all lists, recording it as seen.
    Check { plate: String },
    /// Add a plate to the allow or deny list.
    Add {
        #[arg(value_enum)]
        list: ListArg,
        plate: String,
        #[arg(long)]
        note: Option<String>,
    },
    /// Remove a plate from the allow or deny list.
    Remove {
        #[arg(value_enum)]
        list: ListArg,
        plate: String,
    },
    /// Create the well-known allow and deny lists if missing.
    Provision,
    /// Report database readiness.
    Health,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListArg {
    Allow,
    Deny,
}

impl From<ListArg> for ListKind {
    fn from(value: ListArg) -> Self {
        match value {
            ListArg::Allow => ListKind::Allow,
            ListArg::Deny => ListKind::Deny,
        }
    }
}
