use crate::db::DbError;
use crate::model::list::ListId;
use crate::model::plate::PlateId;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error shared by the plate and list stores.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// A persisted value could not be mapped back into a domain record.
    InvalidData(String),
    /// More than one plate row carries the same canonical key.
    DuplicateCanonical { canonical: String, count: usize },
    /// No membership row exists for the pair.
    MembershipNotFound { list_id: ListId, plate_id: PlateId },
    /// Storage contradicted itself between two statements.
    InconsistentState(&'static str),
}

impl RepoError {
    /// Key/value diagnostics for log lines.
    ///
    /// Unlike `Display`, never includes canonical keys or other stored text.
    pub fn log_summary(&self) -> String {
        match self {
            Self::Db(err) => format!("error_code=db error={err}"),
            Self::InvalidData(_) => "error_code=invalid_data".to_string(),
            Self::DuplicateCanonical { count, .. } => {
                format!("error_code=duplicate_canonical count={count}")
            }
            Self::MembershipNotFound { list_id, plate_id } => format!(
                "error_code=membership_not_found list_id={list_id} plate_id={plate_id}"
            ),
            Self::InconsistentState(_) => "error_code=inconsistent_state".to_string(),
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::DuplicateCanonical { canonical, count } => write!(
                f,
                "integrity violation: {count} plates share canonical key `{canonical}`"
            ),
            Self::MembershipNotFound { list_id, plate_id } => {
                write!(f, "plate {plate_id} is not a member of list {list_id}")
            }
            Self::InconsistentState(details) => write!(f, "inconsistent storage state: {details}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

#[cfg(test)]
mod tests {
    use super::RepoError;

    #[test]
    fn log_summary_omits_canonical_key() {
        let err = RepoError::DuplicateCanonical {
            canonical: "SECRET42".to_string(),
            count: 3,
        };
        let summary = err.log_summary();
        assert!(!summary.contains("SECRET42"));
        assert!(summary.contains("count=3"));
        assert!(err.to_string().contains("SECRET42"));
    }

    #[test]
    fn log_summary_omits_invalid_data_details() {
        let err = RepoError::InvalidData("empty canonical key for plate `AB1`".to_string());
        assert_eq!(err.log_summary(), "error_code=invalid_data");
    }
}
