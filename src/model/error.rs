use thiserror::Error;

pub type DatabaseResult<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("sqlx migrate error: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("sqlx error: {0}")]
    SqlxError(sqlx::Error),
    #[error("json error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("unique constraint violated")]
    UniqueViolation,
    #[error("access to this resource is forbidden")]
    Forbidden,
}

impl From<sqlx::Error> for DatabaseError {
    fn from(e: sqlx::Error) -> Self {
        // Losing an insert race surfaces as its own variant so callers can
        // answer with a state conflict instead of a 500.
        if e.as_database_error()
            .is_some_and(|db| db.is_unique_violation())
        {
            return Self::UniqueViolation;
        }
        Self::SqlxError(e)
    }
}
