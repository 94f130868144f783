use anyhow::anyhow;
use rollbook_core::AppError;

/// Postgres reported a `UNIQUE` constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Postgres reported a `FOREIGN KEY` constraint violation.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

/// Name of the constraint a database error reports, if any.
pub fn violated_constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}

/// Maps a unique violation to `409 Conflict` with `message`; anything else is internal.
pub fn conflict_on_unique(err: sqlx::Error, message: impl Into<String>) -> AppError {
    if is_unique_violation(&err) {
        AppError::conflict(anyhow!(message.into()))
    } else {
        AppError::from(err)
    }
}
