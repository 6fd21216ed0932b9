//! Error conversions - From implementations for external error types
//!
//! Database failures met before any repository exists (pool connect at
//! startup) are mapped to [`AppError`] here.

use super::app_error::AppError;

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::not_found("Record not found").with_source(err),
            sqlx::Error::PoolTimedOut => {
                AppError::persistence("Database connection pool exhausted").with_source(err)
            }
            sqlx::Error::Database(db_err) => {
                // PostgreSQL specific error codes
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                let app_err = match db_err.code().as_deref() {
                    // Class 23 - Integrity Constraint Violation
                    Some("23502") => AppError::invalid_state("Required field is null"),
                    Some("23503") => AppError::invalid_state("Foreign key violation"),
                    Some("23505") => AppError::invalid_state("Duplicate key value"),
                    Some("23514") => AppError::invalid_state("Check constraint violation"),
                    _ => AppError::persistence("Database error"),
                };
                app_err.with_source(err)
            }
            sqlx::Error::Io(_) => {
                AppError::persistence("Database connection error").with_source(err)
            }
            _ => AppError::persistence("Database error").with_source(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::kind::ErrorKind;

    #[test]
    fn test_sqlx_error_conversion() {
        let app_err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(app_err.kind(), ErrorKind::NotFound);

        let app_err: AppError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(app_err.kind(), ErrorKind::Persistence);
        assert_eq!(app_err.exit_code(), 5);
    }

    #[test]
    fn test_sqlx_io_error_is_persistence() {
        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let app_err: AppError = sqlx::Error::Io(io_err).into();
        assert_eq!(app_err.kind(), ErrorKind::Persistence);
        assert_eq!(app_err.message(), "Database connection error");
    }
}
