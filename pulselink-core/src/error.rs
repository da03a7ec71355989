use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            // Map "no rows" to NotFound
            sqlx::Error::RowNotFound => Self::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().unwrap_or_default();
                match code.as_ref() {
                    // PostgreSQL unique_violation: the only unique key is the room code
                    "23505" => Self::AlreadyExists("Room code already exists".to_string()),
                    // PostgreSQL not_null_violation
                    "23502" => Self::InvalidInput("Required field is missing".to_string()),
                    _ => Self::Database(err),
                }
            }
            _ => Self::Database(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: Error = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_error_display() {
        let err = Error::Authorization("Name does not match this room".to_string());
        assert_eq!(
            err.to_string(),
            "Authorization error: Name does not match this room"
        );
    }
}
