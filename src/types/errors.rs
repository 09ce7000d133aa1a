use std::fmt;

/// Errors surfaced by the bookmark store and its collaborators.
///
/// A missing update/delete target is deliberately not represented here — absence
/// is reported as a boolean flag by the store, not as an error.
#[derive(Debug)]
pub enum StoreError {
    /// A record entering the store is missing a required field.
    Validation(String),
    /// A uniqueness or index constraint was violated.
    ConstraintViolation(String),
    /// The storage engine could not be opened, including contention from
    /// another open handle (SQLite busy/locked).
    StorageUnavailable(String),
    /// Any other storage-engine failure (I/O, commit failure).
    DatabaseError(String),
    /// An import payload is not valid JSON or not an array of objects.
    MalformedInterchange(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Validation(msg) => write!(f, "Validation failed: {}", msg),
            StoreError::ConstraintViolation(msg) => {
                write!(f, "Constraint violation: {}", msg)
            }
            StoreError::StorageUnavailable(msg) => {
                write!(f, "Storage unavailable: {}", msg)
            }
            StoreError::DatabaseError(msg) => write!(f, "Bookmark database error: {}", msg),
            StoreError::MalformedInterchange(msg) => {
                write!(f, "Malformed interchange payload: {}", msg)
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    /// Classifies engine failures: constraint codes become `ConstraintViolation`,
    /// busy/locked codes become `StorageUnavailable`, everything else is an
    /// opaque `DatabaseError`.
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _) => match inner.code {
                rusqlite::ErrorCode::ConstraintViolation => {
                    StoreError::ConstraintViolation(err.to_string())
                }
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked => {
                    StoreError::StorageUnavailable(err.to_string())
                }
                _ => StoreError::DatabaseError(err.to_string()),
            },
            _ => StoreError::DatabaseError(err.to_string()),
        }
    }
}
