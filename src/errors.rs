use sea_orm::error::DbErr;

/// Unified error type for every stockbook component.
///
/// `ValidationError` and `NotFound` are expected, recoverable conditions
/// surfaced to the caller for correction. `IntegrityError` indicates a
/// defect in the calling sequence and aborts the enclosing operation with
/// no partial writes. `StoreUnavailable` is fatal to the session.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Integrity error: {0}")]
    IntegrityError(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Event error: {0}")]
    EventError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

pub trait IntoDbErr {
    fn into_db_err(self) -> DbErr;
}

impl IntoDbErr for DbErr {
    fn into_db_err(self) -> DbErr {
        self
    }
}

impl IntoDbErr for String {
    fn into_db_err(self) -> DbErr {
        DbErr::Custom(self)
    }
}

impl IntoDbErr for &str {
    fn into_db_err(self) -> DbErr {
        DbErr::Custom(self.to_string())
    }
}

impl ServiceError {
    /// Generic constructor that normalizes any supported database error input.
    pub fn db_error<E: IntoDbErr>(error: E) -> Self {
        ServiceError::DatabaseError(error.into_db_err())
    }

    /// Whether the caller can correct its input and retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ServiceError::ValidationError(_) | ServiceError::NotFound(_)
        )
    }
}
