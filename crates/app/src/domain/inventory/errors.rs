//! Inventory service errors.

use marketplace::inventory::InventoryError;
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryServiceError {
    #[error("inventory item not found")]
    NotFound,

    #[error("not permitted to manage this business's inventory")]
    Forbidden,

    #[error("inventory item already exists")]
    AlreadyExists,

    #[error("{0}")]
    InvalidArgument(String),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for InventoryServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::NotFound,
            Some(ErrorKind::CheckViolation | ErrorKind::NotNullViolation) => {
                Self::InvalidArgument("inventory item violates a storage constraint".to_owned())
            }
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<InventoryError> for InventoryServiceError {
    fn from(error: InventoryError) -> Self {
        Self::InvalidArgument(error.to_string())
    }
}
