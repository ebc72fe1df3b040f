//! Listings service errors.

use marketplace::{
    businesses::UnknownBusinessType, inventory::InventoryError, listings::ListingError,
    search::SearchError,
};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ListingsServiceError {
    #[error("listing not found")]
    NotFound,

    #[error("not permitted to manage this listing")]
    Forbidden,

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for ListingsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::Conflict("listing already exists".to_owned()),
            Some(ErrorKind::ForeignKeyViolation) => Self::NotFound,
            Some(ErrorKind::CheckViolation | ErrorKind::NotNullViolation) => {
                Self::InvalidArgument("listing violates a storage constraint".to_owned())
            }
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<ListingError> for ListingsServiceError {
    fn from(error: ListingError) -> Self {
        Self::InvalidArgument(error.to_string())
    }
}

impl From<SearchError> for ListingsServiceError {
    fn from(error: SearchError) -> Self {
        Self::InvalidArgument(error.to_string())
    }
}

impl From<UnknownBusinessType> for ListingsServiceError {
    fn from(error: UnknownBusinessType) -> Self {
        Self::InvalidArgument(error.to_string())
    }
}

impl From<InventoryError> for ListingsServiceError {
    fn from(error: InventoryError) -> Self {
        Self::InvalidArgument(error.to_string())
    }
}
