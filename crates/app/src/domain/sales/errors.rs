//! Sales service errors.

use marketplace::{reports::ReportError, search::SearchError};
use sqlx::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SalesServiceError {
    #[error("business not found")]
    NotFound,

    #[error("not permitted to view this business's sales")]
    Forbidden,

    #[error("{0}")]
    InvalidArgument(String),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for SalesServiceError {
    fn from(error: Error) -> Self {
        match error {
            Error::RowNotFound => Self::NotFound,
            error => Self::Sql(error),
        }
    }
}

impl From<ReportError> for SalesServiceError {
    fn from(error: ReportError) -> Self {
        Self::InvalidArgument(error.to_string())
    }
}

impl From<SearchError> for SalesServiceError {
    fn from(error: SearchError) -> Self {
        Self::InvalidArgument(error.to_string())
    }
}
