//! Listing Errors

use salvo::http::StatusError;
use tracing::error;

use marketplace_app::domain::listings::ListingsServiceError;

pub(crate) fn into_status_error(error: ListingsServiceError) -> StatusError {
    match error {
        ListingsServiceError::NotFound => StatusError::not_found().brief("Listing not found"),
        ListingsServiceError::Forbidden => {
            StatusError::forbidden().brief("Not permitted to manage this listing")
        }
        ListingsServiceError::InvalidArgument(reason) => StatusError::bad_request().brief(reason),
        ListingsServiceError::Conflict(reason) => StatusError::conflict().brief(reason),
        ListingsServiceError::Internal(reason) => {
            error!("listing operation failed: {reason}");

            StatusError::internal_server_error()
        }
        ListingsServiceError::Sql(source) => {
            error!("listing storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
