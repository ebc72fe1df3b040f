//! Sales Errors

use salvo::http::StatusError;
use tracing::error;

use marketplace_app::domain::sales::SalesServiceError;

pub(crate) fn into_status_error(error: SalesServiceError) -> StatusError {
    match error {
        SalesServiceError::NotFound => StatusError::not_found().brief("Business not found"),
        SalesServiceError::Forbidden => {
            StatusError::forbidden().brief("Not permitted to view this business's sales")
        }
        SalesServiceError::InvalidArgument(reason) => StatusError::bad_request().brief(reason),
        SalesServiceError::Sql(source) => {
            error!("sales storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
