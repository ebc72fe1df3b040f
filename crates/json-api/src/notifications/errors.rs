//! Notification Errors

use salvo::http::StatusError;
use tracing::error;

use marketplace_app::domain::notifications::NotificationsServiceError;

pub(crate) fn into_status_error(error: NotificationsServiceError) -> StatusError {
    match error {
        NotificationsServiceError::NotFound => {
            StatusError::not_found().brief("Notification not found")
        }
        NotificationsServiceError::Forbidden => {
            StatusError::forbidden().brief("Not permitted to manage these notifications")
        }
        NotificationsServiceError::Sql(source) => {
            error!("notification storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
