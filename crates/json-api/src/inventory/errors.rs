//! Inventory Errors

use salvo::http::StatusError;
use tracing::error;

use marketplace_app::domain::inventory::InventoryServiceError;

pub(crate) fn into_status_error(error: InventoryServiceError) -> StatusError {
    match error {
        InventoryServiceError::NotFound => {
            StatusError::not_found().brief("Inventory item or product not found")
        }
        InventoryServiceError::Forbidden => {
            StatusError::forbidden().brief("Not permitted to manage this business's inventory")
        }
        InventoryServiceError::AlreadyExists => {
            StatusError::conflict().brief("Inventory item already exists")
        }
        InventoryServiceError::InvalidArgument(reason) => StatusError::bad_request().brief(reason),
        InventoryServiceError::Sql(source) => {
            error!("inventory storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
