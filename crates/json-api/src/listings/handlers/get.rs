//! Get Listing Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use marketplace_app::domain::listings::records::ListingRecord;

use crate::{extensions::*, listings::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ListingResponse {
    /// Listing id
    pub uuid: Uuid,

    /// Inventory item the listing draws from
    pub inventory_item_uuid: Uuid,

    /// Selling business
    pub business_uuid: Uuid,

    /// Selling business name
    pub business_name: String,

    /// Product code
    pub product_code: String,

    /// Product name
    pub product_name: String,

    /// Units offered
    pub quantity: u32,

    /// Asking price in minor units, absent when free
    pub price: Option<u64>,

    /// Free-text details from the seller
    pub more_info: Option<String>,

    /// When the listing was created
    pub created_at: String,

    /// When the listing stops being offered
    pub closes_at: String,

    /// Number of users who bookmarked the listing
    pub bookmark_count: u64,
}

impl From<ListingRecord> for ListingResponse {
    fn from(listing: ListingRecord) -> Self {
        ListingResponse {
            uuid: listing.uuid.into(),
            inventory_item_uuid: listing.inventory_item_uuid.into(),
            business_uuid: listing.business_uuid.into(),
            business_name: listing.business_name,
            product_code: listing.product_code,
            product_name: listing.product_name,
            quantity: listing.quantity,
            price: listing.price,
            more_info: listing.more_info,
            created_at: listing.created_at.to_string(),
            closes_at: listing.closes_at.to_string(),
            bookmark_count: listing.bookmark_count,
        }
    }
}

/// Get Listing Handler
#[endpoint(
    tags("listings"),
    summary = "Get Listing",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Listing found"),
        (status_code = StatusCode::NOT_FOUND, description = "Listing not found"),
    ),
)]
pub(crate) async fn handler(
    listing: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ListingResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let listing = state
        .app
        .listings
        .get_listing(listing.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(listing.into()))
}
