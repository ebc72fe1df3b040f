//! Create Listing Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use marketplace_app::domain::listings::data::NewListing;

use crate::{extensions::*, listings::into_status_error, state::State};

/// Create Listing Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateListingRequest {
    /// Inventory item to offer
    pub inventory_item_uuid: Uuid,

    /// Units to offer
    pub quantity: u32,

    /// Asking price in minor units; omit to give the item away
    pub price: Option<u64>,

    /// Free-text details, up to 250 characters
    pub more_info: Option<String>,

    /// RFC 3339 instant after which the listing is no longer offered
    pub closes: Option<String>,
}

impl CreateListingRequest {
    fn into_new_listing(self) -> Result<NewListing, StatusError> {
        let closes = self
            .closes
            .as_deref()
            .map(str::parse::<Timestamp>)
            .transpose()
            .or_400("could not parse \"closes\"")?;

        Ok(NewListing {
            inventory_item_uuid: self.inventory_item_uuid.into(),
            quantity: self.quantity,
            price: self.price,
            more_info: self.more_info,
            closes,
        })
    }
}

/// Listing Created Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ListingCreatedResponse {
    /// Created listing UUID
    pub uuid: Uuid,
}

/// Create Listing Handler
#[endpoint(
    tags("listings"),
    summary = "Create Listing",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Listing created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid listing"),
        (status_code = StatusCode::FORBIDDEN, description = "Not an administrator of the business"),
        (status_code = StatusCode::NOT_FOUND, description = "Inventory item not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateListingRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ListingCreatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;
    let listing = json.into_inner().into_new_listing()?;

    let uuid = state
        .app
        .listings
        .create_listing(actor, listing, Timestamp::now())
        .await
        .map_err(into_status_error)?
        .uuid;

    res.add_header(LOCATION, format!("/listings/{uuid}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(ListingCreatedResponse { uuid: uuid.into() }))
}
