//! Sales History Handler

use std::sync::Arc;

use marketplace::{sales::SoldListing, search::PageRequest};
use salvo::{
    oapi::{
        ToSchema,
        extract::{PathParam, QueryParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{businesses::into_status_error, extensions::*, state::State};

/// An archived sale.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SoldListingResponse {
    /// Archive record id
    pub uuid: Uuid,

    /// Buyer
    pub purchaser_uuid: Uuid,

    /// When the listing was created
    pub listed_at: String,

    /// When it sold
    pub sold_at: String,

    /// Product code at the time of sale
    pub product_code: String,

    /// Units sold
    pub quantity: u32,

    /// Sale price in minor units
    pub price: u64,

    /// Bookmarks the listing had when it sold
    pub bookmark_count: u64,
}

impl From<SoldListing> for SoldListingResponse {
    fn from(sold: SoldListing) -> Self {
        SoldListingResponse {
            uuid: sold.uuid.into(),
            purchaser_uuid: sold.purchaser.into(),
            listed_at: sold.listed_at.to_string(),
            sold_at: sold.sold_at.to_string(),
            product_code: sold.product_code,
            quantity: sold.quantity,
            price: sold.price,
            bookmark_count: sold.bookmark_count,
        }
    }
}

/// Sales History Handler
///
/// Archived sales of a business, newest first.
#[endpoint(
    tags("businesses"),
    summary = "List Sales",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Archived sales"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid page"),
        (status_code = StatusCode::FORBIDDEN, description = "Not an administrator of the business"),
        (status_code = StatusCode::NOT_FOUND, description = "Business not found"),
    ),
)]
pub(crate) async fn handler(
    business: PathParam<Uuid>,
    page: QueryParam<u32, false>,
    page_size: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<Vec<SoldListingResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;
    let page = PageRequest::new(page.into_inner(), page_size.into_inner())
        .or_400("invalid page")?;

    let sales = state
        .app
        .reports
        .sales_history(actor, business.into_inner().into(), page)
        .await
        .map_err(into_status_error)?;

    Ok(Json(sales.into_iter().map(Into::into).collect()))
}
