//! Register Inventory Item Handler

use std::sync::Arc;

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use marketplace_app::domain::inventory::data::NewInventoryItem;

use crate::{
    extensions::*,
    inventory::{get::InventoryItemResponse, into_status_error},
    state::State,
};

/// Register Inventory Item Request
///
/// Dates are `YYYY-MM-DD`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateInventoryItemRequest {
    /// Product the batch is of
    pub product_uuid: Uuid,

    /// Units on hand
    pub quantity: i64,

    /// Price per unit in minor units
    pub price_per_item: Option<u64>,

    /// Price of the whole batch in minor units
    pub total_price: Option<u64>,

    /// Manufacture date
    pub manufactured: Option<String>,

    /// Sell-by date
    pub sell_by: Option<String>,

    /// Best-before date
    pub best_before: Option<String>,

    /// Expiry date
    pub expires: String,
}

impl CreateInventoryItemRequest {
    fn into_new_item(self) -> Result<NewInventoryItem, StatusError> {
        Ok(NewInventoryItem {
            product_uuid: self.product_uuid.into(),
            quantity: self.quantity,
            price_per_item: self.price_per_item,
            total_price: self.total_price,
            manufactured: parse_date(self.manufactured.as_deref(), "manufactured")?,
            sell_by: parse_date(self.sell_by.as_deref(), "sell_by")?,
            best_before: parse_date(self.best_before.as_deref(), "best_before")?,
            expires: self.expires.parse::<Date>().or_400("could not parse \"expires\"")?,
        })
    }
}

fn parse_date(value: Option<&str>, name: &str) -> Result<Option<Date>, StatusError> {
    value
        .map(str::parse::<Date>)
        .transpose()
        .or_400(&format!("could not parse \"{name}\""))
}

/// Register Inventory Item Handler
#[endpoint(
    tags("inventory"),
    summary = "Register Inventory Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Inventory item registered"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid inventory item"),
        (status_code = StatusCode::FORBIDDEN, description = "Not an administrator of the business"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateInventoryItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<InventoryItemResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;
    let item = json.into_inner().into_new_item()?;
    let today = Timestamp::now().to_zoned(TimeZone::UTC).date();

    let item = state
        .app
        .inventory
        .register_item(actor, item, today)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/inventory/{}", item.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(item.into()))
}
