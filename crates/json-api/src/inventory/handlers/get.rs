//! Get Inventory Item Handler

use std::{string::ToString, sync::Arc};

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use marketplace_app::domain::inventory::records::InventoryItemRecord;

use crate::{extensions::*, inventory::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct InventoryItemResponse {
    /// Inventory item id
    pub uuid: Uuid,

    /// Product this batch is of
    pub product_uuid: Uuid,

    /// Owning business
    pub business_uuid: Uuid,

    /// Product code
    pub product_code: String,

    /// Product name
    pub product_name: String,

    /// Units on hand; negative when oversold
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

    /// When the batch was registered
    pub created_at: String,
}

impl From<InventoryItemRecord> for InventoryItemResponse {
    fn from(item: InventoryItemRecord) -> Self {
        InventoryItemResponse {
            uuid: item.uuid.into(),
            product_uuid: item.product_uuid.into(),
            business_uuid: item.business_uuid.into(),
            product_code: item.product_code,
            product_name: item.product_name,
            quantity: item.quantity,
            price_per_item: item.price_per_item,
            total_price: item.total_price,
            manufactured: item.manufactured.as_ref().map(ToString::to_string),
            sell_by: item.sell_by.as_ref().map(ToString::to_string),
            best_before: item.best_before.as_ref().map(ToString::to_string),
            expires: item.expires.to_string(),
            created_at: item.created_at.to_string(),
        }
    }
}

/// Get Inventory Item Handler
#[endpoint(
    tags("inventory"),
    summary = "Get Inventory Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Inventory item found"),
        (status_code = StatusCode::NOT_FOUND, description = "Inventory item not found"),
    ),
)]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<InventoryItemResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let item = state
        .app
        .inventory
        .get_item(item.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(item.into()))
}

#[cfg(test)]
pub(crate) mod tests {
    use jiff::{Timestamp, civil::date};
    use marketplace::inventory::{InventoryItemUuid, ProductUuid};
    use marketplace_app::domain::inventory::InventoryServiceError;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_BUSINESS_UUID};

    use super::*;

    pub(crate) fn make_item(uuid: InventoryItemUuid) -> InventoryItemRecord {
        InventoryItemRecord {
            uuid,
            product_uuid: ProductUuid::new(),
            business_uuid: TEST_BUSINESS_UUID,
            product_code: "OAT-1L".to_owned(),
            product_name: "Oat Milk 1L".to_owned(),
            quantity: 12,
            price_per_item: Some(250),
            total_price: None,
            manufactured: None,
            sell_by: None,
            best_before: Some(date(2030, 6, 1)),
            expires: date(2030, 6, 8),
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn make_service(mocks: Mocks) -> Service {
        mocks.service(Router::with_path("inventory/{item}").get(handler))
    }

    #[tokio::test]
    async fn returns_the_item() -> TestResult {
        let uuid = InventoryItemUuid::new();
        let item = make_item(uuid);

        let mut mocks = Mocks::default();
        mocks
            .inventory
            .expect_get_item()
            .once()
            .withf(move |requested| *requested == uuid)
            .return_once(move |_| Ok(item));

        let mut res = TestClient::get(format!("http://example.com/inventory/{uuid}"))
            .send(&make_service(mocks))
            .await;

        let body: InventoryItemResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.quantity, 12);
        assert_eq!(body.best_before.as_deref(), Some("2030-06-01"));
        assert_eq!(body.expires, "2030-06-08");

        Ok(())
    }

    #[tokio::test]
    async fn missing_items_return_404() {
        let mut mocks = Mocks::default();
        mocks
            .inventory
            .expect_get_item()
            .once()
            .return_once(|_| Err(InventoryServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/inventory/{}", Uuid::now_v7()))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }
}
