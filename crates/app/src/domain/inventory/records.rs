//! Inventory Records

use jiff::{Timestamp, civil::Date};
use marketplace::{
    businesses::BusinessUuid,
    inventory::{InventoryItemUuid, ProductUuid},
};

/// Inventory Item Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItemRecord {
    pub uuid: InventoryItemUuid,
    pub product_uuid: ProductUuid,
    pub business_uuid: BusinessUuid,
    pub product_code: String,
    pub product_name: String,
    pub quantity: i64,
    pub price_per_item: Option<u64>,
    pub total_price: Option<u64>,
    pub manufactured: Option<Date>,
    pub sell_by: Option<Date>,
    pub best_before: Option<Date>,
    pub expires: Date,
    pub created_at: Timestamp,
}
