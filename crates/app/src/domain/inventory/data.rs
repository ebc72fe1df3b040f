//! Inventory Data

use jiff::civil::Date;
use marketplace::inventory::ProductUuid;

/// New Inventory Item
#[derive(Debug, Clone, PartialEq)]
pub struct NewInventoryItem {
    pub product_uuid: ProductUuid,
    pub quantity: i64,
    pub price_per_item: Option<u64>,
    pub total_price: Option<u64>,
    pub manufactured: Option<Date>,
    pub sell_by: Option<Date>,
    pub best_before: Option<Date>,
    pub expires: Date,
}
