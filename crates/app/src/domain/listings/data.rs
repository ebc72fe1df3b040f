//! Listing Data

use jiff::Timestamp;
use marketplace::{
    businesses::BusinessType,
    inventory::InventoryItemUuid,
    listings::ListingOrdering,
    search::{PageRequest, PriceRange, SearchTerms},
};
use smallvec::SmallVec;

/// New Listing Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewListing {
    pub inventory_item_uuid: InventoryItemUuid,
    pub quantity: u32,
    pub price: Option<u64>,
    pub more_info: Option<String>,
    pub closes: Option<Timestamp>,
}

/// Search filters as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchListings {
    pub query: Option<String>,
    pub business_types: Vec<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub closes_from: Option<Timestamp>,
    pub closes_to: Option<Timestamp>,
    pub barcode: Option<String>,
    pub order_by: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Validated search, ready for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingSearch {
    pub terms: SearchTerms,
    pub business_types: SmallVec<[BusinessType; 4]>,
    pub price: PriceRange,
    pub closes_from: Option<Timestamp>,
    pub closes_to: Option<Timestamp>,
    pub barcode: Option<String>,
    pub ordering: ListingOrdering,
    pub page: PageRequest,

    /// Listings closing at or before this instant are excluded.
    pub now: Timestamp,
}
