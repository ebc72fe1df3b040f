//! Listing Records

use jiff::Timestamp;
use marketplace::{
    actors::UserUuid,
    businesses::BusinessUuid,
    inventory::InventoryItemUuid,
    listings::{BookmarkState, ListingUuid},
    search::PageRequest,
};

/// Listing Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRecord {
    pub uuid: ListingUuid,
    pub inventory_item_uuid: InventoryItemUuid,
    pub business_uuid: BusinessUuid,
    pub business_name: String,
    pub product_code: String,
    pub product_name: String,
    pub quantity: u32,
    pub price: Option<u64>,
    pub more_info: Option<String>,
    pub created_at: Timestamp,
    pub closes_at: Timestamp,
    pub bookmark_count: u64,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    pub listings: Vec<ListingRecord>,

    /// Matches across all pages.
    pub total: u64,

    pub page: PageRequest,
}

/// Result of the purchase transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// The listing was removed and the stock drawn down. `bookmarkers` is
    /// read under the listing lock, so it is everyone whose bookmark went
    /// with the listing.
    Completed {
        remaining: i64,
        bookmarkers: Vec<UserUuid>,
    },

    /// Another caller removed the listing first.
    ListingGone,

    /// The guarded policy refused to take stock below zero.
    InsufficientInventory { available: i64, requested: u32 },
}

/// Result of a bookmark toggle statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkToggle {
    /// This call added or removed the bookmark.
    Changed(BookmarkState),

    /// A concurrent toggle by the same user inserted the bookmark first;
    /// nothing changed here.
    AlreadyBookmarked,
}
