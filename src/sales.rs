//! Sold listings
//!
//! The immutable archive record written when a listing is purchased.

use jiff::Timestamp;
use thiserror::Error;

use crate::{actors::UserUuid, businesses::BusinessUuid, uuids::TypedUuid};

/// Sold listing identifier.
pub type SoldListingUuid = TypedUuid<SoldListing>;

/// Reasons a sale record can't be built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SoldListingError {
    /// The listing was created at or after the sale time.
    #[error("listing date {listed_at} is not before the sale date {sold_at}")]
    ListedAfterSale {
        /// Listing creation time.
        listed_at: Timestamp,

        /// Sale time.
        sold_at: Timestamp,
    },

    /// Nothing was sold.
    #[error("quantity must be at least one")]
    ZeroQuantity,

    /// The listing had no price, or a zero price.
    #[error("price must be greater than zero")]
    NoPrice,

    /// Empty product code snapshot.
    #[error("product code must not be empty")]
    MissingProductCode,
}

/// Archive record of a completed sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoldListing {
    /// Record id.
    pub uuid: SoldListingUuid,

    /// Selling business.
    pub business: BusinessUuid,

    /// Buyer.
    pub purchaser: UserUuid,

    /// When the listing was created.
    pub listed_at: Timestamp,

    /// When it sold.
    pub sold_at: Timestamp,

    /// Product code at the time of sale.
    pub product_code: String,

    /// Units sold.
    pub quantity: u32,

    /// Sale price in minor units.
    pub price: u64,

    /// Bookmarks the listing had when it sold.
    pub bookmark_count: u64,
}

/// Snapshot of a listing at the moment of purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleSnapshot {
    /// Selling business.
    pub business: BusinessUuid,

    /// Buyer.
    pub purchaser: UserUuid,

    /// When the listing was created.
    pub listed_at: Timestamp,

    /// Product code.
    pub product_code: String,

    /// Units on the listing.
    pub quantity: u32,

    /// Listing price, if any.
    pub price: Option<u64>,

    /// Current bookmark count.
    pub bookmark_count: u64,
}

impl SoldListing {
    /// Build an archive record for a sale happening at `sold_at`.
    ///
    /// # Errors
    ///
    /// Returns a [`SoldListingError`] when the snapshot breaks an archive rule.
    pub fn new(snapshot: SaleSnapshot, sold_at: Timestamp) -> Result<Self, SoldListingError> {
        if snapshot.listed_at >= sold_at {
            return Err(SoldListingError::ListedAfterSale {
                listed_at: snapshot.listed_at,
                sold_at,
            });
        }

        if snapshot.quantity == 0 {
            return Err(SoldListingError::ZeroQuantity);
        }

        let price = snapshot
            .price
            .filter(|price| *price > 0)
            .ok_or(SoldListingError::NoPrice)?;

        if snapshot.product_code.trim().is_empty() {
            return Err(SoldListingError::MissingProductCode);
        }

        Ok(Self {
            uuid: SoldListingUuid::new(),
            business: snapshot.business,
            purchaser: snapshot.purchaser,
            listed_at: snapshot.listed_at,
            sold_at,
            product_code: snapshot.product_code,
            quantity: snapshot.quantity,
            price,
            bookmark_count: snapshot.bookmark_count,
        })
    }
}
