//! Notification Records

use jiff::Timestamp;
use marketplace::{
    businesses::BusinessUuid,
    listings::ListingUuid,
    notifications::{NotificationAudience, NotificationUuid},
    sales::SoldListingUuid,
};

/// Notification Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRecord {
    pub uuid: NotificationUuid,
    pub description: String,
    pub listing_uuid: Option<ListingUuid>,
    pub sold_listing_uuid: Option<SoldListingUuid>,
    pub business_uuid: Option<BusinessUuid>,
    pub created_at: Timestamp,
}

/// Who a stored notification is addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationTarget {
    pub uuid: NotificationUuid,
    pub audience: NotificationAudience,
}
