//! Notifications
//!
//! Notification records created as side effects of listing changes, and the
//! wording used for each of them.

use std::fmt;

use thiserror::Error;

use crate::{
    actors::UserUuid,
    businesses::{Address, BusinessUuid},
    listings::{BookmarkState, ListingUuid},
    sales::{SoldListing, SoldListingUuid},
    uuids::TypedUuid,
};

/// Shortest allowed description, in characters.
pub const DESCRIPTION_MIN_CHARS: usize = 10;

/// Longest allowed description, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 600;

/// Notification
#[derive(Debug)]
pub struct Notification;

/// Notification identifier.
pub type NotificationUuid = TypedUuid<Notification>;

/// Notification construction errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// Description length outside the allowed range.
    #[error(
        "description must be between {DESCRIPTION_MIN_CHARS} and {DESCRIPTION_MAX_CHARS} characters, got {0}"
    )]
    DescriptionLength(usize),

    /// A listing notification with nobody to tell.
    #[error("notification has no recipients")]
    NoRecipients,

    /// Sold-listing notification addressed to a business other than the seller.
    #[error("notification business does not match the sold listing")]
    BusinessMismatch,
}

/// Validated notification text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description(String);

impl Description {
    /// Validate a description.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::DescriptionLength`] when the text is too
    /// short or too long.
    pub fn new(text: impl Into<String>) -> Result<Self, NotificationError> {
        let text = text.into();
        let length = text.chars().count();

        if !(DESCRIPTION_MIN_CHARS..=DESCRIPTION_MAX_CHARS).contains(&length) {
            return Err(NotificationError::DescriptionLength(length));
        }

        Ok(Self(text))
    }

    /// The text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who a notification is addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationAudience {
    /// Individual users.
    Users(Vec<UserUuid>),

    /// A business's administrators.
    Business(BusinessUuid),
}

/// A notification about a listing, sent to one or more users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingNotification {
    /// Notification id.
    pub uuid: NotificationUuid,

    /// Listing the notification is about. May no longer exist.
    pub listing: ListingUuid,

    /// Text shown to recipients.
    pub description: Description,

    /// Users to notify.
    pub recipients: Vec<UserUuid>,
}

impl ListingNotification {
    /// Build a listing notification.
    ///
    /// # Errors
    ///
    /// Returns an error when the description is invalid or there are no
    /// recipients.
    pub fn new(
        listing: ListingUuid,
        description: impl Into<String>,
        recipients: Vec<UserUuid>,
    ) -> Result<Self, NotificationError> {
        if recipients.is_empty() {
            return Err(NotificationError::NoRecipients);
        }

        Ok(Self {
            uuid: NotificationUuid::new(),
            listing,
            description: Description::new(description)?,
            recipients,
        })
    }
}

/// A notification to a business about one of its sales.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoldListingNotification {
    /// Notification id.
    pub uuid: NotificationUuid,

    /// The sale.
    pub sold_listing: SoldListingUuid,

    /// Business to notify.
    pub business: BusinessUuid,

    /// Text shown to the business.
    pub description: Description,
}

impl SoldListingNotification {
    /// Build a notification for `sold`, addressed to `business`.
    ///
    /// # Errors
    ///
    /// Returns an error when the description is invalid or `business` is not
    /// the seller.
    pub fn new(
        sold: &SoldListing,
        business: BusinessUuid,
        description: impl Into<String>,
    ) -> Result<Self, NotificationError> {
        if sold.business != business {
            return Err(NotificationError::BusinessMismatch);
        }

        Ok(Self {
            uuid: NotificationUuid::new(),
            sold_listing: sold.uuid,
            business,
            description: Description::new(description)?,
        })
    }
}

/// Text for a bookmark toggle.
#[must_use]
pub fn bookmark_message(product_name: &str, state: BookmarkState) -> String {
    match state {
        BookmarkState::Bookmarked => {
            format!("The listing for {product_name} has been added to your bookmarks.")
        }
        BookmarkState::Unbookmarked => {
            format!("The listing for {product_name} has been removed from your bookmarks.")
        }
    }
}

/// Text sent to a buyer after a purchase.
#[must_use]
pub fn purchase_message(
    product_name: &str,
    quantity: u32,
    price: Option<&str>,
    pickup: &Address,
) -> String {
    let price = price.unwrap_or("no charge");

    format!(
        "You purchased {quantity} x {product_name} for {price}. Collect it from {pickup}."
    )
}

/// Text sent to bookmarkers when a listing disappears.
#[must_use]
pub fn listing_removed_message(product_name: &str) -> String {
    format!("The listing for {product_name} that you bookmarked is no longer available.")
}

/// Text sent to a business when one of its listings sells.
#[must_use]
pub fn sold_message(product_name: &str, quantity: u32, price: &str) -> String {
    format!("Your listing of {quantity} x {product_name} sold for {price}.")
}
