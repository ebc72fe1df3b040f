//! Side effects of listing transitions.
//!
//! Anything that cannot be built is logged and left out; the transition it
//! belongs to still goes ahead.

use jiff::Timestamp;
use marketplace::{
    actors::UserUuid,
    listings::BookmarkState,
    notifications::{
        ListingNotification, SoldListingNotification, bookmark_message, listing_removed_message,
        purchase_message, sold_message,
    },
    pricing::format_price,
    sales::{SaleSnapshot, SoldListing},
};
use rusty_money::iso::Currency;
use tracing::{error, warn};

use crate::{
    domain::{directory::records::BusinessRecord, listings::records::ListingRecord},
    outbox::SideEffect,
};

/// Everything known about a listing at the moment it sells.
#[derive(Debug)]
pub(crate) struct Sale<'a> {
    pub listing: &'a ListingRecord,
    pub business: &'a BusinessRecord,
    pub buyer: UserUuid,
    pub bookmarkers: &'a [UserUuid],
    pub sold_at: Timestamp,
    pub currency: &'static Currency,
}

/// Archive record, seller notice, buyer receipt and a notice to everyone
/// else who had the listing bookmarked.
pub(crate) fn purchase_effects(sale: &Sale<'_>) -> Vec<SideEffect> {
    let listing = sale.listing;
    let price = listing.price.map(|price| format_price(price, sale.currency));
    let mut effects = Vec::with_capacity(4);

    let snapshot = SaleSnapshot {
        business: sale.business.uuid,
        purchaser: sale.buyer,
        listed_at: listing.created_at,
        product_code: listing.product_code.clone(),
        quantity: listing.quantity,
        price: listing.price,
        bookmark_count: u64::try_from(sale.bookmarkers.len()).unwrap_or(u64::MAX),
    };

    match SoldListing::new(snapshot, sale.sold_at) {
        Ok(sold) => {
            let description = sold_message(
                &listing.product_name,
                sold.quantity,
                &format_price(sold.price, sale.currency),
            );

            let notification = SoldListingNotification::new(&sold, sale.business.uuid, description);

            effects.push(SideEffect::ArchiveSale(sold));

            match notification {
                Ok(notification) => effects.push(SideEffect::NotifyBusiness(notification)),
                Err(error) => warn!(
                    listing_uuid = %listing.uuid,
                    business_uuid = %sale.business.uuid,
                    %error,
                    "skipping sale notification"
                ),
            }
        }
        Err(error) => error!(
            listing_uuid = %listing.uuid,
            business_uuid = %sale.business.uuid,
            purchaser_uuid = %sale.buyer,
            product_code = %listing.product_code,
            quantity = listing.quantity,
            price = ?listing.price,
            %error,
            "sold listing rejected, sale will not be archived"
        ),
    }

    let receipt = purchase_message(
        &listing.product_name,
        listing.quantity,
        price.as_deref(),
        &sale.business.address,
    );

    push_listing_notice(&mut effects, listing, receipt, vec![sale.buyer]);

    let others: Vec<UserUuid> = sale
        .bookmarkers
        .iter()
        .copied()
        .filter(|user| *user != sale.buyer)
        .collect();

    if !others.is_empty() {
        push_listing_notice(
            &mut effects,
            listing,
            listing_removed_message(&listing.product_name),
            others,
        );
    }

    effects
}

/// Confirmation to the user who toggled a bookmark.
pub(crate) fn bookmark_effects(
    listing: &ListingRecord,
    user: UserUuid,
    state: BookmarkState,
) -> Vec<SideEffect> {
    let mut effects = Vec::with_capacity(1);

    push_listing_notice(
        &mut effects,
        listing,
        bookmark_message(&listing.product_name, state),
        vec![user],
    );

    effects
}

/// Notice to everyone who had a withdrawn listing bookmarked.
pub(crate) fn removal_effects(listing: &ListingRecord, bookmarkers: Vec<UserUuid>) -> Vec<SideEffect> {
    let mut effects = Vec::with_capacity(1);

    if !bookmarkers.is_empty() {
        push_listing_notice(
            &mut effects,
            listing,
            listing_removed_message(&listing.product_name),
            bookmarkers,
        );
    }

    effects
}

fn push_listing_notice(
    effects: &mut Vec<SideEffect>,
    listing: &ListingRecord,
    description: String,
    recipients: Vec<UserUuid>,
) {
    let count = recipients.len();

    match ListingNotification::new(listing.uuid, description, recipients) {
        Ok(notification) => effects.push(SideEffect::NotifyUsers(notification)),
        Err(error) => warn!(
            listing_uuid = %listing.uuid,
            recipients = count,
            %error,
            "skipping listing notification"
        ),
    }
}
