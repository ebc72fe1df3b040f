//! Listings service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use marketplace::{
    actors::{Actor, Capability},
    businesses::BusinessType,
    listings::{BookmarkState, ListingOrdering, ListingTerms, ListingUuid},
    search::{PageRequest, PriceRange, SearchTerms},
};
use mockall::automock;
use smallvec::SmallVec;
use tracing::{Span, debug, info};

use crate::{
    domain::{
        directory::DirectoryRepository,
        inventory::InventoryRepository,
        listings::{
            ListingsServiceError,
            data::{ListingSearch, NewListing, SearchListings},
            fanout::{Sale, bookmark_effects, purchase_effects, removal_effects},
            records::{BookmarkToggle, ListingPage, ListingRecord, PurchaseOutcome},
            repository::ListingsRepository,
        },
    },
    outbox::Outbox,
    settings::EngineSettings,
};

/// The listing engine: creation, search, bookmarks, purchase and withdrawal.
#[derive(Clone)]
pub struct ListingsEngine {
    listings: Arc<dyn ListingsRepository>,
    inventory: Arc<dyn InventoryRepository>,
    directory: Arc<dyn DirectoryRepository>,
    outbox: Arc<dyn Outbox>,
    settings: EngineSettings,
}

impl ListingsEngine {
    #[must_use]
    pub fn new(
        listings: Arc<dyn ListingsRepository>,
        inventory: Arc<dyn InventoryRepository>,
        directory: Arc<dyn DirectoryRepository>,
        outbox: Arc<dyn Outbox>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            listings,
            inventory,
            directory,
            outbox,
            settings,
        }
    }

    async fn find(&self, listing: ListingUuid) -> Result<ListingRecord, ListingsServiceError> {
        self.listings
            .find_listing(listing)
            .await?
            .ok_or(ListingsServiceError::NotFound)
    }
}

#[async_trait]
impl ListingsService for ListingsEngine {
    #[tracing::instrument(
        name = "listings.service.create_listing",
        skip(self, actor, listing, now),
        fields(
            user_uuid = %actor.uuid,
            inventory_item_uuid = %listing.inventory_item_uuid,
            listing_uuid = tracing::field::Empty
        ),
        err
    )]
    async fn create_listing(
        &self,
        actor: &Actor,
        listing: NewListing,
        now: Timestamp,
    ) -> Result<ListingRecord, ListingsServiceError> {
        let item = self
            .inventory
            .find_inventory_item(listing.inventory_item_uuid)
            .await?
            .ok_or(ListingsServiceError::NotFound)?;

        if !actor.permits(&Capability::AdministerBusiness(item.business_uuid)) {
            return Err(ListingsServiceError::Forbidden);
        }

        let terms = ListingTerms::new(
            listing.quantity,
            listing.price,
            listing.more_info,
            listing.closes,
        )?;

        self.settings
            .inventory_policy
            .check_listing(item.quantity, terms.quantity)?;

        let uuid = ListingUuid::new();

        Span::current().record("listing_uuid", tracing::field::display(uuid));

        let record = self
            .listings
            .create_listing(uuid, item.uuid, terms, now)
            .await?;

        info!(
            listing_uuid = %record.uuid,
            quantity = record.quantity,
            closes_at = %record.closes_at,
            "created listing"
        );

        Ok(record)
    }

    async fn get_listing(&self, listing: ListingUuid) -> Result<ListingRecord, ListingsServiceError> {
        self.find(listing).await
    }

    #[tracing::instrument(
        name = "listings.service.search_listings",
        skip(self, search, now),
        fields(order_by = tracing::field::Empty, total = tracing::field::Empty),
        err
    )]
    async fn search_listings(
        &self,
        search: SearchListings,
        now: Timestamp,
    ) -> Result<ListingPage, ListingsServiceError> {
        let ordering = search
            .order_by
            .as_deref()
            .map(str::parse::<ListingOrdering>)
            .transpose()?
            .unwrap_or_default();

        Span::current().record("order_by", tracing::field::display(ordering));

        let business_types = search
            .business_types
            .iter()
            .map(|name| name.parse::<BusinessType>())
            .collect::<Result<SmallVec<[BusinessType; 4]>, _>>()?;

        let validated = ListingSearch {
            terms: SearchTerms::parse(search.query.as_deref().unwrap_or_default())?,
            business_types,
            price: PriceRange::new(search.min_price, search.max_price)?,
            closes_from: search.closes_from,
            closes_to: search.closes_to,
            barcode: search.barcode.filter(|barcode| !barcode.trim().is_empty()),
            ordering,
            page: PageRequest::new(search.page, search.page_size)?,
            now,
        };

        let page = self.listings.search_listings(validated).await?;

        Span::current().record("total", page.total);

        Ok(page)
    }

    #[tracing::instrument(
        name = "listings.service.toggle_bookmark",
        skip(self, actor, listing),
        fields(user_uuid = %actor.uuid, listing_uuid = %listing, bookmarked = tracing::field::Empty),
        err
    )]
    async fn toggle_bookmark(
        &self,
        actor: &Actor,
        listing: ListingUuid,
    ) -> Result<BookmarkState, ListingsServiceError> {
        let record = self.find(listing).await?;

        let state = match self.listings.toggle_bookmark(listing, actor.uuid).await? {
            BookmarkToggle::Changed(state) => {
                self.outbox
                    .publish(bookmark_effects(&record, actor.uuid, state));

                state
            }
            BookmarkToggle::AlreadyBookmarked => {
                debug!("concurrent toggle already bookmarked the listing");

                BookmarkState::Bookmarked
            }
        };

        Span::current().record("bookmarked", state.is_bookmarked());

        Ok(state)
    }

    #[tracing::instrument(
        name = "listings.service.purchase_listing",
        skip(self, actor, listing, now),
        fields(user_uuid = %actor.uuid, listing_uuid = %listing),
        err
    )]
    async fn purchase_listing(
        &self,
        actor: &Actor,
        listing: ListingUuid,
        now: Timestamp,
    ) -> Result<(), ListingsServiceError> {
        let record = self.find(listing).await?;

        let business = self
            .directory
            .find_business(record.business_uuid)
            .await?
            .ok_or_else(|| {
                ListingsServiceError::Internal(format!(
                    "listing {listing} belongs to missing business {}",
                    record.business_uuid
                ))
            })?;

        self.inventory
            .find_inventory_item(record.inventory_item_uuid)
            .await?
            .ok_or_else(|| {
                ListingsServiceError::Internal(format!(
                    "listing {listing} draws on missing inventory item {}",
                    record.inventory_item_uuid
                ))
            })?;

        let bookmarkers = match self
            .listings
            .complete_purchase(listing, self.settings.inventory_policy)
            .await?
        {
            PurchaseOutcome::Completed {
                remaining,
                bookmarkers,
            } => {
                info!(
                    listing_uuid = %listing,
                    inventory_item_uuid = %record.inventory_item_uuid,
                    remaining,
                    "listing purchased"
                );

                bookmarkers
            }
            PurchaseOutcome::ListingGone => return Err(ListingsServiceError::NotFound),
            PurchaseOutcome::InsufficientInventory {
                available,
                requested,
            } => {
                return Err(ListingsServiceError::Conflict(format!(
                    "only {available} in stock, listing needs {requested}"
                )));
            }
        };

        self.outbox.publish(purchase_effects(&Sale {
            listing: &record,
            business: &business,
            buyer: actor.uuid,
            bookmarkers: &bookmarkers,
            sold_at: now,
            currency: self.settings.currency,
        }));

        Ok(())
    }

    #[tracing::instrument(
        name = "listings.service.delete_listing",
        skip(self, actor, listing, now),
        fields(user_uuid = %actor.uuid, listing_uuid = %listing),
        err
    )]
    async fn delete_listing(
        &self,
        actor: &Actor,
        listing: ListingUuid,
        now: Timestamp,
    ) -> Result<(), ListingsServiceError> {
        let record = self.find(listing).await?;

        if now >= record.closes_at {
            return Err(ListingsServiceError::Conflict("listing is closed".to_owned()));
        }

        if !actor.permits(&Capability::DeleteListing(record.business_uuid)) {
            return Err(ListingsServiceError::Forbidden);
        }

        let bookmarkers = self.listings.list_bookmarkers(listing).await?;

        if !self.listings.delete_listing(listing).await? {
            return Err(ListingsServiceError::NotFound);
        }

        info!(listing_uuid = %listing, bookmarkers = bookmarkers.len(), "deleted listing");

        self.outbox.publish(removal_effects(&record, bookmarkers));

        Ok(())
    }

    async fn list_bookmarked(
        &self,
        actor: &Actor,
    ) -> Result<Vec<ListingRecord>, ListingsServiceError> {
        Ok(self.listings.list_bookmarked(actor.uuid).await?)
    }
}

#[automock]
#[async_trait]
pub trait ListingsService: Send + Sync {
    /// List part of an inventory item for sale.
    async fn create_listing(
        &self,
        actor: &Actor,
        listing: NewListing,
        now: Timestamp,
    ) -> Result<ListingRecord, ListingsServiceError>;

    /// Retrieve a single listing.
    async fn get_listing(&self, listing: ListingUuid) -> Result<ListingRecord, ListingsServiceError>;

    /// Search open listings.
    async fn search_listings(
        &self,
        search: SearchListings,
        now: Timestamp,
    ) -> Result<ListingPage, ListingsServiceError>;

    /// Bookmark or unbookmark a listing for the actor.
    async fn toggle_bookmark(
        &self,
        actor: &Actor,
        listing: ListingUuid,
    ) -> Result<BookmarkState, ListingsServiceError>;

    /// Buy a listing outright.
    async fn purchase_listing(
        &self,
        actor: &Actor,
        listing: ListingUuid,
        now: Timestamp,
    ) -> Result<(), ListingsServiceError>;

    /// Withdraw an open listing.
    async fn delete_listing(
        &self,
        actor: &Actor,
        listing: ListingUuid,
        now: Timestamp,
    ) -> Result<(), ListingsServiceError>;

    /// Listings the actor has bookmarked.
    async fn list_bookmarked(&self, actor: &Actor)
    -> Result<Vec<ListingRecord>, ListingsServiceError>;
}
