//! Listings Repository

use async_trait::async_trait;
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use marketplace::{
    actors::UserUuid,
    businesses::BusinessUuid,
    inventory::{InventoryItemUuid, InventoryPolicy},
    listings::{BookmarkState, ListingOrdering, ListingTerms, ListingUuid, SortDirection, SortKey},
};
use mockall::automock;
use sqlx::{FromRow, Postgres, QueryBuilder, Row, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::{Db, decode_error, to_i64, to_u64},
    domain::listings::{
        data::ListingSearch,
        records::{BookmarkToggle, ListingPage, ListingRecord, PurchaseOutcome},
    },
};

const CREATE_LISTING_SQL: &str = include_str!("sql/create_listing.sql");
const FIND_LISTING_SQL: &str = include_str!("sql/find_listing.sql");
const SEARCH_LISTINGS_SQL: &str = include_str!("sql/search_listings.sql");
const COUNT_LISTINGS_SQL: &str = include_str!("sql/count_listings.sql");
const LIST_BOOKMARKED_SQL: &str = include_str!("sql/list_bookmarked.sql");
const LIST_BOOKMARKERS_SQL: &str = include_str!("sql/list_bookmarkers.sql");
const TOGGLE_BOOKMARK_SQL: &str = include_str!("sql/toggle_bookmark.sql");
const DELETE_LISTING_SQL: &str = include_str!("sql/delete_listing.sql");
const LOCK_LISTING_SQL: &str = include_str!("sql/lock_listing.sql");
const LOCK_BOOKMARKERS_SQL: &str = include_str!("sql/lock_bookmarkers.sql");
const LOCK_INVENTORY_ITEM_SQL: &str = include_str!("sql/lock_inventory_item.sql");
const SET_INVENTORY_QUANTITY_SQL: &str = include_str!("sql/set_inventory_quantity.sql");

/// Columns a free-text token is matched against.
const SEARCHABLE_COLUMNS: [&str; 5] = ["p.name", "b.name", "b.city", "b.region", "b.country"];

#[automock]
#[async_trait]
pub trait ListingsRepository: Send + Sync {
    /// Insert a validated listing.
    async fn create_listing(
        &self,
        uuid: ListingUuid,
        inventory_item: InventoryItemUuid,
        terms: ListingTerms,
        created_at: Timestamp,
    ) -> Result<ListingRecord, sqlx::Error>;

    /// Find a listing.
    async fn find_listing(&self, listing: ListingUuid)
    -> Result<Option<ListingRecord>, sqlx::Error>;

    /// Users who have the listing bookmarked.
    async fn list_bookmarkers(&self, listing: ListingUuid) -> Result<Vec<UserUuid>, sqlx::Error>;

    /// Flip the bookmark between a listing and a user in one statement.
    async fn toggle_bookmark(
        &self,
        listing: ListingUuid,
        user: UserUuid,
    ) -> Result<BookmarkToggle, sqlx::Error>;

    /// Remove a listing and its bookmarks. Returns `false` if it was already gone.
    async fn delete_listing(&self, listing: ListingUuid) -> Result<bool, sqlx::Error>;

    /// Remove a listing and draw its quantity out of stock in one transaction.
    async fn complete_purchase(
        &self,
        listing: ListingUuid,
        policy: InventoryPolicy,
    ) -> Result<PurchaseOutcome, sqlx::Error>;

    /// One page of open listings matching a search.
    async fn search_listings(&self, search: ListingSearch) -> Result<ListingPage, sqlx::Error>;

    /// Listings a user has bookmarked, soonest closing first.
    async fn list_bookmarked(&self, user: UserUuid) -> Result<Vec<ListingRecord>, sqlx::Error>;
}

#[derive(Debug, Clone)]
pub struct PgListingsRepository {
    db: Db,
}

impl PgListingsRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ListingsRepository for PgListingsRepository {
    async fn create_listing(
        &self,
        uuid: ListingUuid,
        inventory_item: InventoryItemUuid,
        terms: ListingTerms,
        created_at: Timestamp,
    ) -> Result<ListingRecord, sqlx::Error> {
        let quantity = i32::try_from(terms.quantity).map_err(|error| decode_error("quantity", error))?;
        let price = terms.price.map(|price| to_i64("price", price)).transpose()?;

        query_as::<Postgres, ListingRecord>(CREATE_LISTING_SQL)
            .bind(uuid.into_uuid())
            .bind(inventory_item.into_uuid())
            .bind(quantity)
            .bind(price)
            .bind(terms.more_info)
            .bind(SqlxTimestamp::from(created_at))
            .bind(SqlxTimestamp::from(terms.closes))
            .fetch_one(self.db.pool())
            .await
    }

    async fn find_listing(
        &self,
        listing: ListingUuid,
    ) -> Result<Option<ListingRecord>, sqlx::Error> {
        query_as::<Postgres, ListingRecord>(FIND_LISTING_SQL)
            .bind(listing.into_uuid())
            .fetch_optional(self.db.pool())
            .await
    }

    async fn list_bookmarkers(&self, listing: ListingUuid) -> Result<Vec<UserUuid>, sqlx::Error> {
        let users = query_scalar::<Postgres, Uuid>(LIST_BOOKMARKERS_SQL)
            .bind(listing.into_uuid())
            .fetch_all(self.db.pool())
            .await?;

        Ok(users.into_iter().map(UserUuid::from_uuid).collect())
    }

    async fn toggle_bookmark(
        &self,
        listing: ListingUuid,
        user: UserUuid,
    ) -> Result<BookmarkToggle, sqlx::Error> {
        let row = query(TOGGLE_BOOKMARK_SQL)
            .bind(listing.into_uuid())
            .bind(user.into_uuid())
            .fetch_one(self.db.pool())
            .await?;

        let removed: bool = row.try_get("removed")?;
        let added: bool = row.try_get("added")?;

        Ok(match (removed, added) {
            (true, _) => BookmarkToggle::Changed(BookmarkState::Unbookmarked),
            (false, true) => BookmarkToggle::Changed(BookmarkState::Bookmarked),
            (false, false) => BookmarkToggle::AlreadyBookmarked,
        })
    }

    async fn delete_listing(&self, listing: ListingUuid) -> Result<bool, sqlx::Error> {
        let deleted = query(DELETE_LISTING_SQL)
            .bind(listing.into_uuid())
            .execute(self.db.pool())
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    #[tracing::instrument(
        name = "listings.repository.complete_purchase",
        skip(self, listing, policy),
        fields(listing_uuid = %listing, policy = %policy),
        err
    )]
    async fn complete_purchase(
        &self,
        listing: ListingUuid,
        policy: InventoryPolicy,
    ) -> Result<PurchaseOutcome, sqlx::Error> {
        let mut tx = self.db.begin().await?;

        let Some(row) = query(LOCK_LISTING_SQL)
            .bind(listing.into_uuid())
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(PurchaseOutcome::ListingGone);
        };

        let quantity = u32::try_from(row.try_get::<i32, _>("quantity")?)
            .map_err(|error| decode_error("quantity", error))?;
        let item: Uuid = row.try_get("inventory_item_uuid")?;

        let bookmarkers = query_scalar::<Postgres, Uuid>(LOCK_BOOKMARKERS_SQL)
            .bind(listing.into_uuid())
            .fetch_all(&mut *tx)
            .await?;

        let available = query_scalar::<Postgres, i64>(LOCK_INVENTORY_ITEM_SQL)
            .bind(item)
            .fetch_one(&mut *tx)
            .await?;

        let Ok(remaining) = policy.decrement(available, quantity) else {
            return Ok(PurchaseOutcome::InsufficientInventory {
                available,
                requested: quantity,
            });
        };

        query(DELETE_LISTING_SQL)
            .bind(listing.into_uuid())
            .execute(&mut *tx)
            .await?;

        query(SET_INVENTORY_QUANTITY_SQL)
            .bind(item)
            .bind(remaining)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(PurchaseOutcome::Completed {
            remaining,
            bookmarkers: bookmarkers.into_iter().map(UserUuid::from_uuid).collect(),
        })
    }

    async fn search_listings(&self, search: ListingSearch) -> Result<ListingPage, sqlx::Error> {
        let mut count = QueryBuilder::<Postgres>::new(COUNT_LISTINGS_SQL);
        push_filters(&mut count, &search)?;

        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(self.db.pool())
            .await?;

        let mut select = QueryBuilder::<Postgres>::new(SEARCH_LISTINGS_SQL);
        push_filters(&mut select, &search)?;

        select
            .push(order_clause(search.ordering))
            .push(" LIMIT ")
            .push_bind(search.page.limit())
            .push(" OFFSET ")
            .push_bind(search.page.offset());

        let listings = select
            .build_query_as::<ListingRecord>()
            .fetch_all(self.db.pool())
            .await?;

        Ok(ListingPage {
            listings,
            total: to_u64("total", total)?,
            page: search.page,
        })
    }

    async fn list_bookmarked(&self, user: UserUuid) -> Result<Vec<ListingRecord>, sqlx::Error> {
        query_as::<Postgres, ListingRecord>(LIST_BOOKMARKED_SQL)
            .bind(user.into_uuid())
            .fetch_all(self.db.pool())
            .await
    }
}

/// Append the `WHERE` conditions shared by the count and page queries.
///
/// The base query ends with `l.closes_at >`, so the first bind is `now`.
fn push_filters(
    builder: &mut QueryBuilder<'_, Postgres>,
    search: &ListingSearch,
) -> Result<(), sqlx::Error> {
    builder.push_bind(SqlxTimestamp::from(search.now));

    for token in search.terms.tokens() {
        let pattern = like_pattern(token);

        builder.push(" AND (");

        for (index, column) in SEARCHABLE_COLUMNS.iter().enumerate() {
            if index > 0 {
                builder.push(" OR ");
            }

            builder
                .push(*column)
                .push(" ILIKE ")
                .push_bind(pattern.clone());
        }

        builder.push(")");
    }

    if !search.business_types.is_empty() {
        let types: Vec<String> = search
            .business_types
            .iter()
            .map(|business_type| business_type.as_str().to_owned())
            .collect();

        builder
            .push(" AND b.business_type = ANY(")
            .push_bind(types)
            .push(")");
    }

    if let Some(min) = search.price.min {
        builder
            .push(" AND l.price >= ")
            .push_bind(to_i64("min_price", min)?);
    }

    if let Some(max) = search.price.max {
        builder
            .push(" AND l.price <= ")
            .push_bind(to_i64("max_price", max)?);
    }

    if let Some(from) = search.closes_from {
        builder
            .push(" AND l.closes_at >= ")
            .push_bind(SqlxTimestamp::from(from));
    }

    if let Some(to) = search.closes_to {
        builder
            .push(" AND l.closes_at <= ")
            .push_bind(SqlxTimestamp::from(to));
    }

    if let Some(barcode) = &search.barcode {
        builder.push(" AND p.barcode = ").push_bind(barcode.clone());
    }

    Ok(())
}

/// Case-insensitive substring pattern with `LIKE` wildcards escaped.
fn like_pattern(token: &str) -> String {
    let mut pattern = String::with_capacity(token.len() + 2);

    pattern.push('%');

    for ch in token.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }

        pattern.push(ch);
    }

    pattern.push('%');

    pattern
}

/// `ORDER BY` for an ordering. Unpriced listings sort last either way and
/// ties fall back to the listing id.
fn order_clause(ordering: ListingOrdering) -> &'static str {
    match (ordering.key, ordering.direction) {
        (SortKey::Quantity, SortDirection::Ascending) => " ORDER BY l.quantity ASC, l.uuid ASC",
        (SortKey::Quantity, SortDirection::Descending) => " ORDER BY l.quantity DESC, l.uuid ASC",
        (SortKey::Price, SortDirection::Ascending) => " ORDER BY l.price ASC NULLS LAST, l.uuid ASC",
        (SortKey::Price, SortDirection::Descending) => {
            " ORDER BY l.price DESC NULLS LAST, l.uuid ASC"
        }
        (SortKey::Closes, SortDirection::Ascending) => " ORDER BY l.closes_at ASC, l.uuid ASC",
        (SortKey::Closes, SortDirection::Descending) => " ORDER BY l.closes_at DESC, l.uuid ASC",
        (SortKey::Created, SortDirection::Ascending) => " ORDER BY l.created_at ASC, l.uuid ASC",
        (SortKey::Created, SortDirection::Descending) => {
            " ORDER BY l.created_at DESC, l.uuid ASC"
        }
    }
}

impl<'r> FromRow<'r, PgRow> for ListingRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ListingUuid::from_uuid(row.try_get("uuid")?),
            inventory_item_uuid: InventoryItemUuid::from_uuid(row.try_get("inventory_item_uuid")?),
            business_uuid: BusinessUuid::from_uuid(row.try_get("business_uuid")?),
            business_name: row.try_get("business_name")?,
            product_code: row.try_get("product_code")?,
            product_name: row.try_get("product_name")?,
            quantity: u32::try_from(row.try_get::<i32, _>("quantity")?)
                .map_err(|error| decode_error("quantity", error))?,
            price: row
                .try_get::<Option<i64>, _>("price")?
                .map(|price| to_u64("price", price))
                .transpose()?,
            more_info: row.try_get("more_info")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            closes_at: row.try_get::<SqlxTimestamp, _>("closes_at")?.to_jiff(),
            bookmark_count: to_u64("bookmark_count", row.try_get("bookmark_count")?)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn like_patterns_escape_wildcards() {
        assert_eq!(like_pattern("oat"), "%oat%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn every_ordering_breaks_ties_by_id() -> TestResult {
        for key in ["quantity", "price", "closes", "created"] {
            for direction in ["ASC", "DESC"] {
                let ordering = ListingOrdering::from_str(&format!("{key}{direction}"))?;

                assert!(
                    order_clause(ordering).ends_with(", l.uuid ASC"),
                    "{ordering} must tie-break on the listing id"
                );
            }
        }

        Ok(())
    }

    #[test]
    fn unpriced_listings_sort_last_both_ways() -> TestResult {
        for ordering in ["priceASC", "priceDESC"] {
            let clause = order_clause(ordering.parse()?);

            assert!(clause.contains("NULLS LAST"), "{ordering} keeps nulls last");
        }

        Ok(())
    }

    #[test]
    fn filters_bind_in_query_order() -> TestResult {
        let search = ListingSearch {
            terms: marketplace::search::SearchTerms::parse("oat \"new zealand\"")?,
            business_types: smallvec::smallvec![marketplace::businesses::BusinessType::RetailTrade],
            price: marketplace::search::PriceRange::new(Some(100), None)?,
            closes_from: None,
            closes_to: None,
            barcode: Some("9400000000001".to_owned()),
            ordering: ListingOrdering::default(),
            page: marketplace::search::PageRequest::default(),
            now: Timestamp::UNIX_EPOCH,
        };

        let mut builder = QueryBuilder::<Postgres>::new(COUNT_LISTINGS_SQL);
        push_filters(&mut builder, &search)?;

        let sql = builder.sql();

        assert!(sql.contains("l.closes_at >\n$1"), "now is the first bind: {sql}");
        assert_eq!(sql.matches(" ILIKE ").count(), 10, "five columns per token");
        assert!(sql.contains("b.business_type = ANY($12)"), "{sql}");
        assert!(sql.contains("l.price >= $13"), "{sql}");
        assert!(sql.contains("p.barcode = $14"), "{sql}");
        assert!(!sql.contains("l.price <="), "no upper bound was given");

        Ok(())
    }
}

#[cfg(all(test, feature = "db-tests"))]
mod db_tests {
    use jiff::ToSpan;
    use marketplace::{
        inventory::{InventoryTerms, ShelfLife},
        search::{PageRequest, PriceRange, SearchTerms},
    };
    use smallvec::SmallVec;
    use testresult::TestResult;

    use super::*;
    use crate::{domain::inventory::InventoryRepository, test::TestContext};

    async fn stock(ctx: &TestContext, quantity: i64) -> TestResult<InventoryItemUuid> {
        let uuid = InventoryItemUuid::new();

        ctx.inventory
            .create_inventory_item(
                uuid,
                ctx.product_uuid,
                InventoryTerms {
                    quantity,
                    price_per_item: Some(100),
                    total_price: None,
                    shelf_life: ShelfLife {
                        manufactured: None,
                        sell_by: None,
                        best_before: None,
                        expires: jiff::civil::date(2099, 1, 1),
                    },
                },
            )
            .await?;

        Ok(uuid)
    }

    async fn list(
        ctx: &TestContext,
        item: InventoryItemUuid,
        quantity: u32,
        price: Option<u64>,
    ) -> TestResult<ListingRecord> {
        let now = Timestamp::now();
        let terms = ListingTerms::new(quantity, price, None, Some(now + 48.hours()))?;

        Ok(ctx
            .listings
            .create_listing(ListingUuid::new(), item, terms, now)
            .await?)
    }

    fn search(query: &str, now: Timestamp) -> TestResult<ListingSearch> {
        Ok(ListingSearch {
            terms: SearchTerms::parse(query)?,
            business_types: SmallVec::new(),
            price: PriceRange::default(),
            closes_from: None,
            closes_to: None,
            barcode: None,
            ordering: "priceASC".parse()?,
            page: PageRequest::default(),
            now,
        })
    }

    #[tokio::test]
    async fn creates_and_finds_listings() -> TestResult {
        let ctx = TestContext::new().await;
        let item = stock(&ctx, 5).await?;

        let created = list(&ctx, item, 3, Some(450)).await?;

        assert_eq!(created.quantity, 3);
        assert_eq!(created.price, Some(450));
        assert_eq!(created.business_uuid, ctx.business_uuid);

        let found = ctx
            .listings
            .find_listing(created.uuid)
            .await?
            .ok_or("listing should exist")?;

        assert_eq!(found, created);

        Ok(())
    }

    #[tokio::test]
    async fn bookmarks_toggle_and_count() -> TestResult {
        let ctx = TestContext::new().await;
        let item = stock(&ctx, 5).await?;
        let listing = list(&ctx, item, 1, None).await?;

        let first = ctx
            .listings
            .toggle_bookmark(listing.uuid, ctx.admin_uuid)
            .await?;
        assert_eq!(first, BookmarkToggle::Changed(BookmarkState::Bookmarked));

        assert_eq!(
            ctx.listings.list_bookmarkers(listing.uuid).await?,
            vec![ctx.admin_uuid]
        );

        let found = ctx
            .listings
            .find_listing(listing.uuid)
            .await?
            .ok_or("listing should exist")?;
        assert_eq!(found.bookmark_count, 1);

        let bookmarked = ctx.listings.list_bookmarked(ctx.admin_uuid).await?;
        assert_eq!(bookmarked.len(), 1);

        let second = ctx
            .listings
            .toggle_bookmark(listing.uuid, ctx.admin_uuid)
            .await?;
        assert_eq!(second, BookmarkToggle::Changed(BookmarkState::Unbookmarked));
        assert!(ctx.listings.list_bookmarkers(listing.uuid).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn purchase_removes_listing_and_draws_down_stock() -> TestResult {
        let ctx = TestContext::new().await;
        let item = stock(&ctx, 5).await?;
        let listing = list(&ctx, item, 5, Some(100)).await?;

        ctx.listings
            .toggle_bookmark(listing.uuid, ctx.admin_uuid)
            .await?;

        let outcome = ctx
            .listings
            .complete_purchase(listing.uuid, InventoryPolicy::Guarded)
            .await?;
        assert_eq!(
            outcome,
            PurchaseOutcome::Completed {
                remaining: 0,
                bookmarkers: vec![ctx.admin_uuid],
            }
        );
        assert!(ctx.listings.list_bookmarkers(listing.uuid).await?.is_empty());

        assert!(ctx.listings.find_listing(listing.uuid).await?.is_none());

        let again = ctx
            .listings
            .complete_purchase(listing.uuid, InventoryPolicy::Guarded)
            .await?;
        assert_eq!(again, PurchaseOutcome::ListingGone);

        Ok(())
    }

    #[tokio::test]
    async fn guarded_purchases_never_go_negative() -> TestResult {
        let ctx = TestContext::new().await;
        let item = stock(&ctx, 5).await?;
        let first = list(&ctx, item, 4, None).await?;
        let second = list(&ctx, item, 4, None).await?;

        ctx.listings
            .complete_purchase(first.uuid, InventoryPolicy::Guarded)
            .await?;

        let refused = ctx
            .listings
            .complete_purchase(second.uuid, InventoryPolicy::Guarded)
            .await?;
        assert_eq!(
            refused,
            PurchaseOutcome::InsufficientInventory {
                available: 1,
                requested: 4
            }
        );
        assert!(ctx.listings.find_listing(second.uuid).await?.is_some());

        let permitted = ctx
            .listings
            .complete_purchase(second.uuid, InventoryPolicy::Permissive)
            .await?;
        assert_eq!(
            permitted,
            PurchaseOutcome::Completed {
                remaining: -3,
                bookmarkers: Vec::new(),
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn search_matches_every_token_and_orders_by_price() -> TestResult {
        let ctx = TestContext::new().await;
        let item = stock(&ctx, 10).await?;

        let cheap = list(&ctx, item, 1, Some(100)).await?;
        let dear = list(&ctx, item, 1, Some(900)).await?;
        let free = list(&ctx, item, 1, None).await?;

        let page = ctx
            .listings
            .search_listings(search("oat wellington", Timestamp::now())?)
            .await?;

        let order: Vec<_> = page.listings.iter().map(|listing| listing.uuid).collect();
        assert_eq!(order, vec![cheap.uuid, dear.uuid, free.uuid]);
        assert_eq!(page.total, 3);

        let none = ctx
            .listings
            .search_listings(search("oat auckland", Timestamp::now())?)
            .await?;
        assert_eq!(none.total, 0);

        let bounded = ctx
            .listings
            .search_listings(ListingSearch {
                price: PriceRange::new(Some(500), None)?,
                ..search("", Timestamp::now())?
            })
            .await?;
        assert_eq!(bounded.total, 1, "unpriced listings fail any price bound");

        let later = ctx
            .listings
            .search_listings(search("", Timestamp::now() + 72.hours())?)
            .await?;
        assert_eq!(later.total, 0, "closed listings are hidden");

        Ok(())
    }

    #[tokio::test]
    async fn deleting_twice_reports_absence() -> TestResult {
        let ctx = TestContext::new().await;
        let item = stock(&ctx, 1).await?;
        let listing = list(&ctx, item, 1, None).await?;

        assert!(ctx.listings.delete_listing(listing.uuid).await?);
        assert!(!ctx.listings.delete_listing(listing.uuid).await?);

        Ok(())
    }
}
