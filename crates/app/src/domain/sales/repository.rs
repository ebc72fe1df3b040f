//! Sales Repository

use async_trait::async_trait;
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use marketplace::{
    actors::UserUuid,
    businesses::BusinessUuid,
    reports::SaleEntry,
    sales::{SoldListing, SoldListingUuid},
    search::PageRequest,
};
use mockall::automock;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as};

use crate::database::{Db, decode_error, to_i64, to_u64};

const CREATE_SOLD_LISTING_SQL: &str = include_str!("sql/create_sold_listing.sql");
const LIST_SALES_SQL: &str = include_str!("sql/list_sales.sql");
const LIST_SOLD_LISTINGS_SQL: &str = include_str!("sql/list_sold_listings.sql");

/// The sold-listing archive.
#[automock]
#[async_trait]
pub trait SalesRepository: Send + Sync {
    /// Archive a sale. Archiving the same sale twice is a no-op.
    async fn create_sold_listing(&self, sold: &SoldListing) -> Result<(), sqlx::Error>;

    /// Sales of a business between two instants, inclusive.
    async fn list_sales(
        &self,
        business: BusinessUuid,
        from: Timestamp,
        until: Timestamp,
    ) -> Result<Vec<SaleEntry>, sqlx::Error>;

    /// A page of a business's sales, newest first.
    async fn list_sold_listings(
        &self,
        business: BusinessUuid,
        page: PageRequest,
    ) -> Result<Vec<SoldListing>, sqlx::Error>;
}

#[derive(Debug, Clone)]
pub struct PgSalesRepository {
    db: Db,
}

impl PgSalesRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SalesRepository for PgSalesRepository {
    async fn create_sold_listing(&self, sold: &SoldListing) -> Result<(), sqlx::Error> {
        query(CREATE_SOLD_LISTING_SQL)
            .bind(sold.uuid.into_uuid())
            .bind(sold.business.into_uuid())
            .bind(sold.purchaser.into_uuid())
            .bind(SqlxTimestamp::from(sold.listed_at))
            .bind(SqlxTimestamp::from(sold.sold_at))
            .bind(&sold.product_code)
            .bind(i32::try_from(sold.quantity).map_err(|error| decode_error("quantity", error))?)
            .bind(to_i64("price", sold.price)?)
            .bind(to_i64("bookmark_count", sold.bookmark_count)?)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    async fn list_sales(
        &self,
        business: BusinessUuid,
        from: Timestamp,
        until: Timestamp,
    ) -> Result<Vec<SaleEntry>, sqlx::Error> {
        let rows = query_as::<Postgres, SaleRow>(LIST_SALES_SQL)
            .bind(business.into_uuid())
            .bind(SqlxTimestamp::from(from))
            .bind(SqlxTimestamp::from(until))
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.into_iter().map(|row| row.0).collect())
    }

    async fn list_sold_listings(
        &self,
        business: BusinessUuid,
        page: PageRequest,
    ) -> Result<Vec<SoldListing>, sqlx::Error> {
        let rows = query_as::<Postgres, SoldListingRow>(LIST_SOLD_LISTINGS_SQL)
            .bind(business.into_uuid())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.into_iter().map(|row| row.0).collect())
    }
}

struct SaleRow(SaleEntry);

impl<'r> FromRow<'r, PgRow> for SaleRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self(SaleEntry {
            sold_at: row.try_get::<SqlxTimestamp, _>("sold_at")?.to_jiff(),
            price: to_u64("price", row.try_get("price")?)?,
        }))
    }
}

struct SoldListingRow(SoldListing);

impl<'r> FromRow<'r, PgRow> for SoldListingRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self(SoldListing {
            uuid: SoldListingUuid::from_uuid(row.try_get("uuid")?),
            business: BusinessUuid::from_uuid(row.try_get("business_uuid")?),
            purchaser: UserUuid::from_uuid(row.try_get("purchaser_uuid")?),
            listed_at: row.try_get::<SqlxTimestamp, _>("listed_at")?.to_jiff(),
            sold_at: row.try_get::<SqlxTimestamp, _>("sold_at")?.to_jiff(),
            product_code: row.try_get("product_code")?,
            quantity: u32::try_from(row.try_get::<i32, _>("quantity")?)
                .map_err(|error| decode_error("quantity", error))?,
            price: to_u64("price", row.try_get("price")?)?,
            bookmark_count: to_u64("bookmark_count", row.try_get("bookmark_count")?)?,
        }))
    }
}
