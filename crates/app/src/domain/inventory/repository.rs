//! Inventory Repository

use async_trait::async_trait;
use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use marketplace::{
    businesses::BusinessUuid,
    inventory::{InventoryItemUuid, InventoryTerms, ProductUuid},
};
use mockall::automock;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query_as};

use crate::{
    database::{Db, to_i64, to_u64},
    domain::inventory::records::InventoryItemRecord,
};

const CREATE_INVENTORY_ITEM_SQL: &str = include_str!("sql/create_inventory_item.sql");
const FIND_INVENTORY_ITEM_SQL: &str = include_str!("sql/find_inventory_item.sql");

/// Inventory item storage.
#[automock]
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Insert a validated inventory item.
    async fn create_inventory_item(
        &self,
        uuid: InventoryItemUuid,
        product: ProductUuid,
        terms: InventoryTerms,
    ) -> Result<InventoryItemRecord, sqlx::Error>;

    /// Find an inventory item.
    async fn find_inventory_item(
        &self,
        item: InventoryItemUuid,
    ) -> Result<Option<InventoryItemRecord>, sqlx::Error>;
}

#[derive(Debug, Clone)]
pub struct PgInventoryRepository {
    db: Db,
}

impl PgInventoryRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InventoryRepository for PgInventoryRepository {
    async fn create_inventory_item(
        &self,
        uuid: InventoryItemUuid,
        product: ProductUuid,
        terms: InventoryTerms,
    ) -> Result<InventoryItemRecord, sqlx::Error> {
        let price_per_item = terms
            .price_per_item
            .map(|price| to_i64("price_per_item", price))
            .transpose()?;

        let total_price = terms
            .total_price
            .map(|price| to_i64("total_price", price))
            .transpose()?;

        let dates = terms.shelf_life;

        query_as::<Postgres, InventoryItemRecord>(CREATE_INVENTORY_ITEM_SQL)
            .bind(uuid.into_uuid())
            .bind(product.into_uuid())
            .bind(terms.quantity)
            .bind(price_per_item)
            .bind(total_price)
            .bind(dates.manufactured.map(SqlxDate::from))
            .bind(dates.sell_by.map(SqlxDate::from))
            .bind(dates.best_before.map(SqlxDate::from))
            .bind(SqlxDate::from(dates.expires))
            .fetch_one(self.db.pool())
            .await
    }

    async fn find_inventory_item(
        &self,
        item: InventoryItemUuid,
    ) -> Result<Option<InventoryItemRecord>, sqlx::Error> {
        query_as::<Postgres, InventoryItemRecord>(FIND_INVENTORY_ITEM_SQL)
            .bind(item.into_uuid())
            .fetch_optional(self.db.pool())
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for InventoryItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let optional_date = |column: &str| -> sqlx::Result<_> {
            Ok(row
                .try_get::<Option<SqlxDate>, _>(column)?
                .map(SqlxDate::to_jiff))
        };

        let optional_price = |column: &str| -> sqlx::Result<Option<u64>> {
            row.try_get::<Option<i64>, _>(column)?
                .map(|price| to_u64(column, price))
                .transpose()
        };

        Ok(Self {
            uuid: InventoryItemUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            business_uuid: BusinessUuid::from_uuid(row.try_get("business_uuid")?),
            product_code: row.try_get("product_code")?,
            product_name: row.try_get("product_name")?,
            quantity: row.try_get("quantity")?,
            price_per_item: optional_price("price_per_item")?,
            total_price: optional_price("total_price")?,
            manufactured: optional_date("manufactured")?,
            sell_by: optional_date("sell_by")?,
            best_before: optional_date("best_before")?,
            expires: row.try_get::<SqlxDate, _>("expires")?.to_jiff(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
