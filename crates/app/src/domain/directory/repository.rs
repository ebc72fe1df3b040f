//! Directory Repository

use async_trait::async_trait;
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use marketplace::{
    actors::{Actor, Role, UserUuid},
    businesses::{Address, BusinessType, BusinessUuid},
    inventory::ProductUuid,
};
use mockall::automock;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::{Db, decode_error},
    domain::directory::{
        data::{NewBusiness, NewProduct, NewUser},
        records::{BusinessRecord, ProductRecord, UserRecord},
    },
};

const FIND_ACTOR_BY_SESSION_SQL: &str = include_str!("sql/find_actor_by_session.sql");
const FIND_BUSINESS_SQL: &str = include_str!("sql/find_business.sql");
const FIND_PRODUCT_SQL: &str = include_str!("sql/find_product.sql");
const CREATE_USER_SQL: &str = include_str!("sql/create_user.sql");
const CREATE_SESSION_SQL: &str = include_str!("sql/create_session.sql");
const CREATE_BUSINESS_SQL: &str = include_str!("sql/create_business.sql");
const ADD_BUSINESS_ADMINISTRATOR_SQL: &str = include_str!("sql/add_business_administrator.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");

/// Read access to users, businesses and products.
#[automock]
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// Resolve a live session to its actor.
    async fn find_actor_by_session(&self, token_hash: &str)
    -> Result<Option<Actor>, sqlx::Error>;

    /// Find a business.
    async fn find_business(
        &self,
        business: BusinessUuid,
    ) -> Result<Option<BusinessRecord>, sqlx::Error>;

    /// Find a product.
    async fn find_product(&self, product: ProductUuid)
    -> Result<Option<ProductRecord>, sqlx::Error>;
}

#[derive(Debug, Clone)]
pub struct PgDirectoryRepository {
    db: Db,
}

impl PgDirectoryRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub(crate) async fn create_user(&self, user: &NewUser) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(CREATE_USER_SQL)
            .bind(user.uuid.into_uuid())
            .bind(&user.name)
            .bind(user.role.as_str())
            .fetch_one(self.db.pool())
            .await
    }

    pub(crate) async fn create_session(
        &self,
        user: UserUuid,
        token_hash: &str,
        expires_at: Option<Timestamp>,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_SESSION_SQL)
            .bind(token_hash)
            .bind(user.into_uuid())
            .bind(expires_at.map(SqlxTimestamp::from))
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    pub(crate) async fn create_business(
        &self,
        business: &NewBusiness,
    ) -> Result<BusinessRecord, sqlx::Error> {
        let mut tx = self.db.begin().await?;

        let record = query_as::<Postgres, BusinessRecord>(CREATE_BUSINESS_SQL)
            .bind(business.uuid.into_uuid())
            .bind(&business.name)
            .bind(business.business_type.as_str())
            .bind(business.address.street.as_deref())
            .bind(business.address.city.as_deref())
            .bind(business.address.region.as_deref())
            .bind(&business.address.country)
            .bind(business.address.postcode.as_deref())
            .fetch_one(&mut *tx)
            .await?;

        for administrator in &business.administrators {
            query(ADD_BUSINESS_ADMINISTRATOR_SQL)
                .bind(business.uuid.into_uuid())
                .bind(administrator.into_uuid())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(record)
    }

    pub(crate) async fn create_product(
        &self,
        product: &NewProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(product.business_uuid.into_uuid())
            .bind(&product.code)
            .bind(&product.name)
            .bind(product.barcode.as_deref())
            .fetch_one(self.db.pool())
            .await
    }
}

#[async_trait]
impl DirectoryRepository for PgDirectoryRepository {
    async fn find_actor_by_session(
        &self,
        token_hash: &str,
    ) -> Result<Option<Actor>, sqlx::Error> {
        let row = query_as::<Postgres, ActorRow>(FIND_ACTOR_BY_SESSION_SQL)
            .bind(token_hash)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(|row| row.0))
    }

    async fn find_business(
        &self,
        business: BusinessUuid,
    ) -> Result<Option<BusinessRecord>, sqlx::Error> {
        query_as::<Postgres, BusinessRecord>(FIND_BUSINESS_SQL)
            .bind(business.into_uuid())
            .fetch_optional(self.db.pool())
            .await
    }

    async fn find_product(
        &self,
        product: ProductUuid,
    ) -> Result<Option<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(FIND_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_optional(self.db.pool())
            .await
    }
}

struct ActorRow(Actor);

impl<'r> FromRow<'r, PgRow> for ActorRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let role = row
            .try_get::<String, _>("role")?
            .parse::<Role>()
            .map_err(|error| decode_error("role", error))?;

        let administered = row
            .try_get::<Vec<Uuid>, _>("administered")?
            .into_iter()
            .map(BusinessUuid::from_uuid)
            .collect();

        Ok(Self(Actor {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            role,
            administered,
        }))
    }
}

impl<'r> FromRow<'r, PgRow> for UserRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            role: row
                .try_get::<String, _>("role")?
                .parse()
                .map_err(|error| decode_error("role", error))?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for BusinessRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: BusinessUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            business_type: row
                .try_get::<String, _>("business_type")?
                .parse::<BusinessType>()
                .map_err(|error| decode_error("business_type", error))?,
            address: Address {
                street: row.try_get("street")?,
                city: row.try_get("city")?,
                region: row.try_get("region")?,
                country: row.try_get("country")?,
                postcode: row.try_get("postcode")?,
            },
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            business_uuid: BusinessUuid::from_uuid(row.try_get("business_uuid")?),
            code: row.try_get("code")?,
            name: row.try_get("name")?,
            barcode: row.try_get("barcode")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

#[cfg(all(test, feature = "db-tests"))]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::test::TestContext;

    #[tokio::test]
    async fn resolves_a_session_to_its_actor() -> TestResult {
        let ctx = TestContext::new().await;

        let actor = ctx
            .directory
            .find_actor_by_session(&ctx.admin_token_hash)
            .await?
            .ok_or("session should resolve")?;

        assert_eq!(actor.uuid, ctx.admin_uuid);
        assert!(actor.administered.contains(&ctx.business_uuid));

        Ok(())
    }

    #[tokio::test]
    async fn unknown_sessions_resolve_to_nothing() -> TestResult {
        let ctx = TestContext::new().await;

        let actor = ctx.directory.find_actor_by_session("nope").await?;

        assert!(actor.is_none(), "unknown token hashes are not sessions");

        Ok(())
    }

    #[tokio::test]
    async fn finds_businesses_with_their_address() -> TestResult {
        let ctx = TestContext::new().await;

        let business = ctx
            .directory
            .find_business(ctx.business_uuid)
            .await?
            .ok_or("business should exist")?;

        assert_eq!(business.business_type, BusinessType::RetailTrade);
        assert_eq!(business.address.city.as_deref(), Some("Wellington"));

        Ok(())
    }
}
