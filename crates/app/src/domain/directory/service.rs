//! Directory service.

use jiff::Timestamp;
use tracing::info;

use crate::{
    auth::{SessionToken, generate_session_token},
    database::Db,
    domain::directory::{
        data::{NewBusiness, NewProduct, NewUser},
        errors::DirectoryServiceError,
        records::{BusinessRecord, ProductRecord, UserRecord},
        repository::PgDirectoryRepository,
    },
};

/// A new user and their first session token.
#[derive(Debug)]
pub struct RegisteredUser {
    pub user: UserRecord,
    pub token: SessionToken,
}

/// Administrative writes to the directory.
#[derive(Debug, Clone)]
pub struct PgDirectoryService {
    repository: PgDirectoryRepository,
}

impl PgDirectoryService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            repository: PgDirectoryRepository::new(db),
        }
    }

    /// Create a user and issue a session for them.
    ///
    /// # Errors
    ///
    /// Returns an error if the user already exists or storage fails.
    #[tracing::instrument(
        name = "directory.service.register_user",
        skip(self, user),
        fields(user_uuid = %user.uuid, role = %user.role),
        err
    )]
    pub async fn register_user(
        &self,
        user: NewUser,
        session_expires_at: Option<Timestamp>,
    ) -> Result<RegisteredUser, DirectoryServiceError> {
        let record = self.repository.create_user(&user).await?;
        let token = generate_session_token();

        self.repository
            .create_session(record.uuid, &token.hash(), session_expires_at)
            .await?;

        info!(user_uuid = %record.uuid, "registered user");

        Ok(RegisteredUser {
            user: record,
            token,
        })
    }

    /// Create a business with its administrators.
    ///
    /// # Errors
    ///
    /// Returns an error if the business exists, an administrator is unknown,
    /// or storage fails.
    #[tracing::instrument(
        name = "directory.service.create_business",
        skip(self, business),
        fields(business_uuid = %business.uuid, administrators = business.administrators.len()),
        err
    )]
    pub async fn create_business(
        &self,
        business: NewBusiness,
    ) -> Result<BusinessRecord, DirectoryServiceError> {
        let record = self.repository.create_business(&business).await?;

        info!(business_uuid = %record.uuid, "created business");

        Ok(record)
    }

    /// Create a product for a business.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is taken, the business is unknown, or
    /// storage fails.
    #[tracing::instrument(
        name = "directory.service.create_product",
        skip(self, product),
        fields(product_uuid = %product.uuid, business_uuid = %product.business_uuid),
        err
    )]
    pub async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, DirectoryServiceError> {
        let record = self.repository.create_product(&product).await?;

        info!(product_uuid = %record.uuid, "created product");

        Ok(record)
    }
}
