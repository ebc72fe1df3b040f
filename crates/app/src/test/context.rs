//! Seeded fixtures for repository tests.

use marketplace::{
    actors::{Role, UserUuid},
    businesses::{Address, BusinessType, BusinessUuid},
    inventory::ProductUuid,
};

use super::db::TestDb;
use crate::{
    database::Db,
    domain::{
        directory::{
            PgDirectoryService, PgDirectoryRepository,
            data::{NewBusiness, NewProduct, NewUser},
        },
        inventory::PgInventoryRepository,
        listings::PgListingsRepository,
        notifications::PgNotificationsRepository,
        sales::PgSalesRepository,
    },
};

/// A fresh database holding one administrator, one business they run and one
/// product of that business.
pub(crate) struct TestContext {
    _db: TestDb,
    pub directory: PgDirectoryRepository,
    pub inventory: PgInventoryRepository,
    pub listings: PgListingsRepository,
    pub sales: PgSalesRepository,
    pub notifications: PgNotificationsRepository,
    pub admin_uuid: UserUuid,
    pub admin_token_hash: String,
    pub business_uuid: BusinessUuid,
    pub product_uuid: ProductUuid,
}

impl TestContext {
    pub(crate) async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());
        let service = PgDirectoryService::new(db.clone());

        let admin = service
            .register_user(
                NewUser {
                    uuid: UserUuid::new(),
                    name: "Test Admin".to_owned(),
                    role: Role::User,
                },
                None,
            )
            .await
            .expect("Failed to register test admin");

        let business = service
            .create_business(NewBusiness {
                uuid: BusinessUuid::new(),
                name: "Harbour Grocer".to_owned(),
                business_type: BusinessType::RetailTrade,
                address: Address {
                    street: Some("1 Quay Street".to_owned()),
                    city: Some("Wellington".to_owned()),
                    region: None,
                    country: "New Zealand".to_owned(),
                    postcode: Some("6011".to_owned()),
                },
                administrators: vec![admin.user.uuid],
            })
            .await
            .expect("Failed to create test business");

        let product = service
            .create_product(NewProduct {
                uuid: ProductUuid::new(),
                business_uuid: business.uuid,
                code: "OAT-1L".to_owned(),
                name: "Oat Milk 1L".to_owned(),
                barcode: Some("9400000000017".to_owned()),
            })
            .await
            .expect("Failed to create test product");

        Self {
            directory: PgDirectoryRepository::new(db.clone()),
            inventory: PgInventoryRepository::new(db.clone()),
            listings: PgListingsRepository::new(db.clone()),
            sales: PgSalesRepository::new(db.clone()),
            notifications: PgNotificationsRepository::new(db),
            admin_uuid: admin.user.uuid,
            admin_token_hash: admin.token.hash(),
            business_uuid: business.uuid,
            product_uuid: product.uuid,
            _db: test_db,
        }
    }
}
