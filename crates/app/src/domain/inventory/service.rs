//! Inventory service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::civil::Date;
use marketplace::{
    actors::{Actor, Capability},
    inventory::{InventoryItemUuid, InventoryTerms, ShelfLife},
};
use mockall::automock;
use tracing::{Span, info};

use crate::domain::{
    directory::DirectoryRepository,
    inventory::{
        data::NewInventoryItem, errors::InventoryServiceError, records::InventoryItemRecord,
        repository::InventoryRepository,
    },
};

/// Registers and reads inventory items.
#[derive(Clone)]
pub struct InventoryLedger {
    inventory: Arc<dyn InventoryRepository>,
    directory: Arc<dyn DirectoryRepository>,
}

impl InventoryLedger {
    #[must_use]
    pub fn new(
        inventory: Arc<dyn InventoryRepository>,
        directory: Arc<dyn DirectoryRepository>,
    ) -> Self {
        Self {
            inventory,
            directory,
        }
    }
}

#[async_trait]
impl InventoryService for InventoryLedger {
    #[tracing::instrument(
        name = "inventory.service.register_item",
        skip(self, actor, item),
        fields(
            user_uuid = %actor.uuid,
            product_uuid = %item.product_uuid,
            inventory_item_uuid = tracing::field::Empty
        ),
        err
    )]
    async fn register_item(
        &self,
        actor: &Actor,
        item: NewInventoryItem,
        today: Date,
    ) -> Result<InventoryItemRecord, InventoryServiceError> {
        let product = self
            .directory
            .find_product(item.product_uuid)
            .await?
            .ok_or(InventoryServiceError::NotFound)?;

        if !actor.permits(&Capability::AdministerBusiness(product.business_uuid)) {
            return Err(InventoryServiceError::Forbidden);
        }

        let terms = InventoryTerms::new(
            item.quantity,
            item.price_per_item,
            item.total_price,
            ShelfLife {
                manufactured: item.manufactured,
                sell_by: item.sell_by,
                best_before: item.best_before,
                expires: item.expires,
            },
            today,
        )?;

        let uuid = InventoryItemUuid::new();

        Span::current().record("inventory_item_uuid", tracing::field::display(uuid));

        let record = self
            .inventory
            .create_inventory_item(uuid, product.uuid, terms)
            .await?;

        info!(
            inventory_item_uuid = %record.uuid,
            quantity = record.quantity,
            "registered inventory item"
        );

        Ok(record)
    }

    async fn get_item(
        &self,
        item: InventoryItemUuid,
    ) -> Result<InventoryItemRecord, InventoryServiceError> {
        self.inventory
            .find_inventory_item(item)
            .await?
            .ok_or(InventoryServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
pub trait InventoryService: Send + Sync {
    /// Register a batch of a product, validating its dates as of `today`.
    async fn register_item(
        &self,
        actor: &Actor,
        item: NewInventoryItem,
        today: Date,
    ) -> Result<InventoryItemRecord, InventoryServiceError>;

    /// Retrieve a single inventory item.
    async fn get_item(
        &self,
        item: InventoryItemUuid,
    ) -> Result<InventoryItemRecord, InventoryServiceError>;
}
