//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, SessionAuthService},
    database::{self, Db},
    domain::{
        directory::PgDirectoryRepository,
        inventory::{InventoryLedger, InventoryService, PgInventoryRepository},
        listings::{ListingsEngine, ListingsService, PgListingsRepository},
        notifications::{NotificationInbox, NotificationsService, PgNotificationsRepository},
        sales::{PgSalesRepository, ReportsService, SalesReports},
    },
    outbox::{OutboxWorker, RepositorySink, TaskOutbox},
    settings::EngineSettings,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub listings: Arc<dyn ListingsService>,
    pub inventory: Arc<dyn InventoryService>,
    pub reports: Arc<dyn ReportsService>,
    pub notifications: Arc<dyn NotificationsService>,
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// Also starts the side-effect worker; drain it on shutdown so queued
    /// notifications are written.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        max_connections: u32,
        settings: EngineSettings,
    ) -> Result<(Self, OutboxWorker), AppInitError> {
        let pool = database::connect(url, max_connections)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self::from_db(&Db::new(pool), settings))
    }

    /// Wire every service onto one database handle.
    ///
    /// Must be called inside a Tokio runtime.
    #[must_use]
    pub fn from_db(db: &Db, settings: EngineSettings) -> (Self, OutboxWorker) {
        let directory = Arc::new(PgDirectoryRepository::new(db.clone()));
        let inventory = Arc::new(PgInventoryRepository::new(db.clone()));
        let listings = Arc::new(PgListingsRepository::new(db.clone()));
        let sales = Arc::new(PgSalesRepository::new(db.clone()));
        let notifications = Arc::new(PgNotificationsRepository::new(db.clone()));

        let (outbox, worker) = TaskOutbox::spawn(
            Arc::new(RepositorySink::new(sales.clone(), notifications.clone())),
            settings.outbox,
        );

        let context = Self {
            listings: Arc::new(ListingsEngine::new(
                listings,
                inventory.clone(),
                directory.clone(),
                Arc::new(outbox),
                settings,
            )),
            inventory: Arc::new(InventoryLedger::new(inventory, directory.clone())),
            reports: Arc::new(SalesReports::new(sales, directory.clone())),
            notifications: Arc::new(NotificationInbox::new(notifications)),
            auth: Arc::new(SessionAuthService::new(directory)),
        };

        (context, worker)
    }
}
