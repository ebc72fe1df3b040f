//! Notifications Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use marketplace::{
    actors::UserUuid,
    businesses::BusinessUuid,
    listings::ListingUuid,
    notifications::{
        ListingNotification, NotificationAudience, NotificationUuid, SoldListingNotification,
    },
    sales::SoldListingUuid,
};
use mockall::automock;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::{Db, decode_error},
    domain::notifications::records::{NotificationRecord, NotificationTarget},
};

const CREATE_NOTIFICATION_SQL: &str = include_str!("sql/create_notification.sql");
const ADD_NOTIFICATION_RECIPIENT_SQL: &str = include_str!("sql/add_notification_recipient.sql");
const LIST_USER_NOTIFICATIONS_SQL: &str = include_str!("sql/list_user_notifications.sql");
const LIST_BUSINESS_NOTIFICATIONS_SQL: &str = include_str!("sql/list_business_notifications.sql");
const FIND_NOTIFICATION_TARGET_SQL: &str = include_str!("sql/find_notification_target.sql");
const REMOVE_NOTIFICATION_RECIPIENT_SQL: &str =
    include_str!("sql/remove_notification_recipient.sql");
const DELETE_ORPHANED_NOTIFICATION_SQL: &str =
    include_str!("sql/delete_orphaned_notification.sql");
const DELETE_NOTIFICATION_SQL: &str = include_str!("sql/delete_notification.sql");

const LISTING_KIND: &str = "listing";
const SOLD_LISTING_KIND: &str = "sold_listing";

#[automock]
#[async_trait]
pub trait NotificationsRepository: Send + Sync {
    /// Store a listing notification with its recipients. Storing it twice is a no-op.
    async fn create_listing_notification(
        &self,
        notification: &ListingNotification,
    ) -> Result<(), sqlx::Error>;

    /// Store a sold-listing notification. Storing it twice is a no-op.
    async fn create_sold_listing_notification(
        &self,
        notification: &SoldListingNotification,
    ) -> Result<(), sqlx::Error>;

    /// Listing notifications addressed to a user, newest first.
    async fn list_for_user(&self, user: UserUuid) -> Result<Vec<NotificationRecord>, sqlx::Error>;

    /// Sold-listing notifications of a business, newest first.
    async fn list_for_business(
        &self,
        business: BusinessUuid,
    ) -> Result<Vec<NotificationRecord>, sqlx::Error>;

    /// Who a notification is addressed to.
    async fn find_target(
        &self,
        notification: NotificationUuid,
    ) -> Result<Option<NotificationTarget>, sqlx::Error>;

    /// Unlink one recipient. The notification goes once nobody is left.
    async fn remove_recipient(
        &self,
        notification: NotificationUuid,
        user: UserUuid,
    ) -> Result<(), sqlx::Error>;

    /// Delete a notification outright.
    async fn delete_notification(&self, notification: NotificationUuid)
    -> Result<bool, sqlx::Error>;
}

#[derive(Debug, Clone)]
pub struct PgNotificationsRepository {
    db: Db,
}

impl PgNotificationsRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationsRepository for PgNotificationsRepository {
    async fn create_listing_notification(
        &self,
        notification: &ListingNotification,
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.db.begin().await?;

        query(CREATE_NOTIFICATION_SQL)
            .bind(notification.uuid.into_uuid())
            .bind(LISTING_KIND)
            .bind(notification.description.as_str())
            .bind(Some(notification.listing.into_uuid()))
            .bind(None::<Uuid>)
            .bind(None::<Uuid>)
            .execute(&mut *tx)
            .await?;

        for recipient in &notification.recipients {
            query(ADD_NOTIFICATION_RECIPIENT_SQL)
                .bind(notification.uuid.into_uuid())
                .bind(recipient.into_uuid())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await
    }

    async fn create_sold_listing_notification(
        &self,
        notification: &SoldListingNotification,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_NOTIFICATION_SQL)
            .bind(notification.uuid.into_uuid())
            .bind(SOLD_LISTING_KIND)
            .bind(notification.description.as_str())
            .bind(None::<Uuid>)
            .bind(Some(notification.sold_listing.into_uuid()))
            .bind(Some(notification.business.into_uuid()))
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    async fn list_for_user(&self, user: UserUuid) -> Result<Vec<NotificationRecord>, sqlx::Error> {
        query_as::<Postgres, NotificationRecord>(LIST_USER_NOTIFICATIONS_SQL)
            .bind(user.into_uuid())
            .fetch_all(self.db.pool())
            .await
    }

    async fn list_for_business(
        &self,
        business: BusinessUuid,
    ) -> Result<Vec<NotificationRecord>, sqlx::Error> {
        query_as::<Postgres, NotificationRecord>(LIST_BUSINESS_NOTIFICATIONS_SQL)
            .bind(business.into_uuid())
            .fetch_all(self.db.pool())
            .await
    }

    async fn find_target(
        &self,
        notification: NotificationUuid,
    ) -> Result<Option<NotificationTarget>, sqlx::Error> {
        query_as::<Postgres, NotificationTarget>(FIND_NOTIFICATION_TARGET_SQL)
            .bind(notification.into_uuid())
            .fetch_optional(self.db.pool())
            .await
    }

    async fn remove_recipient(
        &self,
        notification: NotificationUuid,
        user: UserUuid,
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.db.begin().await?;

        query(REMOVE_NOTIFICATION_RECIPIENT_SQL)
            .bind(notification.into_uuid())
            .bind(user.into_uuid())
            .execute(&mut *tx)
            .await?;

        query(DELETE_ORPHANED_NOTIFICATION_SQL)
            .bind(notification.into_uuid())
            .execute(&mut *tx)
            .await?;

        tx.commit().await
    }

    async fn delete_notification(
        &self,
        notification: NotificationUuid,
    ) -> Result<bool, sqlx::Error> {
        let deleted = query(DELETE_NOTIFICATION_SQL)
            .bind(notification.into_uuid())
            .execute(self.db.pool())
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

impl<'r> FromRow<'r, PgRow> for NotificationRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: NotificationUuid::from_uuid(row.try_get("uuid")?),
            description: row.try_get("description")?,
            listing_uuid: row
                .try_get::<Option<Uuid>, _>("listing_uuid")?
                .map(ListingUuid::from_uuid),
            sold_listing_uuid: row
                .try_get::<Option<Uuid>, _>("sold_listing_uuid")?
                .map(SoldListingUuid::from_uuid),
            business_uuid: row
                .try_get::<Option<Uuid>, _>("business_uuid")?
                .map(BusinessUuid::from_uuid),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for NotificationTarget {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let kind: String = row.try_get("kind")?;
        let business: Option<Uuid> = row.try_get("business_uuid")?;

        let audience = match (kind.as_str(), business) {
            (SOLD_LISTING_KIND, Some(business)) => {
                NotificationAudience::Business(BusinessUuid::from_uuid(business))
            }
            (LISTING_KIND, _) => NotificationAudience::Users(
                row.try_get::<Vec<Uuid>, _>("recipients")?
                    .into_iter()
                    .map(UserUuid::from_uuid)
                    .collect(),
            ),
            _ => {
                return Err(decode_error(
                    "kind",
                    std::io::Error::other(format!("unexpected notification kind {kind}")),
                ));
            }
        };

        Ok(Self {
            uuid: NotificationUuid::from_uuid(row.try_get("uuid")?),
            audience,
        })
    }
}
