//! Notifications service.

use std::sync::Arc;

use async_trait::async_trait;
use marketplace::{
    actors::{Actor, Capability},
    businesses::BusinessUuid,
    notifications::{NotificationAudience, NotificationUuid},
};
use mockall::automock;
use tracing::info;

use crate::domain::notifications::{
    NotificationsServiceError, records::NotificationRecord, repository::NotificationsRepository,
};

/// Polling access to notifications.
#[derive(Clone)]
pub struct NotificationInbox {
    notifications: Arc<dyn NotificationsRepository>,
}

impl NotificationInbox {
    #[must_use]
    pub fn new(notifications: Arc<dyn NotificationsRepository>) -> Self {
        Self { notifications }
    }
}

#[async_trait]
impl NotificationsService for NotificationInbox {
    async fn list_for_user(
        &self,
        actor: &Actor,
    ) -> Result<Vec<NotificationRecord>, NotificationsServiceError> {
        Ok(self.notifications.list_for_user(actor.uuid).await?)
    }

    async fn list_for_business(
        &self,
        actor: &Actor,
        business: BusinessUuid,
    ) -> Result<Vec<NotificationRecord>, NotificationsServiceError> {
        if !actor.permits(&Capability::AdministerBusiness(business)) {
            return Err(NotificationsServiceError::Forbidden);
        }

        Ok(self.notifications.list_for_business(business).await?)
    }

    #[tracing::instrument(
        name = "notifications.service.dismiss",
        skip(self, actor, notification),
        fields(user_uuid = %actor.uuid, notification_uuid = %notification),
        err
    )]
    async fn dismiss(
        &self,
        actor: &Actor,
        notification: NotificationUuid,
    ) -> Result<(), NotificationsServiceError> {
        let target = self
            .notifications
            .find_target(notification)
            .await?
            .ok_or(NotificationsServiceError::NotFound)?;

        if !actor.permits(&Capability::DismissNotification(target.audience.clone())) {
            return Err(NotificationsServiceError::Forbidden);
        }

        match target.audience {
            NotificationAudience::Users(_) if !actor.role.is_admin() => {
                self.notifications
                    .remove_recipient(notification, actor.uuid)
                    .await?;

                info!(notification_uuid = %notification, "recipient dismissed notification");
            }
            NotificationAudience::Users(_) | NotificationAudience::Business(_) => {
                self.notifications.delete_notification(notification).await?;

                info!(notification_uuid = %notification, "deleted notification");
            }
        }

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait NotificationsService: Send + Sync {
    /// Listing notifications addressed to the actor.
    async fn list_for_user(
        &self,
        actor: &Actor,
    ) -> Result<Vec<NotificationRecord>, NotificationsServiceError>;

    /// Sold-listing notifications of a business the actor administers.
    async fn list_for_business(
        &self,
        actor: &Actor,
        business: BusinessUuid,
    ) -> Result<Vec<NotificationRecord>, NotificationsServiceError>;

    /// Remove a notification from the actor's view.
    ///
    /// Recipients unlink themselves, business administrators delete their
    /// business's sale notifications and platform administrators delete any
    /// notification.
    async fn dismiss(
        &self,
        actor: &Actor,
        notification: NotificationUuid,
    ) -> Result<(), NotificationsServiceError>;
}
