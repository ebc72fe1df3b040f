//! Notification Models

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use marketplace_app::domain::notifications::records::NotificationRecord;

/// A listing notification for a user, or a sale notification for a business.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct NotificationResponse {
    /// Notification id
    pub uuid: Uuid,

    /// Human-readable message
    pub description: String,

    /// Listing the notification is about
    pub listing_uuid: Option<Uuid>,

    /// Archived sale the notification is about
    pub sold_listing_uuid: Option<Uuid>,

    /// Business the sale belongs to
    pub business_uuid: Option<Uuid>,

    /// When the notification was written
    pub created_at: String,
}

impl From<NotificationRecord> for NotificationResponse {
    fn from(notification: NotificationRecord) -> Self {
        NotificationResponse {
            uuid: notification.uuid.into(),
            description: notification.description,
            listing_uuid: notification.listing_uuid.map(Into::into),
            sold_listing_uuid: notification.sold_listing_uuid.map(Into::into),
            business_uuid: notification.business_uuid.map(Into::into),
            created_at: notification.created_at.to_string(),
        }
    }
}
