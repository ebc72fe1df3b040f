//! Business Notifications Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    notifications::{NotificationResponse, into_status_error},
    state::State,
};

/// Business Notifications Handler
///
/// Sale notifications of a business the caller administers.
#[endpoint(
    tags("businesses"),
    summary = "List Business Notifications",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Sale notifications"),
        (status_code = StatusCode::FORBIDDEN, description = "Not an administrator of the business"),
    ),
)]
pub(crate) async fn handler(
    business: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Vec<NotificationResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let notifications = state
        .app
        .notifications
        .list_for_business(actor, business.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(notifications.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use marketplace::{notifications::NotificationUuid, sales::SoldListingUuid};
    use marketplace_app::domain::notifications::{
        NotificationsServiceError, records::NotificationRecord,
    };
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_BUSINESS_UUID};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        mocks.service(Router::with_path("businesses/{business}/notifications").get(handler))
    }

    #[tokio::test]
    async fn lists_sale_notifications() -> TestResult {
        let sold = SoldListingUuid::new();
        let notification = NotificationRecord {
            uuid: NotificationUuid::new(),
            description: "Sold 2 x Oat Milk 1L for $4.50.".to_owned(),
            listing_uuid: None,
            sold_listing_uuid: Some(sold),
            business_uuid: Some(TEST_BUSINESS_UUID),
            created_at: Timestamp::UNIX_EPOCH,
        };

        let mut mocks = Mocks::default();
        mocks
            .notifications
            .expect_list_for_business()
            .once()
            .withf(|_, business| *business == TEST_BUSINESS_UUID)
            .return_once(move |_, _| Ok(vec![notification]));

        let mut res = TestClient::get(format!(
            "http://example.com/businesses/{TEST_BUSINESS_UUID}/notifications"
        ))
        .send(&make_service(mocks))
        .await;

        let body: Vec<NotificationResponse> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(
            body.first().and_then(|notification| notification.sold_listing_uuid),
            Some(sold.into_uuid())
        );

        Ok(())
    }

    #[tokio::test]
    async fn other_businesses_return_403() {
        let mut mocks = Mocks::default();
        mocks
            .notifications
            .expect_list_for_business()
            .once()
            .return_once(|_, _| Err(NotificationsServiceError::Forbidden));

        let res = TestClient::get(format!(
            "http://example.com/businesses/{}/notifications",
            Uuid::now_v7()
        ))
        .send(&make_service(mocks))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
    }
}
