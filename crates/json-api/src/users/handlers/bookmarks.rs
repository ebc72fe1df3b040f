//! Bookmarked Listings Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    listings::{get::ListingResponse, into_status_error},
    state::State,
};

/// Bookmarked Listings Handler
///
/// Listings the caller has bookmarked, soonest to close first.
#[endpoint(
    tags("users"),
    summary = "List Bookmarked Listings",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<ListingResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let listings = state
        .app
        .listings
        .list_bookmarked(actor)
        .await
        .map_err(into_status_error)?;

    Ok(Json(listings.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use marketplace::listings::ListingUuid;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_USER_UUID, make_listing};

    use super::*;

    #[tokio::test]
    async fn lists_the_callers_bookmarks() -> TestResult {
        let first = ListingUuid::new();
        let second = ListingUuid::new();
        let listings = vec![make_listing(first), make_listing(second)];

        let mut mocks = Mocks::default();
        mocks
            .listings
            .expect_list_bookmarked()
            .once()
            .withf(|actor| actor.uuid == TEST_USER_UUID)
            .return_once(move |_| Ok(listings));

        let mut res = TestClient::get("http://example.com/users/me/bookmarks")
            .send(&mocks.service(Router::with_path("users/me/bookmarks").get(handler)))
            .await;

        let body: Vec<ListingResponse> = res.take_json().await?;
        let uuids: Vec<_> = body.iter().map(|listing| listing.uuid).collect();

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(uuids, vec![first.into_uuid(), second.into_uuid()]);

        Ok(())
    }
}
