//! Delete Listing Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, listings::into_status_error, state::State};

/// Delete Listing Handler
///
/// Withdraws an open listing. Users who bookmarked it are notified.
#[endpoint(
    tags("listings"),
    summary = "Delete Listing",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Listing deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Listing not found"),
        (status_code = StatusCode::FORBIDDEN, description = "Not permitted to delete the listing"),
        (status_code = StatusCode::CONFLICT, description = "Listing is closed"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    listing: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    state
        .app
        .listings
        .delete_listing(actor, listing.into_inner().into(), Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::OK)
}
