//! Toggle Bookmark Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{extensions::*, listings::into_status_error, state::State};

/// Bookmark state after the toggle.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BookmarkResponse {
    /// Whether the listing is now bookmarked
    pub bookmarked: bool,
}

/// Toggle Bookmark Handler
///
/// Bookmarks the listing, or removes the bookmark if it already exists.
#[endpoint(
    tags("listings"),
    summary = "Toggle Bookmark",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Bookmark toggled"),
        (status_code = StatusCode::NOT_FOUND, description = "Listing not found"),
    ),
)]
pub(crate) async fn handler(
    listing: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<BookmarkResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let bookmark = state
        .app
        .listings
        .toggle_bookmark(actor, listing.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(BookmarkResponse {
        bookmarked: bookmark.is_bookmarked(),
    }))
}
