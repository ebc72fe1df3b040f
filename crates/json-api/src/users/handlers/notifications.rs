//! User Notifications Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    notifications::{NotificationResponse, into_status_error},
    state::State,
};

/// User Notifications Handler
///
/// Listing notifications addressed to the caller, newest first.
#[endpoint(
    tags("users"),
    summary = "List My Notifications",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<Vec<NotificationResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let notifications = state
        .app
        .notifications
        .list_for_user(actor)
        .await
        .map_err(into_status_error)?;

    Ok(Json(notifications.into_iter().map(Into::into).collect()))
}
