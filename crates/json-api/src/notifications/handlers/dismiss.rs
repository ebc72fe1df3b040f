//! Dismiss Notification Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, notifications::into_status_error, state::State};

/// Dismiss Notification Handler
///
/// Recipients remove the notification from their own feed. Business
/// administrators delete their business's sale notifications and platform
/// administrators delete any notification.
#[endpoint(
    tags("notifications"),
    summary = "Dismiss Notification",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Notification dismissed"),
        (status_code = StatusCode::NOT_FOUND, description = "Notification not found"),
        (status_code = StatusCode::FORBIDDEN, description = "Not a recipient or administrator"),
    ),
)]
pub(crate) async fn handler(
    notification: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    state
        .app
        .notifications
        .dismiss(actor, notification.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::OK)
}
