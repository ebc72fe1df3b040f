//! App Router

use salvo::Router;

use crate::{auth, businesses, inventory, listings, notifications, users};

/// Every route that needs an authenticated actor.
pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("inventory")
                .post(inventory::create::handler)
                .push(Router::with_path("{item}").get(inventory::get::handler)),
        )
        .push(
            Router::with_path("listings")
                .get(listings::search::handler)
                .post(listings::create::handler)
                .push(
                    Router::with_path("{listing}")
                        .get(listings::get::handler)
                        .delete(listings::delete::handler)
                        .push(Router::with_path("bookmark").put(listings::bookmark::handler))
                        .push(Router::with_path("purchase").post(listings::purchase::handler)),
                ),
        )
        .push(
            Router::with_path("users/me")
                .push(Router::with_path("bookmarks").get(users::bookmarks::handler))
                .push(Router::with_path("notifications").get(users::notifications::handler)),
        )
        .push(
            Router::with_path("notifications/{notification}")
                .delete(notifications::dismiss::handler),
        )
        .push(
            Router::with_path("businesses/{business}")
                .push(Router::with_path("notifications").get(businesses::notifications::handler))
                .push(Router::with_path("sales").get(businesses::sales::handler))
                .push(Router::with_path("reports/sales").get(businesses::report::handler)),
        )
}
