//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use marketplace::{
    actors::{Actor, Role, UserUuid},
    businesses::BusinessUuid,
    inventory::InventoryItemUuid,
    listings::ListingUuid,
};
use marketplace_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        inventory::MockInventoryService, listings::MockListingsService,
        listings::records::ListingRecord, notifications::MockNotificationsService,
        sales::MockReportsService,
    },
};
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

pub(crate) const TEST_BUSINESS_UUID: BusinessUuid = BusinessUuid::from_uuid(Uuid::max());

/// A regular user administering [`TEST_BUSINESS_UUID`].
pub(crate) fn test_actor() -> Actor {
    Actor::new(TEST_USER_UUID, Role::User).administering(TEST_BUSINESS_UUID)
}

#[salvo::handler]
pub(crate) async fn inject_actor(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_actor(test_actor());
    ctrl.call_next(req, depot, res).await;
}

/// Service mocks with no expectations; any unexpected call fails the test.
#[derive(Default)]
pub(crate) struct Mocks {
    pub listings: MockListingsService,
    pub inventory: MockInventoryService,
    pub reports: MockReportsService,
    pub notifications: MockNotificationsService,
    pub auth: MockAuthService,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            listings: Arc::new(self.listings),
            inventory: Arc::new(self.inventory),
            reports: Arc::new(self.reports),
            notifications: Arc::new(self.notifications),
            auth: Arc::new(self.auth),
        })
    }

    /// Serve `route` as [`test_actor`].
    pub(crate) fn service(self, route: Router) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(self.into_state()))
                .hoop(inject_actor)
                .push(route),
        )
    }
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    Mocks {
        auth,
        ..Mocks::default()
    }
    .into_state()
}

pub(crate) fn make_listing(uuid: ListingUuid) -> ListingRecord {
    ListingRecord {
        uuid,
        inventory_item_uuid: InventoryItemUuid::from_uuid(Uuid::nil()),
        business_uuid: TEST_BUSINESS_UUID,
        business_name: "Harbour Grocer".to_owned(),
        product_code: "OAT-1L".to_owned(),
        product_name: "Oat Milk 1L".to_owned(),
        quantity: 2,
        price: Some(450),
        more_info: Some("Collect before noon".to_owned()),
        created_at: Timestamp::UNIX_EPOCH,
        closes_at: Timestamp::from_second(86_400).unwrap_or(Timestamp::UNIX_EPOCH),
        bookmark_count: 1,
    }
}
