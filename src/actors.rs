//! Actors and capabilities
//!
//! An [`Actor`] is the authenticated caller of an operation. Authorisation is
//! a single predicate, [`Actor::permits`], evaluated against a [`Capability`].

use std::{fmt, str::FromStr};

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::{businesses::BusinessUuid, notifications::NotificationAudience, uuids::TypedUuid};

/// User
#[derive(Debug)]
pub struct User;

/// User identifier.
pub type UserUuid = TypedUuid<User>;

/// Unknown role name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

/// Global role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Regular user.
    User,

    /// Site administrator.
    Admin,

    /// The administrator created at install time.
    DefaultAdmin,
}

impl Role {
    /// Whether the role grants site-wide administration.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin | Self::DefaultAdmin)
    }

    /// Name used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::DefaultAdmin => "default_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            "default_admin" => Ok(Self::DefaultAdmin),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// Something an actor may want to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    /// Manage a business's inventory and listings.
    AdministerBusiness(BusinessUuid),

    /// Remove a listing belonging to a business.
    DeleteListing(BusinessUuid),

    /// Read a business's sales report and history.
    ViewSalesReport(BusinessUuid),

    /// Dismiss a notification addressed to the given audience.
    DismissNotification(NotificationAudience),
}

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// User id.
    pub uuid: UserUuid,

    /// Global role.
    pub role: Role,

    /// Businesses this user administers.
    pub administered: FxHashSet<BusinessUuid>,
}

impl Actor {
    /// Build an actor with no administered businesses.
    #[must_use]
    pub fn new(uuid: UserUuid, role: Role) -> Self {
        Self {
            uuid,
            role,
            administered: FxHashSet::default(),
        }
    }

    /// Add an administered business.
    #[must_use]
    pub fn administering(mut self, business: BusinessUuid) -> Self {
        self.administered.insert(business);
        self
    }

    /// Whether the actor administers the business, directly or as a site admin.
    #[must_use]
    pub fn administers(&self, business: BusinessUuid) -> bool {
        self.role.is_admin() || self.administered.contains(&business)
    }

    /// Whether the actor holds the capability.
    #[must_use]
    pub fn permits(&self, capability: &Capability) -> bool {
        match capability {
            Capability::AdministerBusiness(business)
            | Capability::DeleteListing(business)
            | Capability::ViewSalesReport(business) => self.administers(*business),
            Capability::DismissNotification(audience) => match audience {
                NotificationAudience::Users(recipients) => {
                    self.role.is_admin() || recipients.contains(&self.uuid)
                }
                NotificationAudience::Business(business) => self.administers(*business),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_admins_hold_business_capabilities() {
        let business = BusinessUuid::new();
        let actor = Actor::new(UserUuid::new(), Role::User).administering(business);

        assert!(actor.permits(&Capability::AdministerBusiness(business)));
        assert!(actor.permits(&Capability::DeleteListing(business)));
        assert!(actor.permits(&Capability::ViewSalesReport(business)));
    }

    #[test]
    fn other_users_are_refused() {
        let business = BusinessUuid::new();
        let actor = Actor::new(UserUuid::new(), Role::User).administering(BusinessUuid::new());

        assert!(!actor.permits(&Capability::AdministerBusiness(business)));
        assert!(!actor.permits(&Capability::ViewSalesReport(business)));
    }

    #[test]
    fn site_admins_hold_every_capability() {
        let actor = Actor::new(UserUuid::new(), Role::DefaultAdmin);

        assert!(actor.permits(&Capability::DeleteListing(BusinessUuid::new())));
        assert!(actor.permits(&Capability::DismissNotification(
            NotificationAudience::Users(vec![UserUuid::new()])
        )));
    }

    #[test]
    fn recipients_may_dismiss_their_notifications() {
        let actor = Actor::new(UserUuid::new(), Role::User);
        let mine = NotificationAudience::Users(vec![UserUuid::new(), actor.uuid]);
        let theirs = NotificationAudience::Users(vec![UserUuid::new()]);

        assert!(actor.permits(&Capability::DismissNotification(mine)));
        assert!(!actor.permits(&Capability::DismissNotification(theirs)));
    }

    #[test]
    fn roles_round_trip_through_storage_names() {
        for role in [Role::User, Role::Admin, Role::DefaultAdmin] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }

        assert!("owner".parse::<Role>().is_err());
    }
}
