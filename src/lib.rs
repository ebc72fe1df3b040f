//! Marketplace
//!
//! Domain rules for a marketplace of business inventory and sale listings:
//! entity validation, inventory policy, search terms, notification wording,
//! capabilities and sales report bucketing. Nothing in this crate performs I/O.

pub mod actors;
pub mod businesses;
pub mod inventory;
pub mod listings;
pub mod notifications;
pub mod pricing;
pub mod reports;
pub mod sales;
pub mod search;
pub mod uuids;
