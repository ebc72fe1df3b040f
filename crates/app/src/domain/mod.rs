//! Marketplace Domain Concerns

pub mod directory;
pub mod inventory;
pub mod listings;
pub mod notifications;
pub mod sales;
