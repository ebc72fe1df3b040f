//! Notifications

pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::NotificationsServiceError;
pub use repository::*;
pub use service::*;
