//! Listings
//!
//! Live offers of inventory, their bookmarks and the purchase transition.

pub mod data;
pub mod errors;
mod fanout;
pub mod records;
mod repository;
pub mod service;

pub use errors::ListingsServiceError;
pub use repository::*;
pub use service::*;
