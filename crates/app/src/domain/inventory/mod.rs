//! Inventory

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::InventoryServiceError;
pub use repository::*;
pub use service::*;
