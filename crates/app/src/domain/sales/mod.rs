//! Sales
//!
//! The sold-listing archive and the reports built from it.

pub mod data;
pub mod errors;
mod repository;
pub mod service;

pub use errors::SalesServiceError;
pub use repository::*;
pub use service::*;
