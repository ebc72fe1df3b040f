//! Directory
//!
//! Users, sessions, businesses and products. The listing engine only reads
//! from here; records are created by the admin CLI.

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::DirectoryServiceError;
pub use repository::*;
pub use service::*;
