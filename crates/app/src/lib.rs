//! Shared application domain and persistence modules.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod outbox;
pub mod settings;

#[cfg(all(test, feature = "db-tests"))]
mod test;
