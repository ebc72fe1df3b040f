//! Authentication
//!
//! Opaque bearer session tokens. Only the SHA-256 hash of a token is stored.

mod errors;
mod service;
mod token;

pub use errors::*;
pub use service::*;
pub use token::*;
