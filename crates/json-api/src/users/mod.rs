//! The authenticated user's own feeds

mod handlers;

pub(crate) use handlers::*;
