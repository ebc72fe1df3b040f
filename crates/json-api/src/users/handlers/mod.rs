//! User Handlers

pub(crate) mod bookmarks;
pub(crate) mod notifications;
