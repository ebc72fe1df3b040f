//! Listing Handlers

pub(crate) mod bookmark;
pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod purchase;
pub(crate) mod search;
