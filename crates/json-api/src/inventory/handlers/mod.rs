//! Inventory Handlers

pub(crate) mod create;
pub(crate) mod get;
