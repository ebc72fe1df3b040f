//! Notification Handlers

pub(crate) mod dismiss;
