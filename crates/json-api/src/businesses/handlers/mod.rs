//! Business Handlers

pub(crate) mod notifications;
pub(crate) mod report;
pub(crate) mod sales;
