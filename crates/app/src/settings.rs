//! Engine settings

use marketplace::inventory::InventoryPolicy;
use rusty_money::iso::{self, Currency};

use crate::outbox::RetryPolicy;

/// Knobs the listing engine reads at startup.
#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    /// How purchases draw down stock.
    pub inventory_policy: InventoryPolicy,

    /// Currency prices are displayed in.
    pub currency: &'static Currency,

    /// Retry policy for side effects.
    pub outbox: RetryPolicy,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            inventory_policy: InventoryPolicy::default(),
            currency: iso::USD,
            outbox: RetryPolicy::default(),
        }
    }
}
