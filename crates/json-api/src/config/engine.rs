//! Engine Config

use std::time::Duration;

use clap::Args;
use marketplace::{
    inventory::InventoryPolicy,
    pricing::{UnknownCurrency, currency},
};
use marketplace_app::{outbox::RetryPolicy, settings::EngineSettings};

/// Listing engine settings.
#[derive(Debug, Args)]
pub struct EngineConfig {
    /// How purchases draw down stock (guarded, permissive)
    #[arg(long, env = "INVENTORY_POLICY", default_value = "guarded")]
    pub inventory_policy: InventoryPolicy,

    /// ISO 4217 code prices are displayed in
    #[arg(long, env = "CURRENCY", default_value = "USD")]
    pub currency: String,

    /// Retries for a failed notification or archive write
    #[arg(long, env = "OUTBOX_MAX_RETRIES", default_value_t = 3)]
    pub outbox_max_retries: u32,

    /// Delay before the first retry
    #[arg(long, env = "OUTBOX_INITIAL_DELAY_MS", default_value_t = 100)]
    pub outbox_initial_delay_ms: u64,

    /// Upper bound on the delay between retries
    #[arg(long, env = "OUTBOX_MAX_DELAY_MS", default_value_t = 30_000)]
    pub outbox_max_delay_ms: u64,

    /// Growth factor between consecutive retry delays
    #[arg(long, env = "OUTBOX_BACKOFF_MULTIPLIER", default_value_t = 2.0)]
    pub outbox_backoff_multiplier: f64,
}

impl EngineConfig {
    /// Resolve into the settings the engine runs with.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown currency code.
    pub fn settings(&self) -> Result<EngineSettings, UnknownCurrency> {
        Ok(EngineSettings {
            inventory_policy: self.inventory_policy,
            currency: currency(&self.currency)?,
            outbox: RetryPolicy {
                max_retries: self.outbox_max_retries,
                initial_delay: Duration::from_millis(self.outbox_initial_delay_ms),
                max_delay: Duration::from_millis(self.outbox_max_delay_ms),
                multiplier: self.outbox_backoff_multiplier,
            },
        })
    }
}
