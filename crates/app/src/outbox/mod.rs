//! Side-effect outbox
//!
//! Sale archiving and notifications are written after the transaction that
//! caused them has committed. Publishing never blocks the caller; a worker
//! task applies each batch in order and retries transient storage failures.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use marketplace::{
    notifications::{ListingNotification, SoldListingNotification},
    sales::SoldListing,
};
use mockall::automock;
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tracing::{debug, error};

use crate::domain::{notifications::NotificationsRepository, sales::SalesRepository};

mod retry;

pub use retry::{RetryPolicy, retry_with_backoff};

/// A write that must not hold up the transaction that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    /// Store a sale in the archive.
    ArchiveSale(SoldListing),

    /// Notify users about a listing.
    NotifyUsers(ListingNotification),

    /// Notify a business about one of its sales.
    NotifyBusiness(SoldListingNotification),
}

impl SideEffect {
    /// Short name for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ArchiveSale(_) => "archive_sale",
            Self::NotifyUsers(_) => "notify_users",
            Self::NotifyBusiness(_) => "notify_business",
        }
    }
}

/// Accepts side effects for later application.
#[automock]
pub trait Outbox: Send + Sync {
    /// Queue a batch. Effects in a batch are applied in order.
    fn publish(&self, effects: Vec<SideEffect>);
}

/// Applies a single side effect to storage.
#[automock]
#[async_trait]
pub trait EffectSink: Send + Sync {
    /// Write one effect.
    async fn apply(&self, effect: &SideEffect) -> Result<(), sqlx::Error>;
}

/// Writes side effects through the sales and notifications repositories.
#[derive(Clone)]
pub struct RepositorySink {
    sales: Arc<dyn SalesRepository>,
    notifications: Arc<dyn NotificationsRepository>,
}

impl RepositorySink {
    #[must_use]
    pub fn new(
        sales: Arc<dyn SalesRepository>,
        notifications: Arc<dyn NotificationsRepository>,
    ) -> Self {
        Self {
            sales,
            notifications,
        }
    }
}

impl fmt::Debug for RepositorySink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositorySink").finish_non_exhaustive()
    }
}

#[async_trait]
impl EffectSink for RepositorySink {
    async fn apply(&self, effect: &SideEffect) -> Result<(), sqlx::Error> {
        match effect {
            SideEffect::ArchiveSale(sold) => self.sales.create_sold_listing(sold).await,
            SideEffect::NotifyUsers(notification) => {
                self.notifications
                    .create_listing_notification(notification)
                    .await
            }
            SideEffect::NotifyBusiness(notification) => {
                self.notifications
                    .create_sold_listing_notification(notification)
                    .await
            }
        }
    }
}

/// Outbox backed by an unbounded channel and a background task.
#[derive(Debug, Clone)]
pub struct TaskOutbox {
    sender: mpsc::UnboundedSender<Vec<SideEffect>>,
}

/// Handle on the task draining a [`TaskOutbox`].
#[derive(Debug)]
pub struct OutboxWorker {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl TaskOutbox {
    /// Start the worker. Must be called inside a Tokio runtime.
    #[must_use]
    pub fn spawn(sink: Arc<dyn EffectSink>, policy: RetryPolicy) -> (Self, OutboxWorker) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (stop, stopped) = oneshot::channel();

        let handle = tokio::spawn(run(receiver, stopped, sink, policy));

        (Self { sender }, OutboxWorker { stop, handle })
    }
}

impl Outbox for TaskOutbox {
    fn publish(&self, effects: Vec<SideEffect>) {
        if effects.is_empty() {
            return;
        }

        if let Err(mpsc::error::SendError(effects)) = self.sender.send(effects) {
            for effect in &effects {
                error!(effect = effect.kind(), ?effect, "outbox closed, dropping side effect");
            }
        }
    }
}

impl OutboxWorker {
    /// Stop accepting batches and wait for queued ones to be applied.
    pub async fn drain(self) {
        if self.stop.send(()).is_err() {
            debug!("outbox worker already stopped");
        }

        if let Err(error) = self.handle.await {
            error!(%error, "outbox worker panicked");
        }
    }
}

async fn run(
    mut receiver: mpsc::UnboundedReceiver<Vec<SideEffect>>,
    mut stopped: oneshot::Receiver<()>,
    sink: Arc<dyn EffectSink>,
    policy: RetryPolicy,
) {
    loop {
        tokio::select! {
            batch = receiver.recv() => match batch {
                Some(batch) => apply_batch(sink.as_ref(), &policy, batch).await,
                None => return,
            },
            _ = &mut stopped => break,
        }
    }

    receiver.close();

    while let Some(batch) = receiver.recv().await {
        apply_batch(sink.as_ref(), &policy, batch).await;
    }
}

async fn apply_batch(sink: &dyn EffectSink, policy: &RetryPolicy, batch: Vec<SideEffect>) {
    for effect in batch {
        let pending = &effect;
        let applied = retry_with_backoff(policy, is_transient, move || sink.apply(pending)).await;

        match applied {
            Ok(()) => debug!(effect = effect.kind(), "applied side effect"),
            Err(error) if is_transient(&error) => error!(
                effect = effect.kind(),
                ?effect,
                %error,
                max_retries = policy.max_retries,
                "side effect failed after retries, dropping"
            ),
            Err(error) => error!(
                effect = effect.kind(),
                ?effect,
                %error,
                "side effect rejected by storage, dropping"
            ),
        }
    }
}

/// Failures worth another attempt: lost connections, pool exhaustion,
/// serialization failures and deadlocks.
fn is_transient(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(database) => database
            .code()
            .is_some_and(|code| matches!(&*code, "40001" | "40P01")),
        _ => false,
    }
}
