// src/pool/processor.rs

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::types::BoxError;

/// Processes one item. A returned error marks the item as failed; it never
/// stops the other items.
///
/// The engine keeps its own copy of every item so a failed one can be
/// returned, which costs one `clone` per item. Wrap large items in an `Arc`
/// when that matters.
#[async_trait]
pub trait ItemProcessor<T>: Send + Sync {
    async fn process(&self, item: T) -> Result<(), BoxError>;
}

#[async_trait]
impl<T, F, Fut> ItemProcessor<T> for F
where
    F: Fn(T) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), BoxError>> + Send,
    T: Send + 'static,
{
    async fn process(&self, item: T) -> Result<(), BoxError> {
        self(item).await
    }
}

/// Called with `(processed, elapsed, items_per_second)` each time the
/// processed count reaches a multiple of the progress batch. Runs on a
/// worker task and must not block.
pub type ProgressNotifier = Arc<dyn Fn(usize, Duration, f64) + Send + Sync>;

/// Called with the failure and the failing item. Runs on a worker task and
/// must not block.
pub type ErrorNotifier<T> = Arc<dyn Fn(&BoxError, &T) + Send + Sync>;

/// Optional callbacks shared by every worker of a run.
pub(crate) struct Notifiers<T> {
    pub(crate) progress: Option<ProgressNotifier>,
    pub(crate) on_error: Option<ErrorNotifier<T>>,
}

impl<T> Default for Notifiers<T> {
    fn default() -> Self {
        Notifiers {
            progress: None,
            on_error: None,
        }
    }
}

/// Where a run's items come from.
///
/// The engine spawns [`Source::produce`] as its single producer task.
#[async_trait]
pub(crate) trait Source<T>: Send + 'static {
    /// Upper bound on the number of items this source yields. Sizes the
    /// failure channel so failed items never wait for room.
    fn capacity_hint(&self) -> usize;

    /// Sends every item into `tx`, returning once the source is exhausted or
    /// the receiving side is gone.
    async fn produce(self: Box<Self>, tx: mpsc::Sender<T>);
}
