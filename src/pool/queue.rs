use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::config::Config;
use super::engine::Engine;
use super::processor::{ItemProcessor, Notifiers, Source};
use super::types::{BoxError, PoolError};

/// Processes an in-memory collection with a fixed number of workers.
///
/// Every `with_*`/`on_*` call consumes the queue and returns it, and
/// [`ParallelQueue::process`] freezes the result for the run.
pub struct ParallelQueue<T> {
    config: Config,
    items: Option<Arc<[T]>>,
    processor: Option<Arc<dyn ItemProcessor<T>>>,
    notifiers: Notifiers<T>,
}

impl<T> ParallelQueue<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(worker_num: usize) -> Self {
        Self::with_config(Config::new(worker_num))
    }

    pub fn with_config(config: Config) -> Self {
        ParallelQueue {
            config,
            items: None,
            processor: None,
            notifiers: Notifiers::default(),
        }
    }

    /// Sets the items to process. The collection is shared with the
    /// producer task, not copied.
    pub fn with_items(mut self, items: impl Into<Arc<[T]>>) -> Self {
        self.items = Some(items.into());
        self
    }

    /// Sets the function used to process each item.
    pub fn on_process_item<P>(mut self, processor: P) -> Self
    where
        P: ItemProcessor<T> + 'static,
    {
        self.processor = Some(Arc::new(processor));
        self
    }

    /// Sets the progress notifier, called every `batch` processed items.
    pub fn with_progress_notifier<F>(mut self, batch: usize, notifier: F) -> Self
    where
        F: Fn(usize, Duration, f64) + Send + Sync + 'static,
    {
        self.config.progress_batch = batch;
        self.notifiers.progress = Some(Arc::new(notifier));
        self
    }

    /// Sets the function called for every failed item.
    pub fn with_error_notifier<F>(mut self, notifier: F) -> Self
    where
        F: Fn(&BoxError, &T) + Send + Sync + 'static,
    {
        self.notifiers.on_error = Some(Arc::new(notifier));
        self
    }

    /// Processes every item and returns the ones that failed.
    ///
    /// Both halves must be checked: a configuration error comes back with
    /// an empty list before any task is spawned, while `ItemsFailed` comes
    /// back with the failed items.
    pub async fn process(self) -> (Vec<T>, Result<(), PoolError>) {
        if let Err(err) = self.config.validate() {
            return (Vec::new(), Err(err));
        }

        let items = match self.items {
            Some(items) if !items.is_empty() => items,
            _ => return (Vec::new(), Err(PoolError::EmptyItems)),
        };

        let Some(processor) = self.processor else {
            return (Vec::new(), Err(PoolError::MissingProcessor));
        };

        Engine::new(self.config, processor, self.notifiers)
            .run(Box::new(ItemsSource { items }))
            .await
    }
}

/// Feeds a shared slice into the item channel in order.
struct ItemsSource<T> {
    items: Arc<[T]>,
}

#[async_trait]
impl<T> Source<T> for ItemsSource<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn capacity_hint(&self) -> usize {
        self.items.len()
    }

    async fn produce(self: Box<Self>, tx: mpsc::Sender<T>) {
        for item in self.items.iter() {
            if tx.send(item.clone()).await.is_err() {
                break;
            }
        }
    }
}
