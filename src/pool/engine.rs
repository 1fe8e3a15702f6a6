use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};

use super::config::Config;
use super::processor::{ItemProcessor, Notifiers, Source};
use super::types::{BoxError, PoolError};

/// State shared by every worker of one run.
struct Shared<T> {
    processor: Arc<dyn ItemProcessor<T>>,
    notifiers: Notifiers<T>,
    progress_batch: usize,
    processed: Mutex<usize>,
    started: Instant,
}

/// Fixed-size worker pool over a single bounded item channel.
///
/// The front-ends validate their settings and open their source before
/// building an engine, so a run never starts half configured.
pub(crate) struct Engine<T> {
    config: Config,
    processor: Arc<dyn ItemProcessor<T>>,
    notifiers: Notifiers<T>,
}

impl<T> Engine<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(
        config: Config,
        processor: Arc<dyn ItemProcessor<T>>,
        notifiers: Notifiers<T>,
    ) -> Self {
        Self {
            config,
            processor,
            notifiers,
        }
    }

    /// Processes every item of `source` and returns the failed items.
    ///
    /// The error is `ItemsFailed` naming the failure count when any item
    /// failed. One failure never stops the rest of the run.
    pub(crate) async fn run(self, source: Box<dyn Source<T>>) -> (Vec<T>, Result<(), PoolError>) {
        let worker_num = self.config.worker_num;
        let failure_capacity = source.capacity_hint().max(1);

        let (item_tx, item_rx) = mpsc::channel::<T>(worker_num);
        let (failed_tx, mut failed_rx) = mpsc::channel::<T>(failure_capacity);
        let receiver = Arc::new(Mutex::new(item_rx));

        let shared = Arc::new(Shared {
            processor: self.processor,
            notifiers: self.notifiers,
            progress_batch: self.config.progress_batch,
            processed: Mutex::new(0),
            started: Instant::now(),
        });

        debug!(workers = worker_num, failure_capacity, "starting worker pool");

        let mut handles = Vec::with_capacity(worker_num);
        for worker_id in 0..worker_num {
            let receiver = Arc::clone(&receiver);
            let failed_tx = failed_tx.clone();
            let shared = Arc::clone(&shared);

            handles.push(tokio::spawn(async move {
                Self::worker(worker_id, receiver, failed_tx, shared).await
            }));
        }
        drop(failed_tx);
        drop(receiver);

        let producer = tokio::spawn(source.produce(item_tx));

        for handle in handles {
            if let Err(err) = handle.await {
                if err.is_panic() {
                    std::panic::resume_unwind(err.into_panic());
                }
            }
        }
        if let Err(err) = producer.await {
            if err.is_panic() {
                std::panic::resume_unwind(err.into_panic());
            }
        }

        let mut failed = Vec::new();
        while let Some(item) = failed_rx.recv().await {
            failed.push(item);
        }

        let processed = *shared.processed.lock().await;
        info!(
            processed,
            failed = failed.len(),
            elapsed = ?shared.started.elapsed(),
            "worker pool finished"
        );

        if failed.is_empty() {
            (failed, Ok(()))
        } else {
            let count = failed.len();
            (failed, Err(PoolError::ItemsFailed(count)))
        }
    }

    async fn worker(
        worker_id: usize,
        receiver: Arc<Mutex<mpsc::Receiver<T>>>,
        failed_tx: mpsc::Sender<T>,
        shared: Arc<Shared<T>>,
    ) {
        loop {
            let item = {
                let mut rx = receiver.lock().await;
                rx.recv().await
            };

            let Some(item) = item else {
                debug!(worker_id, "item channel closed");
                return;
            };

            if let Err(err) = shared.processor.process(item.clone()).await {
                Self::report_failure(&shared, &failed_tx, err, item);
            }

            Self::record_processed(&shared).await;
        }
    }

    fn report_failure(shared: &Shared<T>, failed_tx: &mpsc::Sender<T>, err: BoxError, item: T) {
        let on_error = shared.notifiers.on_error.as_ref();
        let notified = on_error.map(|_| item.clone());

        match failed_tx.try_send(item) {
            Ok(()) => {
                if let (Some(on_error), Some(item)) = (on_error, notified) {
                    on_error(&err, &item);
                }
            }
            Err(TrySendError::Full(item)) | Err(TrySendError::Closed(item)) => {
                warn!(error = %err, "failure channel has no room, item may be missing from the result");
                if let Some(on_error) = on_error {
                    let fault: BoxError = Box::new(PoolError::ErrorChannelFull);
                    on_error(&fault, &item);
                    on_error(&err, &item);
                }
            }
        }
    }

    async fn record_processed(shared: &Shared<T>) {
        let current = {
            let mut processed = shared.processed.lock().await;
            *processed += 1;
            *processed
        };

        if let Some(progress) = &shared.notifiers.progress {
            if current % shared.progress_batch == 0 {
                let elapsed = shared.started.elapsed();
                progress(current, elapsed, throughput(current, elapsed));
            }
        }
    }
}

/// Items per second, or `0.0` before the clock has measurably advanced.
fn throughput(count: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 { count as f64 / secs } else { 0.0 }
}
