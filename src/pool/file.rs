use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::error;

use super::config::Config;
use super::engine::Engine;
use super::processor::{ItemProcessor, Notifiers, Source};
use super::types::{BoxError, PoolError};

/// One line of the input file, without its trailing `\n`.
pub type Line = Vec<u8>;

/// Processes the lines of a file with a fixed number of workers.
///
/// Lines are read lazily by a single producer task; the file is never
/// loaded whole.
pub struct ParallelFileProcessor {
    config: Config,
    path: Option<PathBuf>,
    processor: Option<Arc<dyn ItemProcessor<Line>>>,
    notifiers: Notifiers<Line>,
}

impl ParallelFileProcessor {
    pub fn new(worker_num: usize) -> Self {
        Self::with_config(Config::new(worker_num))
    }

    pub fn with_config(config: Config) -> Self {
        ParallelFileProcessor {
            config,
            path: None,
            processor: None,
            notifiers: Notifiers::default(),
        }
    }

    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the function used to process each line.
    pub fn on_process_line<P>(mut self, processor: P) -> Self
    where
        P: ItemProcessor<Line> + 'static,
    {
        self.processor = Some(Arc::new(processor));
        self
    }

    /// Sets the progress notifier, called every `batch` processed lines.
    pub fn with_progress_notifier<F>(mut self, batch: usize, notifier: F) -> Self
    where
        F: Fn(usize, Duration, f64) + Send + Sync + 'static,
    {
        self.config.progress_batch = batch;
        self.notifiers.progress = Some(Arc::new(notifier));
        self
    }

    /// Sets the function called for every failed line.
    pub fn with_error_notifier<F>(mut self, notifier: F) -> Self
    where
        F: Fn(&BoxError, &Line) + Send + Sync + 'static,
    {
        self.notifiers.on_error = Some(Arc::new(notifier));
        self
    }

    /// Processes every line and returns the ones that failed.
    ///
    /// The file is opened before any task is spawned; failing to open it is
    /// a configuration error returned with an empty list.
    pub async fn process(self) -> (Vec<Line>, Result<(), PoolError>) {
        if let Err(err) = self.config.validate() {
            return (Vec::new(), Err(err));
        }

        let Some(path) = self.path.filter(|path| !path.as_os_str().is_empty()) else {
            return (Vec::new(), Err(PoolError::MissingFilePath));
        };

        let Some(processor) = self.processor else {
            return (Vec::new(), Err(PoolError::MissingProcessor));
        };

        let source = match LinesSource::open(path).await {
            Ok(source) => source,
            Err(err) => return (Vec::new(), Err(err)),
        };

        Engine::new(self.config, processor, self.notifiers)
            .run(Box::new(source))
            .await
    }
}

/// Streams `\n`-delimited lines from a buffered reader, normally an open
/// file. `path` only labels read errors.
struct LinesSource<R> {
    path: PathBuf,
    reader: R,
    max_lines: usize,
}

impl LinesSource<BufReader<File>> {
    async fn open(path: PathBuf) -> Result<Self, PoolError> {
        let opened = async {
            let file = File::open(&path).await?;
            let len = file.metadata().await?.len();
            Ok::<_, std::io::Error>((file, len))
        };

        match opened.await {
            Ok((file, len)) => Ok(LinesSource {
                // A file of n bytes holds at most n + 1 lines.
                max_lines: usize::try_from(len).unwrap_or(usize::MAX).saturating_add(1),
                reader: BufReader::new(file),
                path,
            }),
            Err(source) => Err(PoolError::Open { path, source }),
        }
    }
}

#[async_trait]
impl<R> Source<Line> for LinesSource<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    fn capacity_hint(&self) -> usize {
        // tokio caps channel capacity well below usize::MAX.
        self.max_lines.min(usize::MAX >> 4)
    }

    async fn produce(self: Box<Self>, tx: mpsc::Sender<Line>) {
        let LinesSource { path, mut reader, .. } = *self;

        loop {
            let mut line = Vec::new();
            match reader.read_until(b'\n', &mut line).await {
                Ok(0) => break,
                Ok(_) => {
                    if line.last() == Some(&b'\n') {
                        line.pop();
                    }
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
                Err(err) => {
                    // Treated as the end of the stream, not as a failed line.
                    error!(path = %path.display(), error = %err, "read error");
                    break;
                }
            }
        }
    }
}
