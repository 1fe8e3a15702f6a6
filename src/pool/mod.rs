//! Bounded worker pools.
//!
//! [`ParallelQueue`] processes an in-memory collection and
//! [`ParallelFileProcessor`] processes the lines of a file. Both run on the
//! same engine: one producer feeds a channel bounded to the worker count,
//! workers record failures without stopping, and progress is sampled every
//! `progress_batch` items.

mod engine;

pub mod config;
pub mod file;
pub mod processor;
pub mod queue;
pub mod types;

pub use config::{Config, ConfigBuilder, DEFAULT_PROGRESS_BATCH};
pub use file::{Line, ParallelFileProcessor};
pub use processor::{ErrorNotifier, ItemProcessor, ProgressNotifier};
pub use queue::ParallelQueue;
pub use types::{BoxError, PoolError};
