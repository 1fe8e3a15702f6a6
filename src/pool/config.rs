// src/pool/config.rs

use derive_builder::Builder;

use super::types::PoolError;

/// Default number of processed items between progress notifications.
pub const DEFAULT_PROGRESS_BATCH: usize = 100;

#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct Config {
    /// Number of concurrent worker tasks
    #[builder(default = "num_cpus::get()")]
    pub(crate) worker_num: usize,

    /// Number of processed items between progress notifications
    #[builder(default = "DEFAULT_PROGRESS_BATCH")]
    pub(crate) progress_batch: usize,
}

impl Config {
    pub fn new(worker_num: usize) -> Self {
        Config {
            worker_num,
            progress_batch: DEFAULT_PROGRESS_BATCH,
        }
    }

    /// Returns the number of worker tasks
    #[inline]
    pub fn worker_num(&self) -> usize {
        self.worker_num
    }

    /// Returns the progress batch size
    #[inline]
    pub fn progress_batch(&self) -> usize {
        self.progress_batch
    }

    pub(crate) fn validate(&self) -> Result<(), PoolError> {
        if self.worker_num == 0 {
            return Err(PoolError::WorkersNotPositive);
        }
        if self.progress_batch == 0 {
            return Err(PoolError::ProgressBatchNotPositive);
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(num_cpus::get())
    }
}
