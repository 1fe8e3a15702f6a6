use std::path::PathBuf;

use thiserror::Error;

/// Per-item failure returned by a process function.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors reported by a worker pool run.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("number of workers must be positive")]
    WorkersNotPositive,

    #[error("progress batch size must be positive")]
    ProgressBatchNotPositive,

    #[error("items must be non-empty")]
    EmptyItems,

    #[error("file path must be set")]
    MissingFilePath,

    #[error("process function must be set")]
    MissingProcessor,

    #[error("failed to open file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The failure channel had no room for a failed item.
    ///
    /// Only ever handed to the error notifier; the run itself still
    /// completes.
    #[error("error channel is full")]
    ErrorChannelFull,

    /// Some items failed. The failed items are returned next to this error.
    #[error("encountered {0} errors during processing")]
    ItemsFailed(usize),
}

impl PoolError {
    /// True for errors raised before any work started.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, PoolError::ErrorChannelFull | PoolError::ItemsFailed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_display() {
        assert_eq!(
            PoolError::WorkersNotPositive.to_string(),
            "number of workers must be positive"
        );
        assert_eq!(
            PoolError::ItemsFailed(2).to_string(),
            "encountered 2 errors during processing"
        );
        assert_eq!(PoolError::ErrorChannelFull.to_string(), "error channel is full");
    }

    #[test]
    fn test_open_error_preserves_source() {
        let err = PoolError::Open {
            path: PathBuf::from("/tmp/missing.jsonl"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };

        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "failed to open file /tmp/missing.jsonl: not found");
    }

    #[test]
    fn test_is_configuration() {
        assert!(PoolError::MissingProcessor.is_configuration());
        assert!(PoolError::EmptyItems.is_configuration());
        assert!(!PoolError::ItemsFailed(1).is_configuration());
    }
}
