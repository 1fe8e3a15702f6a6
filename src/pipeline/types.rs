use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use super::value::Value;

/// Error carried alongside values through a pipeline.
///
/// Errors are shared rather than owned so the same error can be handed to
/// every branch of a parallel fan-out.
#[derive(Clone)]
pub struct StepError(Arc<dyn StdError + Send + Sync>);

impl StepError {
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        StepError(Arc::new(error))
    }

    /// Creates an error from a plain message.
    pub fn msg(message: impl Into<String>) -> Self {
        StepError(Arc::new(Message(message.into())))
    }

    /// Returns the underlying error.
    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.0
    }

    /// True when both handles point at the same error instance.
    pub fn ptr_eq(&self, other: &StepError) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl StdError for StepError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for StepError {
    fn from(error: Box<dyn StdError + Send + Sync>) -> Self {
        StepError(Arc::from(error))
    }
}

impl From<std::io::Error> for StepError {
    fn from(error: std::io::Error) -> Self {
        StepError::new(error)
    }
}

impl From<&str> for StepError {
    fn from(message: &str) -> Self {
        StepError::msg(message)
    }
}

impl From<String> for StepError {
    fn from(message: String) -> Self {
        StepError::msg(message)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct Message(String);

/// Result of running one step.
///
/// Errors do not stop a sequence on their own; only [`Flow::Halt`] does.
#[derive(Debug, Clone)]
pub enum Flow<T> {
    /// Hand the value to the next step with no error.
    Continue(T),
    /// Hand the value to the next step together with an advisory error.
    ContinueWithError(T, StepError),
    /// Stop the enclosing sequence.
    Halt,
}

/// Type-erased step result. `None` means no value has been produced.
pub type Outcome = Flow<Option<Value>>;

impl<T> Flow<T> {
    /// Builds a flow from a value and an optional error, the shape steps receive.
    pub fn from_parts(value: T, error: Option<StepError>) -> Self {
        match error {
            Some(error) => Flow::ContinueWithError(value, error),
            None => Flow::Continue(value),
        }
    }

    pub fn error(&self) -> Option<&StepError> {
        match self {
            Flow::ContinueWithError(_, error) => Some(error),
            _ => None,
        }
    }

    #[inline]
    pub fn is_halt(&self) -> bool {
        matches!(self, Flow::Halt)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Flow<U> {
        match self {
            Flow::Continue(value) => Flow::Continue(f(value)),
            Flow::ContinueWithError(value, error) => Flow::ContinueWithError(f(value), error),
            Flow::Halt => Flow::Halt,
        }
    }
}

impl Outcome {
    /// The produced value, if any.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Flow::Continue(value) | Flow::ContinueWithError(value, _) => value.as_ref(),
            Flow::Halt => None,
        }
    }

    /// Splits the outcome into the `(value, error)` pair steps exchange.
    /// A halt carries neither.
    pub fn into_parts(self) -> (Option<Value>, Option<StepError>) {
        match self {
            Flow::Continue(value) => (value, None),
            Flow::ContinueWithError(value, error) => (value, Some(error)),
            Flow::Halt => (None, None),
        }
    }

    /// Collapses the outcome into a `Result`, dropping any value that was
    /// produced alongside an error.
    pub fn into_result(self) -> Result<Option<Value>, StepError> {
        match self {
            Flow::Continue(value) => Ok(value),
            Flow::ContinueWithError(_, error) => Err(error),
            Flow::Halt => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_error_display_and_clone() {
        let err = StepError::msg("boom");
        let copy = err.clone();
        assert_eq!(err.to_string(), "boom");
        assert!(err.ptr_eq(&copy));
        assert!(!err.ptr_eq(&StepError::msg("boom")));
    }

    #[test]
    fn test_step_error_preserves_io_kind() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = StepError::from(source);
        let io = err.inner().downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_from_parts() {
        assert!(matches!(Flow::from_parts(1, None), Flow::Continue(1)));
        let flow = Flow::from_parts(2, Some(StepError::msg("e")));
        assert_eq!(flow.error().unwrap().to_string(), "e");
    }

    #[test]
    fn test_outcome_into_result() {
        let ok: Outcome = Flow::Continue(Some(Value::new(5)));
        assert!(ok.into_result().unwrap().unwrap().is::<i32>());

        let failed: Outcome = Flow::ContinueWithError(Some(Value::new(5)), "bad".into());
        assert_eq!(failed.into_result().unwrap_err().to_string(), "bad");

        let halted: Outcome = Flow::Halt;
        assert!(halted.into_result().unwrap().is_none());
    }
}
