use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use super::types::{Flow, Outcome, StepError};
use super::value::{Value, assert_in};

type StepFn = dyn Fn(Option<Value>, Option<StepError>) -> BoxFuture<'static, Outcome> + Send + Sync;

/// A unit of pipeline computation.
///
/// Steps are statically typed when they are built and invoked through one
/// uniform, dynamically checked contract: `(value, prior error) -> Outcome`.
/// A `Step` is immutable and cheap to clone, so a composed pipeline can be
/// executed any number of times.
#[derive(Clone)]
pub struct Step {
    run: Arc<StepFn>,
}

impl Step {
    /// Wraps an already type-erased computation.
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(Option<Value>, Option<StepError>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Outcome> + Send + 'static,
    {
        Step {
            run: Arc::new(move |input, last_err| f(input, last_err).boxed()),
        }
    }

    /// Wraps a typed computation returning `Result`.
    ///
    /// The input is downcast to `I` before `f` runs; the "no value yet"
    /// sentinel becomes `I::default()`. An `Err` is handed to the next step
    /// as an advisory error with no value.
    ///
    /// # Panics
    ///
    /// The returned step panics when invoked with a value that is not an `I`.
    pub fn new<I, O, F, Fut>(f: F) -> Self
    where
        I: Any + Clone + Default + Send + Sync,
        O: Any + Send + Sync,
        F: Fn(I, Option<StepError>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, StepError>> + Send + 'static,
    {
        Step::from_fn(move |input, last_err| {
            let fut = f(assert_in::<I>(input), last_err);
            async move {
                match fut.await {
                    Ok(output) => Flow::Continue(Some(Value::new(output))),
                    Err(err) => Flow::ContinueWithError(None, err),
                }
            }
        })
    }

    /// Wraps a typed computation that decides its own [`Flow`], for steps
    /// that forward the prior error or stop the sequence.
    ///
    /// # Panics
    ///
    /// Same input contract as [`Step::new`].
    pub fn with_flow<I, O, F, Fut>(f: F) -> Self
    where
        I: Any + Clone + Default + Send + Sync,
        O: Any + Send + Sync,
        F: Fn(I, Option<StepError>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Flow<O>> + Send + 'static,
    {
        Step::from_fn(move |input, last_err| {
            let fut = f(assert_in::<I>(input), last_err);
            async move { fut.await.map(|output| Some(Value::new(output))) }
        })
    }

    /// Wraps a computation that produces a value from nothing. The incoming
    /// value and error are ignored.
    pub fn generator<O, F, Fut>(f: F) -> Self
    where
        O: Any + Send + Sync,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, StepError>> + Send + 'static,
    {
        Step::from_fn(move |_, _| {
            let fut = f();
            async move {
                match fut.await {
                    Ok(output) => Flow::Continue(Some(Value::new(output))),
                    Err(err) => Flow::ContinueWithError(None, err),
                }
            }
        })
    }

    /// Invokes the step.
    pub fn call(&self, input: Option<Value>, last_err: Option<StepError>) -> BoxFuture<'static, Outcome> {
        (self.run)(input, last_err)
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step").finish_non_exhaustive()
    }
}
