//! Ready-made steps.

use std::path::PathBuf;

use super::step::Step;
use super::types::{Flow, StepError};
use super::value::{Value, assert_in};
use crate::util::files::safe_remove_file;

/// Stops the enclosing sequence when the previous step reported an error.
/// Otherwise the value passes through untouched.
pub fn exit_on_error() -> Step {
    Step::from_fn(|input, last_err| async move {
        match last_err {
            Some(_) => Flow::Halt,
            None => Flow::Continue(input),
        }
    })
}

/// Deletes the file at `path` if it exists, passing the value and error
/// through. A failed deletion replaces the error.
pub fn remove_file(path: impl Into<PathBuf>) -> Step {
    let path = path.into();
    Step::from_fn(move |input, last_err| {
        let path = path.clone();
        async move {
            match safe_remove_file(&path).await {
                Ok(()) => Flow::from_parts(input, last_err),
                Err(err) => Flow::ContinueWithError(input, err.into()),
            }
        }
    })
}

/// Keeps the first `n` elements of a `Vec<T>`, or all of them if there are
/// fewer.
pub fn take_first<T>(n: usize) -> Step
where
    T: Clone + Send + Sync + 'static,
{
    Step::with_flow(move |items: Vec<T>, last_err| async move {
        Flow::from_parts(items.into_iter().take(n).collect::<Vec<T>>(), last_err)
    })
}

/// Keeps the last `n` elements of a `Vec<T>`, or all of them if there are
/// fewer.
pub fn take_last<T>(n: usize) -> Step
where
    T: Clone + Send + Sync + 'static,
{
    Step::with_flow(move |mut items: Vec<T>, last_err| async move {
        let start = items.len().saturating_sub(n);
        Flow::from_parts(items.split_off(start), last_err)
    })
}

/// Keeps `items[start..end]` of a `Vec<T>`.
///
/// An out-of-bounds or inverted range yields no value and an
/// `invalid range` error.
pub fn take_subset<T>(start: usize, end: usize) -> Step
where
    T: Clone + Send + Sync + 'static,
{
    Step::from_fn(move |input, last_err| {
        let mut items = assert_in::<Vec<T>>(input);
        async move {
            if start > end || end > items.len() {
                return Flow::ContinueWithError(
                    None,
                    StepError::msg(format!("invalid range: {start}-{end}")),
                );
            }
            items.truncate(end);
            let subset = items.split_off(start);
            Flow::from_parts(Some(Value::new(subset)), last_err)
        }
    })
}
