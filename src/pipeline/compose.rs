use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use super::step::Step;
use super::types::{Flow, Outcome, StepError};
use super::value::Value;

/// Output of [`in_parallel`]: one entry per branch, in declaration order.
pub type BranchResults = Vec<Option<Value>>;

/// Why a parallel branch did not produce a value.
enum BranchFailure {
    Failed(StepError),
    Halted,
}

impl BranchFailure {
    fn into_outcome(self) -> Outcome {
        match self {
            BranchFailure::Failed(err) => Flow::ContinueWithError(None, err),
            BranchFailure::Halted => Flow::Halt,
        }
    }
}

/// Runs `pipeline` once, starting from no value and no error.
///
/// A halt that reaches the top level carries no earlier error, so it is
/// reported as `Continue(None)`.
pub async fn execute(pipeline: &Step) -> Outcome {
    match pipeline.call(None, None).await {
        Flow::Halt => Flow::Continue(None),
        outcome => outcome,
    }
}

/// Chains `steps` so each one receives the previous step's value and error.
///
/// Errors are advisory and flow to the next step. When a step halts, the
/// sequence stops and returns no value together with the error that step
/// was given. With no steps the input is returned unchanged.
pub fn in_sequence(steps: impl IntoIterator<Item = Step>) -> Step {
    let steps: Arc<[Step]> = steps.into_iter().collect();

    Step::from_fn(move |input, last_err| {
        let steps = Arc::clone(&steps);
        async move {
            let mut current = input;
            let mut current_err = last_err;

            for step in steps.iter() {
                match step.call(current, current_err.clone()).await {
                    Flow::Continue(value) => {
                        current = value;
                        current_err = None;
                    }
                    Flow::ContinueWithError(value, err) => {
                        current = value;
                        current_err = Some(err);
                    }
                    Flow::Halt => return Flow::from_parts(None, current_err),
                }
            }

            Flow::from_parts(current, current_err)
        }
    })
}

/// Runs every step concurrently on the same input and error.
///
/// The value is a [`BranchResults`] ordered like `steps`, whatever order the
/// branches finish in. If any branch fails, the first failure read from the
/// error channel is returned with no value; a halting branch halts the
/// parallel step itself. Losing branches are not cancelled: they run to
/// completion and their results are discarded. With no steps nothing is
/// spawned and `Continue(None)` is returned.
///
/// A panic inside a branch, such as a step receiving the wrong type, is
/// re-raised on the caller's task.
pub fn in_parallel(steps: impl IntoIterator<Item = Step>) -> Step {
    let steps: Arc<[Step]> = steps.into_iter().collect();

    Step::from_fn(move |input, last_err| {
        let steps = Arc::clone(&steps);
        async move {
            let branch_num = steps.len();
            if branch_num == 0 {
                return Flow::Continue(None);
            }

            debug!(branches = branch_num, "fanning out parallel branches");

            let (err_tx, mut err_rx) = mpsc::channel::<BranchFailure>(branch_num);
            let mut handles = Vec::with_capacity(branch_num);

            for step in steps.iter() {
                let step = step.clone();
                let input = input.clone();
                let last_err = last_err.clone();
                let err_tx = err_tx.clone();

                handles.push(tokio::spawn(async move {
                    let failure = match step.call(input, last_err).await {
                        Flow::Continue(value) => return value,
                        Flow::ContinueWithError(_, err) => BranchFailure::Failed(err),
                        Flow::Halt => BranchFailure::Halted,
                    };
                    // Capacity matches the branch count, so this only fails
                    // if the coordinator has already returned.
                    let _ = err_tx.try_send(failure);
                    None
                }));
            }
            drop(err_tx);

            let done = async move {
                let mut results: BranchResults = Vec::with_capacity(handles.len());
                for handle in handles {
                    match handle.await {
                        Ok(value) => results.push(value),
                        Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
                        Err(err) => return Err(StepError::new(err)),
                    }
                }
                Ok(results)
            };

            tokio::select! {
                biased;

                Some(failure) = err_rx.recv() => failure.into_outcome(),

                results = done => {
                    // Every branch has finished, so any failure is already queued.
                    if let Ok(failure) = err_rx.try_recv() {
                        return failure.into_outcome();
                    }
                    match results {
                        Ok(results) => Flow::Continue(Some(Value::new(results))),
                        Err(err) => Flow::ContinueWithError(None, err),
                    }
                }
            }
        }
    })
}
