//! Type-erased pipeline combinators.
//!
//! A pipeline is an immutable tree of [`Step`]s built with [`in_sequence`]
//! and [`in_parallel`] and run with [`execute`].

pub mod compose;
pub mod step;
pub mod steps;
pub mod types;
pub mod value;

pub use compose::{BranchResults, execute, in_parallel, in_sequence};
pub use step::Step;
pub use steps::{exit_on_error, remove_file, take_first, take_last, take_subset};
pub use types::{Flow, Outcome, StepError};
pub use value::{Value, assert_in};
