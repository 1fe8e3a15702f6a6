//! # kyro
//!
//! Concurrent data-processing building blocks built on Tokio.
//!
//! ## Features
//!
//! - **Type-erased pipelines** composed sequentially or in parallel
//! - **Bounded worker pools** over in-memory items or the lines of a file
//! - **Failure aggregation** without aborting sibling items
//! - **Progress sampling** at configurable batch boundaries
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use kyro::pipeline::{execute, in_parallel, in_sequence, Step};
//!
//! let pipeline = in_sequence(vec![
//!     Step::generator(|| async { Ok::<_, kyro::pipeline::StepError>(21) }),
//!     in_parallel(vec![
//!         Step::new(|n: i32, _| async move { Ok(n * 2) }),
//!         Step::new(|n: i32, _| async move { Ok(n + 1) }),
//!     ]),
//! ]);
//!
//! let outcome = execute(&pipeline).await;
//! ```
//!
//! ```rust,ignore
//! use kyro::pool::ParallelQueue;
//!
//! let (failed, result) = ParallelQueue::new(4)
//!     .with_items(vec![1, 2, 3, 4])
//!     .on_process_item(|n: i32| async move { Ok(()) })
//!     .process()
//!     .await;
//! ```
//!
//! ## Modules
//!
//! - [`pipeline`] - Step abstraction, sequential/parallel composers and executor
//! - [`pool`] - Bounded worker pool engine for item collections and file lines
//! - [`util`] - Small helpers used alongside the engines

pub mod pipeline;
pub mod pool;
pub mod util;
