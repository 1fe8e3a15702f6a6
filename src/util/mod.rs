//! Small helpers commonly used from process functions and pipeline steps.

pub mod files;
pub mod functional;
pub mod limiter;
pub mod rotator;
pub mod set;

pub use files::safe_remove_file;
pub use limiter::{LimiterError, RateLimiter};
pub use rotator::{RoundRobin, RoundRobinError};
pub use set::SimpleSet;
