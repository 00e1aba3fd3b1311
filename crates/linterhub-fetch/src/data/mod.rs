//! Immutable data types for download operations.

pub mod options;
pub mod progress;

pub use options::FetchOptions;
pub use progress::{Progress, ProgressTracker};
