//! Zip extraction for the linterhub CLI package.
//!
//! Entries are processed strictly one at a time in archive order. A failure
//! aborts the remaining entries and leaves whatever was already written in
//! place; callers should clear the target before retrying.
//!
//! - `entry.rs` - Per-entry classification and path resolution
//! - `options.rs` - Executable policy and cancellation
//! - `extract.rs` - The extraction loop
//! - `perm.rs` - Mode bits

pub use entry::ArchiveEntry;
pub use error::{ExtractError, Result};
pub use extract::{ExtractReport, extract, extract_async};
pub use options::{ExecutablePolicy, ExtractOptions};

pub mod entry;
mod error;
pub mod extract;
pub mod options;
pub mod perm;
