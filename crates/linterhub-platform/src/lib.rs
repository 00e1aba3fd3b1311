//! Host introspection and process plumbing for linterhub.
//!
//! - [`platform`] - OS family and architecture of the running host
//! - [`command`] - subprocess execution behind the [`CommandRunner`] seam
//! - [`dir`] - per-user data directories

pub use command::{CommandRunner, CommandSpec, ProcessRunner, strip_line_breaks};
pub use error::{ExecError, Result};
pub use os::OsFamily;
pub use platform::{PlatformInfo, detect};

pub mod arch;
pub mod command;
pub mod dir;
mod error;
pub mod os;
pub mod platform;
