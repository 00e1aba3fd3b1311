//! Install pipeline for the linterhub CLI.
//!
//! Platform detection feeds a [`PackageDescriptor`], which names the release
//! archive to download; the archive is then unpacked next to it. In
//! containerized mode the pipeline pulls an image instead.

pub use error::{InstallError, Result};
pub use installer::{CliInstaller, InstallRequest, InstalledCli, Installer};
pub use package::{DEFAULT_IMAGE, Mode, PREFIX, PackageDescriptor};
pub use probe::Probes;

mod error;
pub mod installer;
pub mod package;
pub mod probe;
