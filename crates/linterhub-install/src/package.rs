//! Package naming.
//!
//! Everything here is a pure function of the descriptor's fields.

use std::fmt;
use std::path::{Path, PathBuf};

use linterhub_platform::{OsFamily, PlatformInfo};
use serde::{Deserialize, Serialize};

use crate::error::{InstallError, Result};

/// Release download prefix; the version and archive name are appended.
pub const PREFIX: &str = "https://github.com/Repometric/linterhub-cli/releases/download/";

/// Image pulled in containerized mode when none is configured.
pub const DEFAULT_IMAGE: &str = "repometric/linterhub-cli";

/// How the CLI is run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    /// Self-contained native binary.
    #[default]
    Native,
    /// Portable build run through a pre-installed `dotnet`.
    #[serde(alias = "dotnet")]
    ManagedRuntime,
    /// Runs inside a container image.
    #[serde(alias = "docker")]
    Containerized,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Native => "native",
            Self::ManagedRuntime => "managedRuntime",
            Self::Containerized => "containerized",
        })
    }
}

/// Identity of one downloadable CLI package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    platform: PlatformInfo,
    folder:   PathBuf,
    mode:     Mode,
    version:  String,
}

impl PackageDescriptor {
    /// Containerized mode is rejected because it has no archive.
    pub fn new(
        platform: PlatformInfo,
        folder: impl Into<PathBuf>,
        mode: Mode,
        version: impl Into<String>,
    ) -> Result<Self> {
        let folder = folder.into();
        let version = version.into();
        if version.is_empty() {
            return Err(InstallError::EmptyVersion);
        }
        if folder.as_os_str().is_empty() {
            return Err(InstallError::EmptyFolder);
        }
        if mode == Mode::Containerized {
            return Err(InstallError::NoArchivePackage);
        }
        Ok(Self {
            platform,
            folder,
            mode,
            version,
        })
    }

    pub fn platform(&self) -> &PlatformInfo { &self.platform }

    pub fn folder(&self) -> &Path { &self.folder }

    pub fn mode(&self) -> Mode { self.mode }

    pub fn version(&self) -> &str { &self.version }

    /// Platform token. Unrecognised systems get `unknown` rather than an
    /// error.
    pub fn package_name(&self) -> &'static str {
        if self.mode == Mode::ManagedRuntime {
            return "dotnet";
        }
        match self.platform.os() {
            OsFamily::Macos => "osx.10.11-x64",
            OsFamily::Windows => "win10-x64",
            OsFamily::Linux => "debian.8-x64",
            OsFamily::Unknown => "unknown",
        }
    }

    pub fn full_name(&self) -> String { format!("linterhub-cli-{}", self.package_name()) }

    pub fn archive_file_name(&self) -> String { format!("{}.zip", self.full_name()) }

    pub fn archive_local_path(&self) -> PathBuf { self.folder.join(self.archive_file_name()) }

    pub fn download_url(&self) -> String { format!("{PREFIX}{}/{}", self.version, self.archive_file_name()) }

    /// Directory holding the unpacked CLI for this package.
    pub fn install_path(&self) -> PathBuf { self.folder.join("bin").join(self.package_name()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linux() -> PlatformInfo { PlatformInfo::new(OsFamily::Linux, "x86_64") }

    fn native(platform: PlatformInfo) -> PackageDescriptor {
        PackageDescriptor::new(platform, "folder", Mode::Native, "version").unwrap()
    }

    #[test]
    fn test_linux_native_names() {
        let pkg = native(linux());
        assert_eq!(pkg.version(), "version");
        assert_eq!(pkg.package_name(), "debian.8-x64");
        assert_eq!(pkg.full_name(), "linterhub-cli-debian.8-x64");
        assert_eq!(pkg.archive_file_name(), "linterhub-cli-debian.8-x64.zip");
        assert_eq!(pkg.archive_local_path(), Path::new("folder").join("linterhub-cli-debian.8-x64.zip"));
        assert_eq!(
            pkg.download_url(),
            "https://github.com/Repometric/linterhub-cli/releases/download/version/linterhub-cli-debian.8-x64.zip"
        );
        assert_eq!(pkg.install_path(), Path::new("folder").join("bin").join("debian.8-x64"));
    }

    #[test]
    fn test_release_url_for_pinned_version() {
        let pkg = PackageDescriptor::new(linux(), "/opt/linterhub", Mode::Native, "v1.0").unwrap();
        assert_eq!(
            pkg.download_url(),
            "https://github.com/Repometric/linterhub-cli/releases/download/v1.0/linterhub-cli-debian.8-x64.zip"
        );
    }

    #[test]
    fn test_platform_tokens() {
        let token = |os| native(PlatformInfo::new(os, "x86_64")).package_name();
        assert_eq!(token(OsFamily::Macos), "osx.10.11-x64");
        assert_eq!(token(OsFamily::Windows), "win10-x64");
        assert_eq!(token(OsFamily::Linux), "debian.8-x64");
        assert_eq!(token(OsFamily::Unknown), "unknown");
    }

    #[test]
    fn test_managed_runtime_is_dotnet_on_every_os() {
        for os in [OsFamily::Macos, OsFamily::Windows, OsFamily::Linux, OsFamily::Unknown] {
            let pkg = PackageDescriptor::new(PlatformInfo::new(os, "arm64"), "f", Mode::ManagedRuntime, "1").unwrap();
            assert_eq!(pkg.package_name(), "dotnet");
            assert_eq!(pkg.archive_file_name(), "linterhub-cli-dotnet.zip");
        }
    }

    #[test]
    fn test_derivations_are_deterministic() {
        let a = native(linux());
        let b = native(linux());
        assert_eq!(a, b);
        assert_eq!(a.download_url(), b.download_url());
        assert_eq!(a.archive_local_path(), b.archive_local_path());
        assert_eq!(a.download_url(), a.download_url());
    }

    #[test]
    fn test_construction_rules() {
        assert!(matches!(
            PackageDescriptor::new(linux(), "f", Mode::Native, ""),
            Err(InstallError::EmptyVersion)
        ));
        assert!(matches!(
            PackageDescriptor::new(linux(), "", Mode::Native, "1"),
            Err(InstallError::EmptyFolder)
        ));
        assert!(matches!(
            PackageDescriptor::new(linux(), "f", Mode::Containerized, "1"),
            Err(InstallError::NoArchivePackage)
        ));
    }

    #[test]
    fn test_mode_serde_names() {
        let mode: Mode = serde_json::from_str("\"managedRuntime\"").unwrap();
        assert_eq!(mode, Mode::ManagedRuntime);
        let mode: Mode = serde_json::from_str("\"docker\"").unwrap();
        assert_eq!(mode, Mode::Containerized);
        assert_eq!(serde_json::to_string(&Mode::Native).unwrap(), "\"native\"");
        assert_eq!(Mode::ManagedRuntime.to_string(), "managedRuntime");
    }
}
