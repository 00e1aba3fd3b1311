//! Platform information for the running host.

use std::fmt;

use sysinfo::System;
use tracing::debug;

use crate::arch;
use crate::os::{self, OsFamily};

/// OS family and architecture of a host. Created once per install and never
/// mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformInfo {
    os:           OsFamily,
    architecture: String,
}

impl PlatformInfo {
    pub fn new(os: OsFamily, architecture: impl Into<String>) -> Self {
        Self {
            os,
            architecture: architecture.into(),
        }
    }

    /// Platform with nothing known about it.
    pub fn unknown() -> Self { Self::new(OsFamily::Unknown, "unknown") }

    pub fn os(&self) -> OsFamily { self.os }

    pub fn architecture(&self) -> &str { &self.architecture }
}

impl fmt::Display for PlatformInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.os, self.architecture)
    }
}

fn introspect() -> PlatformInfo {
    let family = os::current();
    let architecture = arch::detect_raw();
    debug!(
        os = %family,
        %architecture,
        version = System::long_os_version().as_deref().unwrap_or("unknown"),
        "introspected host"
    );
    PlatformInfo::new(family, architecture)
}

/// Detect the running platform.
///
/// Never fails: if introspection cannot complete the result is
/// [`PlatformInfo::unknown`]. Callers should cache the value for the lifetime
/// of the process.
pub async fn detect() -> PlatformInfo {
    match tokio::task::spawn_blocking(introspect).await {
        Ok(info) => info,
        Err(e) => {
            debug!(error = %e, "platform introspection did not complete");
            PlatformInfo::unknown()
        }
    }
}
