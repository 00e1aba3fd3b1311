//! Operating system family classification.

use std::fmt;

/// Operating system families linterhub ships packages for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsFamily {
    Linux,
    Macos,
    Windows,
    Unknown,
}

impl OsFamily {
    /// Classify an OS identifier such as `std::env::consts::OS` or a
    /// `uname -s` style name. Anything unrecognised is `Unknown`.
    pub fn classify(name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        match name.as_str() {
            "linux" => Self::Linux,
            "macos" | "darwin" | "osx" => Self::Macos,
            "windows" | "win32" => Self::Windows,
            other if other.starts_with("linux") => Self::Linux,
            other if other.starts_with("mingw") || other.starts_with("cygwin") => Self::Windows,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Macos => "macos",
            Self::Windows => "windows",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Family of the running host.
pub fn current() -> OsFamily { OsFamily::classify(std::env::consts::OS) }
