use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;

/// Which file entries receive the executable mode.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExecutablePolicy {
    /// Every file entry is executable. Matches how the CLI packages have
    /// always been unpacked.
    #[default]
    AllFiles,
    /// Only the listed archive-relative paths are executable.
    Listed(HashSet<PathBuf>),
    /// No file is executable.
    NoFiles,
}

impl ExecutablePolicy {
    pub fn listed<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::Listed(paths.into_iter().map(Into::into).collect())
    }

    pub fn is_executable(&self, relative: &Path) -> bool {
        match self {
            Self::AllFiles => true,
            Self::Listed(paths) => paths.contains(relative),
            Self::NoFiles => false,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ExtractOptions {
    pub executables: ExecutablePolicy,
    /// Checked before each entry.
    pub cancel:      Option<CancellationToken>,
}

impl ExtractOptions {
    pub fn executables(mut self, policy: ExecutablePolicy) -> Self {
        self.executables = policy;
        self
    }

    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }
}
