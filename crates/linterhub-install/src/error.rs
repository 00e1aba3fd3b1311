use std::io;
use std::path::PathBuf;

use linterhub_archive::ExtractError;
use linterhub_fetch::DownloadError;
use linterhub_platform::ExecError;

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("package version must not be empty")]
    EmptyVersion,

    #[error("install folder must not be empty")]
    EmptyFolder,

    #[error("containerized mode has no archive package")]
    NoArchivePackage,

    #[error("failed to prepare {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("download failed: {0}")]
    Download(#[from] DownloadError),

    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("command failed: {0}")]
    Command(#[from] ExecError),
}

pub type Result<T> = std::result::Result<T, InstallError>;
