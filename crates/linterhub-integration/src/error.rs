use std::io;
use std::path::PathBuf;

use linterhub_platform::ExecError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("no cli path configured for {0} mode")]
    MissingCliPath(linterhub_install::Mode),
}

/// Failure of a single operational call. Never escapes [`Integration`].
///
/// [`Integration`]: crate::Integration
#[derive(Debug, Error)]
pub enum CallError {
    #[error("linterhub cli is not ready: {0}")]
    NotReady(String),

    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error("unexpected cli output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("diagnostics rejected: {0}")]
    Diagnostics(String),
}
