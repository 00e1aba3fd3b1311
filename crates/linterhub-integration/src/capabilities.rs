//! What the host provides to the orchestrator.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::CallError;

/// A diagnostic as produced by the host's sink. Its shape belongs to the
/// host, so it is kept as JSON.
pub type Diagnostic = serde_json::Value;

pub trait Logger: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Busy/idle indicator keyed by operation id.
pub trait StatusReporter: Send + Sync {
    /// `text` is a progress label such as `Downloading.. (50%)`.
    fn update(&self, id: &str, busy: bool, text: Option<&str>);
}

/// Turns raw analysis output into host diagnostics and publishes them.
pub trait DiagnosticsSink: Send + Sync {
    fn publish(&self, output: &str, document: Option<&str>) -> Result<Vec<Diagnostic>, CallError>;
}

/// Maps a host path into the form the CLI expects for `analyze --path`.
pub trait PathNormalizer: Send + Sync {
    fn normalize(&self, path: &str) -> String;
}

impl<F> PathNormalizer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn normalize(&self, path: &str) -> String { self(path) }
}

#[derive(Clone)]
pub struct HostCapabilities {
    pub logger:      Arc<dyn Logger>,
    pub status:      Arc<dyn StatusReporter>,
    pub diagnostics: Arc<dyn DiagnosticsSink>,
    pub paths:       Arc<dyn PathNormalizer>,
}

/// [`Logger`] that forwards to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str) { info!(target: "linterhub", "{message}") }

    fn warn(&self, message: &str) { warn!(target: "linterhub", "{message}") }

    fn error(&self, message: &str) { error!(target: "linterhub", "{message}") }
}
