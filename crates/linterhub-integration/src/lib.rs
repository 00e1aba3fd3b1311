//! Drives the linterhub CLI on behalf of an editor host.
//!
//! The host supplies its logger, status indicator, diagnostics sink and path
//! normaliser as [`HostCapabilities`]. [`Integration`] installs the CLI,
//! gates every operation on a readiness round, and converts CLI failures
//! into logged defaults so a failed lint pass never reaches the host.

pub use capabilities::{
    Diagnostic, DiagnosticsSink, HostCapabilities, Logger, PathNormalizer, StatusReporter,
    TracingLogger,
};
pub use cli::{Invocation, LinterhubCli};
pub use error::{CallError, ConfigError, IntegrationError};
pub use integration::{Integration, IntegrationState, SYSTEM_ID};
pub use linterhub_install::{InstalledCli, Mode};
pub use ready::{ReadyRound, RoundSignal, RoundState};
pub use settings::{RunTrigger, Settings};
pub use types::{LinterResult, LinterVersionResult};

pub mod capabilities;
pub mod cli;
mod error;
pub mod integration;
pub mod ready;
pub mod settings;
pub mod types;
