//! The orchestrator.
//!
//! Every operational call follows the same path: capture the current
//! [`ReadyRound`], wait for it to settle, mark its status id busy, invoke the
//! CLI, and map any failure to a logged default. The busy mark is cleared by
//! a guard, so it is dropped on every exit path.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use linterhub_fetch::{FetchOptions, Progress, ProxyEnv, ReqwestClient};
use linterhub_install::{CliInstaller, InstallRequest, InstalledCli, Installer, Mode, Probes};
use linterhub_platform::{CommandRunner, ProcessRunner};
use tokio::sync::watch;
use tracing::debug;

use crate::capabilities::{Diagnostic, HostCapabilities, StatusReporter};
use crate::cli::{Invocation, LinterhubCli};
use crate::error::{CallError, IntegrationError};
use crate::ready::ReadyRound;
use crate::settings::{RunTrigger, Settings};
use crate::types::{LinterResult, LinterVersionResult};

/// `User-Agent` sent with release downloads.
pub const USER_AGENT: &str = concat!("linterhub/", env!("CARGO_PKG_VERSION"));

/// Status id for calls that are not about a single file.
pub const SYSTEM_ID: &str = "_system";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationState {
    Uninitialized,
    Installing,
    Ready,
    /// The last install failed. Only another install recovers.
    InstallFailed,
}

fn release_client() -> ReqwestClient { ReqwestClient::new().with_user_agent(USER_AGENT) }

/// Marks `id` busy until dropped.
struct Busy<'a> {
    status: &'a dyn StatusReporter,
    id:     &'a str,
}

impl<'a> Busy<'a> {
    fn mark(status: &'a dyn StatusReporter, id: &'a str) -> Self {
        status.update(id, true, None);
        Self { status, id }
    }
}

impl Drop for Busy<'_> {
    fn drop(&mut self) { self.status.update(self.id, false, None); }
}

pub struct Integration {
    caps:      HostCapabilities,
    settings:  RwLock<Settings>,
    project:   PathBuf,
    installer: Arc<dyn CliInstaller>,
    probes:    Probes,
    runner:    Arc<dyn CommandRunner>,
    rounds:    watch::Sender<Option<Arc<ReadyRound>>>,
    state:     watch::Sender<IntegrationState>,
}

impl Integration {
    pub fn new(caps: HostCapabilities, settings: Settings, project: impl Into<PathBuf>) -> Self {
        let probes = Probes::default();
        Self {
            caps,
            settings: RwLock::new(settings),
            project: project.into(),
            installer: Arc::new(Installer::new(release_client(), probes.clone())),
            probes,
            runner: Arc::new(ProcessRunner),
            rounds: watch::channel(None).0,
            state: watch::channel(IntegrationState::Uninitialized).0,
        }
    }

    pub fn with_installer(mut self, installer: Arc<dyn CliInstaller>) -> Self {
        self.installer = installer;
        self
    }

    /// Runs CLI invocations and runtime probes through `runner`.
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.probes = Probes::new(runner.clone());
        self.runner = runner;
        self
    }

    pub fn project(&self) -> &Path { &self.project }

    pub fn state(&self) -> IntegrationState { *self.state.borrow() }

    pub fn settings(&self) -> Settings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn update_settings(&self, update: impl FnOnce(&mut Settings)) {
        let mut settings = self.settings.write().unwrap_or_else(PoisonError::into_inner);
        update(&mut settings);
    }

    /// The round new calls attach to, if one has been armed.
    pub fn current_round(&self) -> Option<Arc<ReadyRound>> { self.rounds.borrow().clone() }

    /// Builds a CLI handle from the settings and arms a new readiness round
    /// with a version probe against it. Requires a tokio runtime.
    ///
    /// Calls already waiting on the previous round keep its handle.
    pub fn initialize(&self) -> Result<Arc<ReadyRound>, IntegrationError> {
        let settings = self.settings();
        let invocation = match settings.mode {
            Mode::Containerized => Invocation::Containerized { image: settings.image },
            mode => {
                let cli_path = settings.cli_path.ok_or(IntegrationError::MissingCliPath(mode))?;
                if mode == Mode::ManagedRuntime {
                    Invocation::ManagedRuntime { cli_path }
                } else {
                    Invocation::Native { cli_path }
                }
            }
        };
        debug!(?invocation, "arming readiness round");

        let (round, signal) = ReadyRound::arm(LinterhubCli::new(invocation, &self.project, self.runner.clone()));
        let cli = round.cli().clone();
        let logger = self.caps.logger.clone();
        tokio::spawn(async move {
            match cli.version().await {
                Ok(version) => {
                    logger.info(&format!("Linterhub CLI version {version}."));
                    signal.settle(Ok(version));
                }
                Err(e) => {
                    logger.error(&format!("Error version '{e}'."));
                    signal.settle(Err(e.to_string()));
                }
            }
        });

        self.rounds.send_replace(Some(round.clone()));
        self.state.send_replace(IntegrationState::Ready);
        Ok(round)
    }

    /// Installs the CLI and re-arms readiness against it.
    ///
    /// Failures are logged and leave the orchestrator in
    /// [`IntegrationState::InstallFailed`]; they are not returned.
    pub async fn install(&self) -> Option<InstalledCli> {
        let _busy = Busy::mark(self.caps.status.as_ref(), SYSTEM_ID);
        self.state.send_replace(IntegrationState::Installing);

        let mode = self.probe_mode().await;
        self.caps.logger.info("Start download.");
        self.caps.logger.info(&mode.to_string());

        let request = self.install_request(mode);
        let installed = match self.installer.install(&request).await {
            Ok(installed) => installed,
            Err(e) => {
                self.caps.logger.error(&format!("Error install '{e}'."));
                self.state.send_replace(IntegrationState::InstallFailed);
                return None;
            }
        };
        self.caps.logger.info("Finish download.");

        self.update_settings(|settings| match &installed {
            InstalledCli::Executable(path) => {
                settings.mode = mode;
                settings.cli_path = Some(path.clone());
            }
            InstalledCli::Image { name, .. } => {
                settings.mode = Mode::Containerized;
                settings.image = name.clone();
            }
        });
        if let Err(e) = self.initialize() {
            self.caps.logger.error(&e.to_string());
            self.state.send_replace(IntegrationState::InstallFailed);
            return None;
        }
        Some(installed)
    }

    /// Container mode is kept only while docker answers; otherwise a working
    /// dotnet selects the managed runtime package.
    async fn probe_mode(&self) -> Mode {
        if self.settings().mode == Mode::Containerized {
            match self.probes.docker_version().await {
                Ok(version) => {
                    debug!(%version, "docker available");
                    return Mode::Containerized;
                }
                Err(e) => debug!(error = %e, "docker unavailable"),
            }
        }
        match self.probes.dotnet_version().await {
            Ok(_) => Mode::ManagedRuntime,
            Err(e) => {
                debug!(error = %e, "dotnet unavailable");
                Mode::Native
            }
        }
    }

    fn install_request(&self, mode: Mode) -> InstallRequest {
        let settings = self.settings();
        let status = self.caps.status.clone();
        let mut request = InstallRequest::new(mode, settings.install_folder(), settings.version);
        request.proxy = settings.proxy;
        request.strict_ssl = settings.strict_ssl;
        request.proxy_env = ProxyEnv::from_process();
        request.image = settings.image;
        request.fetch = FetchOptions::default()
            .max_redirects(settings.max_redirects)
            .timeout(settings.download_timeout_secs.map(Duration::from_secs))
            .on_progress(Arc::new(move |progress: &Progress| {
                status.update(SYSTEM_ID, true, Some(&progress.label()));
            }));
        request
    }

    /// Waits for a round to be armed. Gives up when an install fails
    /// before any round exists.
    async fn attach(&self) -> Result<Arc<ReadyRound>, CallError> {
        let mut rounds = self.rounds.subscribe();
        let mut state = self.state.subscribe();
        loop {
            if let Some(round) = rounds.borrow_and_update().clone() {
                return Ok(round);
            }
            if *state.borrow_and_update() == IntegrationState::InstallFailed {
                return Err(CallError::NotReady("linterhub cli install failed".into()));
            }
            // Both senders live as long as `self`.
            tokio::select! {
                _ = rounds.changed() => {}
                _ = state.changed() => {}
            }
        }
    }

    async fn call<T, F, Fut>(&self, id: &str, op: F) -> Result<T, CallError>
    where
        F: FnOnce(Arc<LinterhubCli>) -> Fut,
        Fut: Future<Output = Result<T, CallError>>,
    {
        let round = self.attach().await?;
        let cli = round.ready().await?;

        let _busy = Busy::mark(self.caps.status.as_ref(), id);
        op(cli).await
    }

    fn or_default<T>(&self, what: &str, outcome: Result<T, CallError>, default: impl FnOnce() -> T) -> T {
        outcome.unwrap_or_else(|e| {
            self.caps.logger.error(&format!("Error {what} '{e}'."));
            default()
        })
    }

    /// Analyses the whole project. `None` when the CLI or the sink failed.
    pub async fn analyze(&self) -> Option<Vec<Diagnostic>> {
        let id = self.project.display().to_string();
        let outcome = self
            .call(&id, |cli| async move {
                self.caps.logger.info("Analyze project.");
                let output = cli.analyze().await?;
                self.caps.diagnostics.publish(&output, None)
            })
            .await;
        let diagnostics = self.or_default("analyze project", outcome.map(Some), || None);
        self.caps.logger.info("Finish analyze project.");
        diagnostics
    }

    /// Analyses one file. Returns `None` without touching the CLI or the
    /// status when `trigger` is not enabled in the settings.
    pub async fn analyze_file(&self, path: &str, trigger: RunTrigger, document: Option<&str>) -> Option<Vec<Diagnostic>> {
        if !self.settings().runs_on(trigger) {
            debug!(path, ?trigger, "trigger disabled, skipping analysis");
            return None;
        }

        let normalized = self.caps.paths.normalize(path);
        let outcome = self
            .call(path, |cli| async move {
                self.caps.logger.info(&format!("Analyze file '{path}'."));
                let output = cli.analyze_file(&normalized).await?;
                self.caps.diagnostics.publish(&output, document)
            })
            .await;
        let diagnostics = self.or_default("analyze file", outcome.map(Some), || None);
        self.caps.logger.info(&format!("Finish analyze file '{path}'."));
        diagnostics
    }

    /// Linter catalog. Empty when the CLI call or its output fails.
    pub async fn catalog(&self) -> Vec<LinterResult> {
        let outcome = self
            .call(SYSTEM_ID, |cli| async move {
                let output = cli.catalog().await?;
                self.caps.logger.info(&output);
                Ok(serde_json::from_str(&output)?)
            })
            .await;
        self.or_default("catalog", outcome, Vec::new)
    }

    /// Returns `name` whether or not activation succeeded.
    pub async fn activate(&self, name: &str) -> String {
        let outcome = self
            .call(SYSTEM_ID, |cli| async move { Ok(cli.activate(name).await?) })
            .await;
        if let Err(e) = outcome {
            self.caps.logger.error(&format!("Error activate '{e}'."));
        }
        name.to_string()
    }

    /// Returns `name` whether or not deactivation succeeded.
    pub async fn deactivate(&self, name: &str) -> String {
        let outcome = self
            .call(SYSTEM_ID, |cli| async move { Ok(cli.deactivate(name).await?) })
            .await;
        if let Err(e) = outcome {
            self.caps.logger.error(&format!("Error deactivate '{e}'."));
        }
        name.to_string()
    }

    pub async fn linter_version(&self, name: &str, install: bool) -> Option<LinterVersionResult> {
        let outcome = self
            .call(SYSTEM_ID, |cli| async move {
                let output = cli.linter_version(name, install).await?;
                self.caps.logger.info(&output);
                Ok(serde_json::from_str(&output)?)
            })
            .await;
        self.or_default("while requesting linter version", outcome.map(Some), || None)
    }

    pub async fn version(&self) -> Option<String> {
        let outcome = self
            .call(SYSTEM_ID, |cli| async move { Ok(cli.version().await?) })
            .await;
        self.or_default("version", outcome.map(Some), || None)
    }
}
