use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use linterhub_install::{CliInstaller, InstallError, InstallRequest, InstalledCli, Mode};
use linterhub_integration::{
    CallError, Diagnostic, DiagnosticsSink, HostCapabilities, Integration, IntegrationState, Logger, RunTrigger,
    SYSTEM_ID, Settings, StatusReporter,
};
use linterhub_platform::{CommandRunner, CommandSpec, ExecError};
use tokio::sync::Notify;

#[derive(Default)]
struct Recorder {
    logs:   Mutex<Vec<(&'static str, String)>>,
    status: Mutex<Vec<(String, bool, Option<String>)>>,
}

impl Logger for Recorder {
    fn info(&self, message: &str) { self.logs.lock().unwrap().push(("info", message.to_string())) }

    fn warn(&self, message: &str) { self.logs.lock().unwrap().push(("warn", message.to_string())) }

    fn error(&self, message: &str) { self.logs.lock().unwrap().push(("error", message.to_string())) }
}

impl StatusReporter for Recorder {
    fn update(&self, id: &str, busy: bool, text: Option<&str>) {
        self.status
            .lock()
            .unwrap()
            .push((id.to_string(), busy, text.map(str::to_string)));
    }
}

impl Recorder {
    fn errors(&self) -> Vec<String> {
        self.logs
            .lock()
            .unwrap()
            .iter()
            .filter(|(level, _)| *level == "error")
            .map(|(_, m)| m.clone())
            .collect()
    }

    fn status_updates(&self) -> Vec<(String, bool, Option<String>)> { self.status.lock().unwrap().clone() }
}

struct JsonSink;

impl DiagnosticsSink for JsonSink {
    fn publish(&self, output: &str, _document: Option<&str>) -> Result<Vec<Diagnostic>, CallError> {
        serde_json::from_str(output).map_err(|e| CallError::Diagnostics(e.to_string()))
    }
}

type Reply = Box<dyn Fn(&CommandSpec) -> Result<String, String> + Send + Sync>;

/// Answers commands through `reply`; version probes against a program
/// starting with `gated` wait for `gate`.
struct FakeCli {
    reply: Reply,
    calls: Mutex<Vec<CommandSpec>>,
    gated: Option<String>,
    gate:  Notify,
}

impl FakeCli {
    fn new(reply: impl Fn(&CommandSpec) -> Result<String, String> + Send + Sync + 'static) -> Self {
        Self {
            reply: Box::new(reply),
            calls: Mutex::default(),
            gated: None,
            gate:  Notify::new(),
        }
    }

    fn gate_version_of(mut self, program_prefix: &str) -> Self {
        self.gated = Some(program_prefix.to_string());
        self
    }

    fn calls_to(&self, subcommand: &str) -> Vec<CommandSpec> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|spec| spec.arguments().first().map(String::as_str) == Some(subcommand))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl CommandRunner for FakeCli {
    async fn run(&self, spec: &CommandSpec) -> linterhub_platform::Result<String> {
        self.calls.lock().unwrap().push(spec.clone());
        let is_version = spec.arguments().first().map(String::as_str) == Some("version");
        if let Some(prefix) = &self.gated {
            if is_version && spec.program().starts_with(prefix.as_str()) {
                self.gate.notified().await;
            }
        }
        (self.reply)(spec).map_err(|stderr| ExecError::NonZeroExit {
            cmd: spec.to_string(),
            code: Some(1),
            stderr,
        })
    }
}

fn standard_reply(spec: &CommandSpec) -> Result<String, String> {
    match spec.arguments().first().map(String::as_str) {
        Some("version") => Ok("1.0.0\n".into()),
        Some("catalog") => Ok(r#"[{"name":"eslint","description":"JS","languages":"javascript","active":true}]"#.into()),
        Some("analyze") => Ok(r#"[{"message":"missing semicolon"}]"#.into()),
        Some("linterVersion") => Ok(r#"{"linterName":"eslint","installed":true,"version":"4.0"}"#.into()),
        Some("activate" | "deactivate") => Ok(String::new()),
        _ => Err("unknown command".into()),
    }
}

fn native_settings(cli_path: &str) -> Settings {
    Settings {
        cli_path: Some(cli_path.into()),
        ..Settings::default()
    }
}

fn integration(recorder: &Arc<Recorder>, runner: Arc<FakeCli>, settings: Settings) -> Integration {
    let caps = HostCapabilities {
        logger:      recorder.clone(),
        status:      recorder.clone(),
        diagnostics: Arc::new(JsonSink),
        paths:       Arc::new(|p: &str| format!("./{p}")),
    };
    Integration::new(caps, settings, "/work/project").with_runner(runner)
}

#[tokio::test]
async fn calls_wait_until_initialized() {
    let recorder = Arc::new(Recorder::default());
    let runner = Arc::new(FakeCli::new(standard_reply));
    let integration = Arc::new(integration(&recorder, runner.clone(), native_settings("/opt/lh")));
    assert_eq!(integration.state(), IntegrationState::Uninitialized);

    let pending = tokio::spawn({
        let integration = integration.clone();
        async move { integration.catalog().await }
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!pending.is_finished());
    assert!(runner.calls_to("catalog").is_empty());

    integration.initialize().unwrap();
    let catalog = pending.await.unwrap();

    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0].name, "eslint");
    assert_eq!(integration.state(), IntegrationState::Ready);
}

#[tokio::test]
async fn reinitialize_keeps_old_waiters_on_old_handle() {
    let recorder = Arc::new(Recorder::default());
    let runner = Arc::new(FakeCli::new(standard_reply).gate_version_of("/old"));
    let integration = Arc::new(integration(&recorder, runner.clone(), native_settings("/old")));

    integration.initialize().unwrap();
    let early = tokio::spawn({
        let integration = integration.clone();
        async move { integration.catalog().await }
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!early.is_finished());

    integration.update_settings(|s| s.cli_path = Some("/new".into()));
    integration.initialize().unwrap();
    let late = integration.catalog().await;
    assert_eq!(late.len(), 1);

    runner.gate.notify_one();
    let early = early.await.unwrap();
    assert_eq!(early.len(), 1);

    let programs: Vec<String> = runner
        .calls_to("catalog")
        .iter()
        .map(|spec| spec.program().to_string())
        .collect();
    assert_eq!(programs.len(), 2);
    assert!(programs[0].starts_with("/new"));
    assert!(programs[1].starts_with("/old"));
}

#[tokio::test]
async fn failed_catalog_returns_empty_and_clears_status() {
    let recorder = Arc::new(Recorder::default());
    let runner = Arc::new(FakeCli::new(|spec: &CommandSpec| match spec.arguments()[0].as_str() {
        "version" => Ok("1.0.0".into()),
        _ => Err("boom".into()),
    }));
    let integration = integration(&recorder, runner, native_settings("/opt/lh"));
    integration.initialize().unwrap();

    let catalog = integration.catalog().await;

    assert!(catalog.is_empty());
    let updates = recorder.status_updates();
    assert_eq!(updates.first(), Some(&(SYSTEM_ID.to_string(), true, None)));
    assert_eq!(updates.last(), Some(&(SYSTEM_ID.to_string(), false, None)));
    assert_eq!(recorder.errors().len(), 1);
    assert!(recorder.errors()[0].starts_with("Error catalog"));
}

#[tokio::test]
async fn operations_fall_back_to_their_defaults() {
    let recorder = Arc::new(Recorder::default());
    let runner = Arc::new(FakeCli::new(|spec: &CommandSpec| match spec.arguments()[0].as_str() {
        "version" => Ok("1.0.0".into()),
        "analyze" => Ok("not json".into()),
        _ => Err("boom".into()),
    }));
    let integration = integration(&recorder, runner, native_settings("/opt/lh"));
    integration.initialize().unwrap();

    assert_eq!(integration.activate("eslint").await, "eslint");
    assert_eq!(integration.deactivate("eslint").await, "eslint");
    assert_eq!(integration.linter_version("eslint", true).await, None);
    assert_eq!(integration.analyze().await, None);
    assert_eq!(integration.analyze_file("src/a.js", RunTrigger::OnSave, None).await, None);
    assert_eq!(recorder.errors().len(), 5);
}

#[tokio::test]
async fn successful_operations_parse_cli_output() {
    let recorder = Arc::new(Recorder::default());
    let runner = Arc::new(FakeCli::new(standard_reply));
    let integration = integration(&recorder, runner.clone(), native_settings("/opt/lh"));
    integration.initialize().unwrap();

    assert_eq!(integration.version().await.as_deref(), Some("1.0.0"));
    let version = integration.linter_version("eslint", true).await.unwrap();
    assert!(version.installed);
    assert_eq!(version.version, "4.0");
    assert_eq!(
        runner.calls_to("linterVersion")[0].arguments(),
        ["linterVersion", "eslint", "--install"]
    );

    let diagnostics = integration.analyze().await.unwrap();
    assert_eq!(diagnostics[0]["message"], "missing semicolon");
    assert!(recorder.errors().is_empty());
}

#[tokio::test]
async fn analyze_file_uses_path_as_status_id() {
    let recorder = Arc::new(Recorder::default());
    let runner = Arc::new(FakeCli::new(standard_reply));
    let integration = integration(&recorder, runner.clone(), native_settings("/opt/lh"));
    integration.initialize().unwrap();

    let diagnostics = integration
        .analyze_file("src/a.js", RunTrigger::OnOpen, Some("doc"))
        .await
        .unwrap();

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(runner.calls_to("analyze")[0].arguments(), ["analyze", "--path", "./src/a.js"]);
    assert_eq!(
        recorder.status_updates(),
        [("src/a.js".to_string(), true, None), ("src/a.js".to_string(), false, None)]
    );
}

#[tokio::test]
async fn disabled_trigger_skips_without_side_effects() {
    let recorder = Arc::new(Recorder::default());
    let runner = Arc::new(FakeCli::new(standard_reply));
    let settings = Settings {
        run: vec![RunTrigger::OnSave],
        ..native_settings("/opt/lh")
    };
    // Never initialized: a filtered call must not wait for readiness.
    let integration = integration(&recorder, runner.clone(), settings);

    let result = integration.analyze_file("src/a.js", RunTrigger::OnType, None).await;

    assert_eq!(result, None);
    assert!(runner.calls.lock().unwrap().is_empty());
    assert!(recorder.status_updates().is_empty());
}

#[tokio::test]
async fn initialize_requires_cli_path_outside_container_mode() {
    let recorder = Arc::new(Recorder::default());
    let runner = Arc::new(FakeCli::new(standard_reply));
    let integration = integration(&recorder, runner, Settings::default());

    assert!(integration.initialize().is_err());
    assert_eq!(integration.state(), IntegrationState::Uninitialized);
}

struct FakeInstaller {
    result:   Mutex<Option<Result<InstalledCli, InstallError>>>,
    requests: Mutex<Vec<InstallRequest>>,
}

impl FakeInstaller {
    fn returning(result: Result<InstalledCli, InstallError>) -> Arc<Self> {
        Arc::new(Self {
            result:   Mutex::new(Some(result)),
            requests: Mutex::default(),
        })
    }
}

#[async_trait]
impl CliInstaller for FakeInstaller {
    async fn install(&self, request: &InstallRequest) -> linterhub_install::Result<InstalledCli> {
        if let Some(report) = &request.fetch.on_progress {
            report(&linterhub_fetch::ProgressTracker::new(Some(2)).advance(2).unwrap());
        }
        self.requests.lock().unwrap().push(request.clone());
        self.result.lock().unwrap().take().unwrap_or(Err(InstallError::NoArchivePackage))
    }
}

#[tokio::test]
async fn install_probes_mode_and_arms_readiness() {
    let recorder = Arc::new(Recorder::default());
    let runner = Arc::new(FakeCli::new(|spec: &CommandSpec| match spec.program() {
        "dotnet" if spec.arguments() == ["--version"] => Ok("8.0.100\n".into()),
        "dotnet" => Ok("2.1.0".into()),
        _ => Err("unexpected".into()),
    }));
    let installer = FakeInstaller::returning(Ok(InstalledCli::Executable("/lh/bin/dotnet".into())));
    let integration = integration(&recorder, runner.clone(), Settings::default()).with_installer(installer.clone());

    let installed = integration.install().await;

    assert_eq!(installed, Some(InstalledCli::Executable("/lh/bin/dotnet".into())));
    assert_eq!(integration.state(), IntegrationState::Ready);
    assert_eq!(installer.requests.lock().unwrap()[0].mode, Mode::ManagedRuntime);
    let settings = integration.settings();
    assert_eq!(settings.mode, Mode::ManagedRuntime);
    assert_eq!(settings.cli_path, Some("/lh/bin/dotnet".into()));

    assert_eq!(integration.version().await.as_deref(), Some("2.1.0"));

    let updates = recorder.status_updates();
    assert!(updates.contains(&(SYSTEM_ID.to_string(), true, Some("Downloading.. (100%)".to_string()))));
    let logs: Vec<String> = recorder.logs.lock().unwrap().iter().map(|(_, m)| m.clone()).collect();
    assert!(logs.contains(&"Start download.".to_string()));
    assert!(logs.contains(&"Finish download.".to_string()));
}

#[tokio::test]
async fn failed_install_is_logged_not_returned() {
    let recorder = Arc::new(Recorder::default());
    let runner = Arc::new(FakeCli::new(|_: &CommandSpec| Err("dotnet: not found".to_string())));
    let installer = FakeInstaller::returning(Err(InstallError::EmptyVersion));
    let integration = integration(&recorder, runner, Settings::default()).with_installer(installer.clone());

    let installed = integration.install().await;

    assert_eq!(installed, None);
    assert_eq!(integration.state(), IntegrationState::InstallFailed);
    assert_eq!(installer.requests.lock().unwrap()[0].mode, Mode::Native);
    assert!(integration.current_round().is_none());
    assert_eq!(recorder.status_updates().last(), Some(&(SYSTEM_ID.to_string(), false, None)));
    assert_eq!(recorder.errors().len(), 1);
}

#[tokio::test]
async fn container_mode_survives_when_docker_answers() {
    let recorder = Arc::new(Recorder::default());
    let runner = Arc::new(FakeCli::new(|spec: &CommandSpec| match spec.program() {
        "docker" => Ok("24.0.5\n".into()),
        _ => Err("unexpected".into()),
    }));
    let installer = FakeInstaller::returning(Ok(InstalledCli::Image {
        name:   "repometric/linterhub-cli".into(),
        output: "pulled".into(),
    }));
    let settings = Settings {
        mode: Mode::Containerized,
        ..Settings::default()
    };
    let integration = integration(&recorder, runner, settings).with_installer(installer.clone());

    assert!(integration.install().await.is_some());
    assert_eq!(installer.requests.lock().unwrap()[0].mode, Mode::Containerized);
    assert_eq!(integration.settings().mode, Mode::Containerized);
}

#[tokio::test]
async fn waiting_call_gives_up_when_install_fails() {
    let recorder = Arc::new(Recorder::default());
    let runner = Arc::new(FakeCli::new(|_: &CommandSpec| Err("dotnet: not found".to_string())));
    let installer = FakeInstaller::returning(Err(InstallError::EmptyVersion));
    let integration = Arc::new(integration(&recorder, runner, Settings::default()).with_installer(installer));

    let pending = tokio::spawn({
        let integration = integration.clone();
        async move { integration.catalog().await }
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!pending.is_finished());

    assert_eq!(integration.install().await, None);
    let catalog = tokio::time::timeout(Duration::from_secs(2), pending)
        .await
        .expect("catalog stays suspended after a failed install")
        .unwrap();

    assert!(catalog.is_empty());
    assert_eq!(integration.state(), IntegrationState::InstallFailed);
    assert!(recorder.errors().iter().any(|e| e.starts_with("Error catalog")));
    // A later call fails fast instead of waiting.
    assert!(integration.catalog().await.is_empty());
}
