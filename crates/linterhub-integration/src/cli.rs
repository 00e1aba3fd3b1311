//! Handle on an installed CLI.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use linterhub_install::Mode;
use linterhub_platform::{CommandRunner, CommandSpec, Result, strip_line_breaks};
use tracing::debug;

/// How the CLI process is launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// `<cli_path>/cli[.exe]`
    Native { cli_path: PathBuf },
    /// `dotnet <cli_path>/cli.dll`
    ManagedRuntime { cli_path: PathBuf },
    /// `docker run --rm -v <project>:/data <image>`
    Containerized { image: String },
}

impl Invocation {
    pub fn mode(&self) -> Mode {
        match self {
            Self::Native { .. } => Mode::Native,
            Self::ManagedRuntime { .. } => Mode::ManagedRuntime,
            Self::Containerized { .. } => Mode::Containerized,
        }
    }

    fn command(&self, project: &Path) -> CommandSpec {
        match self {
            Self::Native { cli_path } => {
                let exe = if cfg!(windows) { "cli.exe" } else { "cli" };
                CommandSpec::new(cli_path.join(exe).to_string_lossy())
            }
            Self::ManagedRuntime { cli_path } => {
                CommandSpec::new("dotnet").arg(cli_path.join("cli.dll").to_string_lossy())
            }
            Self::Containerized { image } => CommandSpec::new("docker").args([
                "run".to_string(),
                "--rm".to_string(),
                "-v".to_string(),
                format!("{}:/data", project.display()),
                image.clone(),
            ]),
        }
    }
}

/// One CLI handle, bound to a project directory. Owned by the orchestrator
/// and replaced wholesale on re-initialisation.
#[derive(Clone)]
pub struct LinterhubCli {
    invocation: Invocation,
    project:    PathBuf,
    runner:     Arc<dyn CommandRunner>,
}

impl std::fmt::Debug for LinterhubCli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinterhubCli")
            .field("invocation", &self.invocation)
            .field("project", &self.project)
            .finish_non_exhaustive()
    }
}

impl LinterhubCli {
    pub fn new(invocation: Invocation, project: impl Into<PathBuf>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            invocation,
            project: project.into(),
            runner,
        }
    }

    pub fn invocation(&self) -> &Invocation { &self.invocation }

    pub fn project(&self) -> &Path { &self.project }

    /// The command line for `args`, run from the project directory.
    pub fn command<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.invocation
            .command(&self.project)
            .args(args)
            .current_dir(&self.project)
    }

    async fn execute(&self, args: Vec<String>) -> Result<String> {
        let spec = self.command(args);
        debug!(command = %spec, "invoking linterhub cli");
        self.runner.run(&spec).await
    }

    pub async fn version(&self) -> Result<String> {
        let out = self.execute(vec!["version".into()]).await?;
        Ok(strip_line_breaks(&out))
    }

    pub async fn analyze(&self) -> Result<String> { self.execute(vec!["analyze".into()]).await }

    pub async fn analyze_file(&self, path: &str) -> Result<String> {
        self.execute(vec!["analyze".into(), "--path".into(), path.into()]).await
    }

    pub async fn catalog(&self) -> Result<String> { self.execute(vec!["catalog".into()]).await }

    pub async fn activate(&self, name: &str) -> Result<String> {
        self.execute(vec!["activate".into(), name.into()]).await
    }

    pub async fn deactivate(&self, name: &str) -> Result<String> {
        self.execute(vec!["deactivate".into(), name.into()]).await
    }

    pub async fn linter_version(&self, name: &str, install: bool) -> Result<String> {
        let mut args = vec!["linterVersion".to_string(), name.to_string()];
        if install {
            args.push("--install".into());
        }
        self.execute(args).await
    }
}
