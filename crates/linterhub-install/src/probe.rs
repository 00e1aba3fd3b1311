//! Runtime probes and the container pull.

use std::sync::Arc;

use linterhub_platform::{CommandRunner, CommandSpec, ProcessRunner, strip_line_breaks};
use tracing::debug;

use crate::error::Result;

/// Shell-outs used to choose and prepare an install mode.
#[derive(Clone)]
pub struct Probes {
    runner: Arc<dyn CommandRunner>,
}

impl Default for Probes {
    fn default() -> Self { Self::new(Arc::new(ProcessRunner)) }
}

impl Probes {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self { Self { runner } }

    pub fn runner(&self) -> &Arc<dyn CommandRunner> { &self.runner }

    /// `dotnet --version`, line breaks removed.
    pub async fn dotnet_version(&self) -> Result<String> {
        let out = self.runner.run(&CommandSpec::new("dotnet").arg("--version")).await?;
        let version = strip_line_breaks(&out);
        debug!(%version, "dotnet found");
        Ok(version)
    }

    /// Docker server version, line breaks removed.
    pub async fn docker_version(&self) -> Result<String> {
        let spec = CommandSpec::new("docker").args(["version", "--format", "{{.Server.Version}}"]);
        let out = self.runner.run(&spec).await?;
        let version = strip_line_breaks(&out);
        debug!(%version, "docker found");
        Ok(version)
    }

    /// `docker pull <image>`, returning its stdout.
    pub async fn pull_image(&self, image: &str) -> Result<String> {
        Ok(self.runner.run(&CommandSpec::new("docker").args(["pull", image])).await?)
    }
}
