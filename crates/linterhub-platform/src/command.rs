//! Subprocess execution.
//!
//! Everything that shells out (runtime probes, image pulls, CLI invocations)
//! goes through [`CommandRunner`] so callers can be tested with a scripted
//! runner instead of real processes.

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::error::{ExecError, Result};

/// A fully described command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args:    Vec<String>,
    cwd:     Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args:    Vec::new(),
            cwd:     None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str { &self.program }

    pub fn arguments(&self) -> &[String] { &self.args }

    pub fn cwd(&self) -> Option<&Path> { self.cwd.as_deref() }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Runs a command to completion and returns its standard output.
///
/// Implementations must treat a non-zero exit or any output on stderr as a
/// failure.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, spec: &CommandSpec) -> Result<String>;
}

/// [`CommandRunner`] backed by real OS processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<String> {
        let cmd = spec.to_string();
        debug!(%cmd, cwd = ?spec.cwd(), "running command");

        let mut command = tokio::process::Command::new(spec.program());
        command.args(spec.arguments()).kill_on_drop(true);
        if let Some(cwd) = spec.cwd() {
            command.current_dir(cwd);
        }

        let output = command.output().await.map_err(|source| ExecError::Spawn {
            cmd: cmd.clone(),
            source,
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Err(ExecError::NonZeroExit {
                cmd,
                code: output.status.code(),
                stderr,
            });
        }
        if !stderr.trim().is_empty() {
            return Err(ExecError::Stderr { cmd, stderr });
        }

        String::from_utf8(output.stdout).map_err(|_| ExecError::Decode { cmd })
    }
}

/// Remove every carriage return and line feed from tool output.
pub fn strip_line_breaks(s: &str) -> String {
    s.chars().filter(|c| !matches!(c, '\r' | '\n')).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_builder() {
        let spec = CommandSpec::new("docker")
            .arg("run")
            .args(["--rm", "-v"])
            .current_dir("/project");
        assert_eq!(spec.program(), "docker");
        assert_eq!(spec.arguments(), ["run", "--rm", "-v"]);
        assert_eq!(spec.cwd(), Some(Path::new("/project")));
        assert_eq!(spec.to_string(), "docker run --rm -v");
    }

    #[test]
    fn test_strip_line_breaks() {
        assert_eq!(strip_line_breaks("2.1.4\r\n"), "2.1.4");
        assert_eq!(strip_line_breaks("a\nb\r\nc"), "abc");
        assert_eq!(strip_line_breaks(""), "");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_runner_captures_stdout() {
        let spec = CommandSpec::new("sh").args(["-c", "printf hello"]);
        let out = ProcessRunner.run(&spec).await.unwrap();
        assert_eq!(out, "hello");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_runner_stderr_is_failure() {
        let spec = CommandSpec::new("sh").args(["-c", "echo oops 1>&2"]);
        let err = ProcessRunner.run(&spec).await.unwrap_err();
        assert!(matches!(err, ExecError::Stderr { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_runner_nonzero_exit() {
        let spec = CommandSpec::new("sh").args(["-c", "exit 3"]);
        let err = ProcessRunner.run(&spec).await.unwrap_err();
        assert!(matches!(err, ExecError::NonZeroExit { code: Some(3), .. }));
    }

    #[tokio::test]
    async fn test_process_runner_missing_program() {
        let spec = CommandSpec::new("linterhub-definitely-missing-binary");
        let err = ProcessRunner.run(&spec).await.unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
        assert!(err.command().starts_with("linterhub-definitely-missing"));
    }
}
