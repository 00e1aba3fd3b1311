//! Host settings.
//!
//! Settings live under a `[linterhub]` table so they can share a file with
//! other host configuration:
//!
//! ```toml
//! [linterhub]
//! enable = true
//! run = ["force", "onOpen", "onSave"]
//! mode = "native"
//! version = "0.3.3"
//! strictSsl = true
//! ```

use std::path::{Path, PathBuf};

use linterhub_install::{DEFAULT_IMAGE, Mode};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// CLI release installed when none is configured.
pub const DEFAULT_CLI_VERSION: &str = "0.3.3";

/// Why an analysis was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunTrigger {
    None,
    Force,
    OnStart,
    OnOpen,
    OnType,
    OnSave,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub enable:                bool,
    /// Triggers for which `analyze_file` runs.
    pub run:                   Vec<RunTrigger>,
    pub mode:                  Mode,
    /// Directory of an installed CLI. Set by a successful install.
    pub cli_path:              Option<PathBuf>,
    pub version:               String,
    pub install_folder:        Option<PathBuf>,
    pub proxy:                 Option<String>,
    pub strict_ssl:            bool,
    pub image:                 String,
    pub download_timeout_secs: Option<u64>,
    pub max_redirects:         usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable:                true,
            run:                   vec![RunTrigger::Force, RunTrigger::OnStart, RunTrigger::OnOpen, RunTrigger::OnSave],
            mode:                  Mode::Native,
            cli_path:              None,
            version:               DEFAULT_CLI_VERSION.to_string(),
            install_folder:        None,
            proxy:                 None,
            strict_ssl:            true,
            image:                 DEFAULT_IMAGE.to_string(),
            download_timeout_secs: None,
            max_redirects:         linterhub_fetch::DEFAULT_MAX_REDIRECTS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    linterhub: Settings,
}

impl Settings {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let file: SettingsFile = toml::from_str(raw)?;
        Ok(file.linterhub)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn runs_on(&self, trigger: RunTrigger) -> bool { self.run.contains(&trigger) }

    /// Configured install folder, or the per-user default.
    pub fn install_folder(&self) -> PathBuf {
        self.install_folder
            .clone()
            .unwrap_or_else(linterhub_platform::dir::default_install_folder)
    }
}
