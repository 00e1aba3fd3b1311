use std::path::PathBuf;

use async_trait::async_trait;
use linterhub_archive::{ExecutablePolicy, ExtractOptions, extract_async};
use linterhub_fetch::{FetchOptions, Fetcher, HttpClient, ProxyEnv, ProxySettings};
use linterhub_platform::PlatformInfo;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::{InstallError, Result};
use crate::package::{DEFAULT_IMAGE, Mode, PackageDescriptor};
use crate::probe::Probes;

/// Parameters of one install run.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    pub mode:        Mode,
    pub folder:      PathBuf,
    pub version:     String,
    pub proxy:       Option<String>,
    pub strict_ssl:  bool,
    pub proxy_env:   ProxyEnv,
    /// Image pulled in containerized mode.
    pub image:       String,
    pub fetch:       FetchOptions,
    pub executables: ExecutablePolicy,
    pub cancel:      Option<CancellationToken>,
}

impl InstallRequest {
    pub fn new(mode: Mode, folder: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self {
            mode,
            folder: folder.into(),
            version: version.into(),
            proxy: None,
            strict_ssl: true,
            proxy_env: ProxyEnv::default(),
            image: DEFAULT_IMAGE.to_string(),
            fetch: FetchOptions::default(),
            executables: ExecutablePolicy::default(),
            cancel: None,
        }
    }

    fn proxy_settings(&self) -> ProxySettings {
        ProxySettings::new(self.proxy.clone(), self.strict_ssl, self.proxy_env.clone())
    }
}

/// What an install produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstalledCli {
    /// Directory holding the unpacked CLI.
    Executable(PathBuf),
    /// A pulled container image and the pull output.
    Image { name: String, output: String },
}

/// Installs the CLI for a request.
#[async_trait]
pub trait CliInstaller: Send + Sync {
    async fn install(&self, request: &InstallRequest) -> Result<InstalledCli>;
}

/// The download-and-unpack pipeline.
pub struct Installer<C> {
    client:   C,
    probes:   Probes,
    platform: Option<PlatformInfo>,
}

impl<C: HttpClient + Clone + 'static> Installer<C> {
    pub fn new(client: C, probes: Probes) -> Self {
        Self {
            client,
            probes,
            platform: None,
        }
    }

    /// Skip platform detection and use `platform`.
    pub fn with_platform(mut self, platform: PlatformInfo) -> Self {
        self.platform = Some(platform);
        self
    }

    async fn platform(&self) -> PlatformInfo {
        match &self.platform {
            Some(platform) => platform.clone(),
            None => linterhub_platform::detect().await,
        }
    }

    async fn install_archive(&self, request: &InstallRequest) -> Result<PathBuf> {
        let platform = self.platform().await;
        info!(%platform, "platform");

        let package = PackageDescriptor::new(platform, &request.folder, request.mode, &request.version)?;
        info!(name = %package.full_name(), "package");

        tokio::fs::create_dir_all(package.folder())
            .await
            .map_err(|source| InstallError::Io {
                path: package.folder().to_path_buf(),
                source,
            })?;

        let archive = package.archive_local_path();
        let fetcher = Fetcher::new(self.client.clone()).with_options(request.fetch.clone());
        fetcher
            .download(&package.download_url(), &archive, &request.proxy_settings())
            .await?;
        info!(path = %archive.display(), "file downloaded");

        let mut options = ExtractOptions::default().executables(request.executables.clone());
        if let Some(token) = &request.cancel {
            options = options.cancel_on(token.clone());
        }
        let report = extract_async(archive.clone(), package.folder().to_path_buf(), options).await?;
        info!(files = report.file_count(), "package extracted");

        if let Err(e) = tokio::fs::remove_file(&archive).await {
            warn!(path = %archive.display(), error = %e, "could not remove downloaded archive");
        }

        let install_path = package.install_path();
        Ok(std::path::absolute(&install_path).unwrap_or(install_path))
    }
}

#[async_trait]
impl<C: HttpClient + Clone + 'static> CliInstaller for Installer<C> {
    async fn install(&self, request: &InstallRequest) -> Result<InstalledCli> {
        info!(mode = %request.mode, version = %request.version, "installing linterhub cli");
        match request.mode {
            Mode::Containerized => {
                let output = self.probes.pull_image(&request.image).await?;
                Ok(InstalledCli::Image {
                    name: request.image.clone(),
                    output,
                })
            }
            Mode::Native | Mode::ManagedRuntime => {
                self.install_archive(request).await.map(InstalledCli::Executable)
            }
        }
    }
}
