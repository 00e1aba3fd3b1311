use anyhow::{Context, Result, bail};
use linterhub_integration::{InstalledCli, Integration, IntegrationError};
use tracing::info;

use crate::cli::app::Commands;

impl Commands {
    pub async fn run(self, integration: &Integration) -> Result<()> {
        if !matches!(self, Commands::Install) {
            ensure_ready(integration).await?;
        }

        match self {
            Commands::Install => install(integration).await?,
            Commands::Version => {
                let version = integration.version().await.context("could not read the cli version")?;
                println!("{version}");
            }
            Commands::Catalog => {
                for linter in integration.catalog().await {
                    let mark = if linter.active { "✓" } else { "✗" };
                    println!("{mark} {:<20} {:<16} {}", linter.name, linter.languages, linter.description);
                }
            }
            Commands::Analyze(arg) => {
                let diagnostics = match arg.file {
                    Some(file) => integration.analyze_file(&file, arg.trigger, Some(file.as_str())).await,
                    None => integration.analyze().await,
                };
                let diagnostics = diagnostics.context("analysis produced no diagnostics")?;
                info!(count = diagnostics.len(), "analysis finished");
            }
            Commands::Activate(arg) => println!("{}", integration.activate(&arg.name).await),
            Commands::Deactivate(arg) => println!("{}", integration.deactivate(&arg.name).await),
            Commands::LinterVersion(arg) => {
                let version = integration
                    .linter_version(&arg.name, arg.install)
                    .await
                    .with_context(|| format!("could not read the version of {}", arg.name))?;
                println!("{}", serde_json::to_string_pretty(&version)?);
            }
        }
        Ok(())
    }
}

async fn install(integration: &Integration) -> Result<()> {
    match integration.install().await.context("linterhub cli install failed")? {
        InstalledCli::Executable(path) => println!("{}", path.display()),
        InstalledCli::Image { name, output } => println!("{name}\n{output}"),
    }
    Ok(())
}

/// Arms readiness from the settings, installing first when no CLI is
/// configured.
async fn ensure_ready(integration: &Integration) -> Result<()> {
    match integration.initialize() {
        Ok(_) => Ok(()),
        Err(IntegrationError::MissingCliPath(mode)) => {
            info!(%mode, "no cli configured, installing");
            if integration.install().await.is_none() {
                bail!("linterhub cli is not installed and the install failed");
            }
            Ok(())
        }
    }
}
