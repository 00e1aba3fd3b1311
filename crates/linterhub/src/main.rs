use anyhow::{Context, Result};
use clap::Parser;
use linterhub_integration::{Integration, Settings};
use tracing_subscriber::EnvFilter;

use crate::cli::app::App;

mod cli;
mod host;

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .ok();
}

#[tokio::main]
async fn main() -> Result<()> {
    let app = App::parse();
    init_tracing(app.verbose);

    let settings = match &app.config {
        Some(path) => Settings::load(path).with_context(|| format!("failed to load {}", path.display()))?,
        None => Settings::default(),
    };
    if !settings.enable {
        tracing::warn!("linterhub is disabled in the settings");
        return Ok(());
    }

    let project = match app.project {
        Some(project) => project,
        None => std::env::current_dir().context("failed to get current directory")?,
    };

    let integration = Integration::new(host::capabilities(&project), settings, &project);
    app.cmd.run(&integration).await
}
