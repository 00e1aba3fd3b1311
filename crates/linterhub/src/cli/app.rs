use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use linterhub_integration::RunTrigger;

#[derive(Clone, Debug, Parser)]
#[command(name = "linterhub", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    /// TOML file with a `[linterhub]` table.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Project directory the CLI runs against. Defaults to the current directory.
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "i", name = "install", about = "Download and unpack the linterhub CLI")]
    Install,
    #[command(alias = "v", name = "version")]
    Version,
    #[command(alias = "ls", name = "catalog")]
    Catalog,
    #[command(alias = "a", name = "analyze")]
    Analyze(AnalyzeArg),
    #[command(name = "activate")]
    Activate(LinterArg),
    #[command(name = "deactivate")]
    Deactivate(LinterArg),
    #[command(name = "linter-version")]
    LinterVersion(LinterVersionArg),
}

#[derive(Clone, Debug, Args)]
pub struct AnalyzeArg {
    /// Analyse a single file instead of the whole project.
    #[arg(long)]
    pub file: Option<String>,

    #[arg(long, default_value = "force", value_parser = parse_trigger)]
    pub trigger: RunTrigger,
}

#[derive(Clone, Debug, Args)]
pub struct LinterArg {
    pub name: String,
}

#[derive(Clone, Debug, Args)]
pub struct LinterVersionArg {
    pub name: String,

    /// Install the linter when it is missing.
    #[arg(long)]
    pub install: bool,
}

/// Accepts the same names as the settings file (`onSave`, `force`, ...).
fn parse_trigger(raw: &str) -> Result<RunTrigger, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_string())).map_err(|_| format!("unknown trigger '{raw}'"))
}
