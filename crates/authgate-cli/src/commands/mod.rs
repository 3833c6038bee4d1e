//! CLI command definitions and dispatch.

pub mod config;
pub mod parse;
pub mod replay;
pub mod send;

use clap::{Parser, Subcommand};

use authgate_core::config::AppConfig;
use authgate_core::error::AppError;

use crate::output::OutputFormat;

/// AuthGate: concurrent session-authentication engine tools
#[derive(Debug, Parser)]
#[command(name = "authgate", version, about, long_about = None)]
pub struct Cli {
    /// Path to a configuration file (defaults to the layered `config/` files)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse an offline stream file and show what it contains
    Parse(parse::ParseArgs),
    /// Post every stream in a file to a running server
    Send(send::SendArgs),
    /// Run a stream file through an in-process engine
    Replay(replay::ReplayArgs),
    /// Configuration inspection
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Parse(args) => parse::execute(args, self.format),
            Commands::Send(args) => send::execute(args, self.format).await,
            Commands::Replay(args) => {
                replay::execute(args, self.config.as_deref(), self.format).await
            }
            Commands::Config(args) => config::execute(args, self.config.as_deref(), self.format),
        }
    }
}

/// Helper: load configuration from an explicit file or the layered defaults
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, AppError> {
    match config_path {
        Some(path) => AppConfig::from_file(path),
        None => {
            let env = std::env::var("AUTHGATE_ENV").unwrap_or_else(|_| "development".to_string());
            AppConfig::load(&env)
        }
    }
}
