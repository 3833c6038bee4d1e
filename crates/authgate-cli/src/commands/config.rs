//! Configuration inspection CLI commands.

use clap::{Args, Subcommand};

use authgate_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (secrets masked)
    Show,
    /// Validate the configuration
    Validate,
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config_path: Option<&str>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let source = config_path.unwrap_or("config/");

    match &args.command {
        ConfigCommand::Show => {
            let mut config = super::load_config(config_path)?;
            for account in &mut config.directory.accounts {
                account.secret = mask_secret(&account.secret);
            }
            match format {
                OutputFormat::Json => output::print_json(&config),
                OutputFormat::Table => println!("{:#?}", config),
            }
        }
        ConfigCommand::Validate => match super::load_config(config_path) {
            Ok(config) => {
                output::print_success(&format!("Configuration '{}' is valid", source));
                output::print_kv("Server", &config.server.bind_address());
                output::print_kv("Max streams", &config.dispatch.max_streams.to_string());
                output::print_kv("Timeout", &format!("{}s", config.dispatch.timeout_seconds));
                output::print_kv("Lockout threshold", &config.auth.lockout_threshold.to_string());
                output::print_kv(
                    "Rebind policy",
                    &config.auth.rebind_failure_policy.to_string(),
                );
                output::print_kv("Accounts", &config.directory.accounts.len().to_string());
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {}", e));
                return Err(e);
            }
        },
    }

    Ok(())
}

/// Mask all but the first character of a secret
fn mask_secret(secret: &str) -> String {
    let mut chars = secret.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first, "*".repeat(chars.count())),
        None => String::new(),
    }
}
