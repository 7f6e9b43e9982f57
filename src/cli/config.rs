//! Configuration management CLI commands.

use crate::cli::common::{load_config, print_json, CliError, CliResult};
use crate::config::Config;
use crate::constants::APP_NAME;
use clap::{Args, Subcommand};

/// Configuration management commands
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Print one configuration value
    Get(ConfigGetArgs),
    /// Set one configuration value
    Set(ConfigSetArgs),
    /// Print the configuration and store file locations
    Path,
}

/// Display current configuration
#[derive(Args, Debug, Clone)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Print one configuration value
#[derive(Args, Debug, Clone)]
pub struct ConfigGetArgs {
    /// Dotted key, e.g. `icons.remote_enabled`
    key: String,
}

/// Set one configuration value
#[derive(Args, Debug, Clone)]
pub struct ConfigSetArgs {
    /// Dotted key, e.g. `icons.remote_enabled`
    key: String,
    /// New value (empty clears optional paths)
    #[arg(allow_hyphen_values = true)]
    value: String,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(),
            ConfigCommand::Get(args) => args.execute(),
            ConfigCommand::Set(args) => args.execute(),
            ConfigCommand::Path => print_paths(),
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;

        if self.json {
            return print_json(&config);
        }

        let title = format!("{APP_NAME} Configuration");
        println!("{title}");
        println!("{}", "=".repeat(title.len()));
        for key in Config::KEYS {
            let value = config
                .get(key)
                .map_err(|e| CliError::validation(format!("{e:#}")))?;
            let value = if value.is_empty() {
                "(not set)".to_string()
            } else {
                value
            };
            println!("  {key:<38} {value}");
        }
        Ok(())
    }
}

impl ConfigGetArgs {
    /// Execute get command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;
        let value = config
            .get(&self.key)
            .map_err(|e| CliError::validation(format!("{e:#}")))?;
        println!("{value}");
        Ok(())
    }
}

impl ConfigSetArgs {
    /// Execute set command
    pub fn execute(&self) -> CliResult<()> {
        let mut config = load_config()?;
        config
            .set(&self.key, &self.value)
            .map_err(|e| CliError::validation(format!("{e:#}")))?;
        config
            .save()
            .map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))?;

        println!("Set {} = {}", self.key, self.value.trim());
        Ok(())
    }
}

fn print_paths() -> CliResult<()> {
    let config = load_config()?;
    let config_file = Config::config_file_path()
        .map_err(|e| CliError::io(format!("Failed to locate config file: {e:#}")))?;
    let store_file = config
        .store_path()
        .map_err(|e| CliError::io(format!("Failed to locate store: {e:#}")))?;

    println!("config: {}", config_file.display());
    println!("store:  {}", store_file.display());
    Ok(())
}
