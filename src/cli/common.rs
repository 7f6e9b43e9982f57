//! Shared CLI plumbing: error type, exit codes, argument helpers.

use clap::{Args, ValueEnum};
use serde::Serialize;
use std::fmt;

use crate::catalog::{Category, Family};
use crate::config::Config;
use crate::selection::Workspace;
use crate::sources::LibraryVisibility;
use crate::storage::{load_saved_repos, JsonFileStore};

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command succeeded
    Success = 0,
    /// Bad input (unknown option value, invalid config key, ...)
    Validation = 1,
    /// File system or host failure
    Io = 2,
    /// Requested entry does not exist
    NotFound = 3,
}

impl ExitCode {
    /// Numeric code for `std::process::exit`.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Error returned by command handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    /// Exit code category
    pub kind: ExitCode,
    /// Message printed to stderr
    pub message: String,
}

impl CliError {
    /// Invalid user input.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::Validation,
            message: message.into(),
        }
    }

    /// I/O or host failure.
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::Io,
            message: message.into(),
        }
    }

    /// Missing entry.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::NotFound,
            message: message.into(),
        }
    }

    /// Exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.kind.code()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for command handlers.
pub type CliResult<T> = Result<T, CliError>;

/// Catalog family as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FamilyArg {
    /// UI components
    Components,
    /// Page blocks
    Blocks,
    /// Icons
    Icons,
}

impl From<FamilyArg> for Family {
    fn from(arg: FamilyArg) -> Self {
        match arg {
            FamilyArg::Components => Family::Components,
            FamilyArg::Blocks => Family::Blocks,
            FamilyArg::Icons => Family::Icons,
        }
    }
}

/// Options shared by `preview` and `place`.
#[derive(Debug, Clone, Args)]
pub struct SelectionArgs {
    /// Catalog family
    #[arg(value_enum)]
    pub family: FamilyArg,

    /// Entry id (icon name for icons)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Variant value
    #[arg(long)]
    pub variant: Option<String>,

    /// Size value
    #[arg(long)]
    pub size: Option<String>,

    /// Icon value
    #[arg(long)]
    pub icon: Option<String>,

    /// Icon position (left/right)
    #[arg(long)]
    pub icon_position: Option<String>,

    /// Free text (label, placeholder, headline)
    #[arg(long)]
    pub text: Option<String>,

    /// Place every variant of the component
    #[arg(long)]
    pub all_variants: bool,

    /// Icon color (#RRGGBB or #RGB)
    #[arg(long, value_name = "HEX")]
    pub color: Option<String>,
}

impl SelectionArgs {
    /// Builds a workspace with the requested selection applied.
    ///
    /// Unlike interactive edits, a rejected value here is reported to the
    /// user since they typed it.
    pub fn build_workspace(&self, config: &Config) -> CliResult<Workspace> {
        let family = Family::from(self.family);
        let mut workspace = Workspace::bundled(config)
            .map_err(|e| CliError::io(format!("Failed to load catalogs: {e:#}")))?;
        workspace.set_visibility(saved_visibility(config)?);
        workspace.switch_family(family);

        let controller = workspace.controller(family);
        controller
            .select_entry(&self.id)
            .map_err(|e| CliError::not_found(format!("{e:#}")))?;

        let invalid = |e: anyhow::Error| CliError::validation(format!("{e:#}"));
        if let Some(variant) = &self.variant {
            controller.set_variant(variant).map_err(invalid)?;
        }
        if let Some(size) = &self.size {
            controller.set_size(size).map_err(invalid)?;
        }
        if let Some(icon) = &self.icon {
            controller.set_icon(icon).map_err(invalid)?;
        }
        if let Some(position) = &self.icon_position {
            controller.set_icon_position(position).map_err(invalid)?;
        }
        if let Some(text) = &self.text {
            controller.set_free_text(text).map_err(invalid)?;
        }
        if self.all_variants {
            controller.set_create_all_variants(true).map_err(invalid)?;
        }
        if let Some(color) = &self.color {
            controller.set_icon_color(color).map_err(invalid)?;
        }

        Ok(workspace)
    }
}

/// Loads the configuration, mapping failures to an I/O error.
pub fn load_config() -> CliResult<Config> {
    Config::load().map_err(|e| CliError::io(format!("Failed to load config: {e:#}")))
}

/// Opens the key-value store shared with the host.
pub fn open_store(config: &Config) -> CliResult<JsonFileStore> {
    let path = config
        .store_path()
        .map_err(|e| CliError::io(format!("Failed to locate store: {e:#}")))?;
    JsonFileStore::open(path).map_err(|e| CliError::io(format!("{e:#}")))
}

/// Library visibility as last saved by `repos visibility` or the host.
pub fn saved_visibility(config: &Config) -> CliResult<LibraryVisibility> {
    let store = open_store(config)?;
    Ok(load_saved_repos(&store).visibility)
}

/// Parses a kebab-case category name.
pub fn parse_category(value: &str) -> CliResult<Category> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| CliError::validation(format!("Unknown category '{value}'")))
}

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::validation("x").exit_code(), 1);
        assert_eq!(CliError::io("x").exit_code(), 2);
        assert_eq!(CliError::not_found("x").exit_code(), 3);
        assert_eq!(ExitCode::Success.code(), 0);
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category("faq").unwrap(), Category::Faq);
        assert_eq!(parse_category("nope").unwrap_err().kind, ExitCode::Validation);
    }
}
