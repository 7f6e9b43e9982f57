//! `icons` command: list resolved icon names.

use clap::Args;
use serde::Serialize;

use crate::catalog::Library;
use crate::cli::common::{load_config, print_json, saved_visibility, CliError, CliResult};
use crate::selection::Workspace;

/// List icon names
#[derive(Debug, Clone, Args)]
pub struct IconsArgs {
    /// Case-insensitive name filter
    #[arg(value_name = "TERM", default_value = "")]
    pub term: String,

    /// Maximum number of names to print (0 for all)
    #[arg(short, long, default_value_t = 0)]
    pub limit: usize,

    /// Re-resolve instead of using the cached list
    #[arg(long)]
    pub refresh: bool,

    /// List icons even when the lucide library is hidden
    #[arg(long)]
    pub include_hidden: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct IconsResponse<'a> {
    icons: Vec<&'a str>,
    count: usize,
    total: usize,
}

impl IconsArgs {
    /// Execute the icons command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;
        let library = Library::LucideIcons;
        if !self.include_hidden && saved_visibility(&config)?.is_hidden(library) {
            if self.json {
                return print_json(&IconsResponse {
                    icons: Vec::new(),
                    count: 0,
                    total: 0,
                });
            }
            println!("The {library} library is hidden; show it with `repos visibility {library}`.");
            return Ok(());
        }

        let mut workspace = Workspace::bundled(&config)
            .map_err(|e| CliError::io(format!("Failed to load catalogs: {e:#}")))?;

        let list = if self.refresh {
            workspace.refresh_icons()
        } else {
            workspace.resolver().resolve()
        };

        let mut icons = list.search(&self.term);
        let matched = icons.len();
        if self.limit > 0 {
            icons.truncate(self.limit);
        }

        if self.json {
            return print_json(&IconsResponse {
                count: icons.len(),
                icons,
                total: list.len(),
            });
        }

        if icons.is_empty() {
            println!("No icons match '{}'.", self.term);
            return Ok(());
        }
        for name in &icons {
            println!("{name}");
        }
        if icons.len() < matched {
            println!("... {} more", matched - icons.len());
        }
        Ok(())
    }
}
