//! `preview` command: render a configured entry as an outline.

use clap::Args;
use serde::Serialize;

use crate::catalog::Family;
use crate::cli::common::{load_config, print_json, CliResult, SelectionArgs};
use crate::preview::PreviewFragment;
use crate::selection::SelectionState;

/// Preview an entry with the given options
#[derive(Debug, Clone, Args)]
pub struct PreviewArgs {
    /// Entry and options
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct PreviewResponse<'a> {
    family: Family,
    selection: &'a SelectionState,
    preview: PreviewFragment,
}

impl PreviewArgs {
    /// Execute the preview command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;
        let mut workspace = self.selection.build_workspace(&config)?;
        let family = workspace.active_family();
        let preview = workspace.preview();

        if self.json {
            let selection = workspace.active().state();
            return print_json(&PreviewResponse {
                family,
                selection,
                preview,
            });
        }

        print!("{}", preview.to_outline());
        Ok(())
    }
}
