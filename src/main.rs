//! Librarian command-line interface.
//!
//! ```bash
//! librarian components button
//! librarian preview components button --variant outline --icon search
//! librarian place icons Bell --color '#ff0000' --simulate
//! ```

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use librarian::catalog::Family;
use librarian::cli::{
    CatalogArgs, CliResult, ConfigArgs, IconsArgs, PlaceArgs, PreviewArgs, ReposArgs,
};
use librarian::constants::APP_BINARY_NAME;

/// Librarian - browse, preview and place catalog entries
#[derive(Parser, Debug)]
#[command(name = APP_BINARY_NAME, author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the component catalog
    Components(CatalogArgs),
    /// Search the block catalog
    Blocks(CatalogArgs),
    /// List icon names
    Icons(IconsArgs),
    /// Render a configured entry as an outline
    Preview(PreviewArgs),
    /// Build (and optionally simulate) a placement request
    Place(PlaceArgs),
    /// Manage saved custom sources
    Repos(ReposArgs),
    /// Manage configuration
    Config(ConfigArgs),
}

impl Command {
    fn execute(&self) -> CliResult<()> {
        match self {
            Self::Components(args) => args.execute(Family::Components),
            Self::Blocks(args) => args.execute(Family::Blocks),
            Self::Icons(args) => args.execute(),
            Self::Preview(args) => args.execute(),
            Self::Place(args) => args.execute(),
            Self::Repos(args) => args.execute(),
            Self::Config(args) => args.execute(),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = cli.command.execute() {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
}
