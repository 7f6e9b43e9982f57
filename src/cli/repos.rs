//! `repos` command: manage persisted custom sources.
//!
//! Operates on the same key-value store the host uses, so legacy entries are
//! migrated when listed and written back in the current format on change.

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::catalog::{Family, Library};
use crate::cli::common::{self, load_config, print_json, CliError, CliResult, FamilyArg};
use crate::sources::{CustomSourceEntry, CustomSources, LibraryVisibility, SavedRepos};
use crate::storage::{load_saved_repos, save_repos, JsonFileStore};

/// Manage custom source locations
#[derive(Debug, Clone, Args)]
pub struct ReposArgs {
    /// Repos subcommand
    #[command(subcommand)]
    pub command: ReposCommand,
}

/// Repos subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum ReposCommand {
    /// List saved sources
    List(ListReposArgs),
    /// Add a source
    Add(AddRepoArgs),
    /// Remove a source by index
    Remove(RemoveRepoArgs),
    /// Hide or show a built-in library
    Visibility(VisibilityArgs),
}

/// List saved sources
#[derive(Debug, Clone, Args)]
pub struct ListReposArgs {
    /// Only this family
    #[arg(short, long, value_enum)]
    pub family: Option<FamilyArg>,

    /// Only sources with a URL
    #[arg(long)]
    pub active: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Add a source
#[derive(Debug, Clone, Args)]
pub struct AddRepoArgs {
    /// Family the source provides
    #[arg(short, long, value_enum)]
    pub family: FamilyArg,

    /// Source URL
    #[arg(long)]
    pub url: String,

    /// Display name (derived from the URL when omitted)
    #[arg(long)]
    pub name: Option<String>,
}

/// Remove a source
#[derive(Debug, Clone, Args)]
pub struct RemoveRepoArgs {
    /// Family the source belongs to
    #[arg(short, long, value_enum)]
    pub family: FamilyArg,

    /// Zero-based index as shown by `repos list`
    #[arg(long)]
    pub index: usize,
}

/// Built-in libraries that can be hidden
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LibraryArg {
    /// shadcn components
    ShadcnComponents,
    /// tailwind components
    TailwindComponents,
    /// serp blocks
    SerpBlocks,
    /// shadcn blocks
    ShadcnBlocks,
    /// lucide icons
    LucideIcons,
}

impl From<LibraryArg> for Library {
    fn from(arg: LibraryArg) -> Self {
        match arg {
            LibraryArg::ShadcnComponents => Library::ShadcnComponents,
            LibraryArg::TailwindComponents => Library::TailwindComponents,
            LibraryArg::SerpBlocks => Library::SerpBlocks,
            LibraryArg::ShadcnBlocks => Library::ShadcnBlocks,
            LibraryArg::LucideIcons => Library::LucideIcons,
        }
    }
}

/// Hide or show a built-in library
#[derive(Debug, Clone, Args)]
pub struct VisibilityArgs {
    /// Library to change
    #[arg(value_enum)]
    pub library: LibraryArg,

    /// Hide it (otherwise show it)
    #[arg(long)]
    pub hide: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FamilySources<'a> {
    family: Family,
    sources: Vec<&'a CustomSourceEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListReposResponse<'a> {
    families: Vec<FamilySources<'a>>,
    visibility: LibraryVisibility,
}

fn open_store() -> CliResult<JsonFileStore> {
    common::open_store(&load_config()?)
}

fn save(
    store: &mut JsonFileStore,
    sources: &CustomSources,
    visibility: LibraryVisibility,
) -> CliResult<()> {
    let saved = SavedRepos::from_parts(sources, visibility);
    save_repos(store, &saved).map_err(|e| CliError::io(format!("{e:#}")))
}

impl ReposArgs {
    /// Execute the repos command
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            ReposCommand::List(args) => args.execute(),
            ReposCommand::Add(args) => args.execute(),
            ReposCommand::Remove(args) => args.execute(),
            ReposCommand::Visibility(args) => args.execute(),
        }
    }
}

impl ListReposArgs {
    /// Execute the list command
    pub fn execute(&self) -> CliResult<()> {
        let store = open_store()?;
        let (sources, visibility) = load_saved_repos(&store).into_parts();

        let families: Vec<Family> = match self.family {
            Some(family) => vec![family.into()],
            None => Family::ALL.to_vec(),
        };
        let listed: Vec<FamilySources> = families
            .into_iter()
            .map(|family| FamilySources {
                family,
                sources: if self.active {
                    sources.active(family)
                } else {
                    sources.for_family(family).iter().collect()
                },
            })
            .collect();

        if self.json {
            return print_json(&ListReposResponse {
                families: listed,
                visibility,
            });
        }

        for group in &listed {
            println!("{} ({}):", group.family, group.sources.len());
            for (index, source) in group.sources.iter().enumerate() {
                let url = if source.is_active() {
                    source.url.as_str()
                } else {
                    "(no url)"
                };
                println!("  {index:>3}  {:<24} {url}", source.name);
            }
        }
        Ok(())
    }
}

impl AddRepoArgs {
    /// Execute the add command
    pub fn execute(&self) -> CliResult<()> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(CliError::validation("URL must not be empty"));
        }

        let mut store = open_store()?;
        let (mut sources, visibility) = load_saved_repos(&store).into_parts();
        let entry = match &self.name {
            Some(name) if !name.trim().is_empty() => CustomSourceEntry::new(name.trim(), url),
            _ => CustomSourceEntry::from_legacy_url(url),
        };
        let family = Family::from(self.family);
        let name = entry.name.clone();
        sources.add(family, entry);
        save(&mut store, &sources, visibility)?;
        println!("Added {family} source '{name}'.");
        Ok(())
    }
}

impl RemoveRepoArgs {
    /// Execute the remove command
    pub fn execute(&self) -> CliResult<()> {
        let mut store = open_store()?;
        let (mut sources, visibility) = load_saved_repos(&store).into_parts();
        let family = Family::from(self.family);
        let removed = sources.remove(family, self.index).ok_or_else(|| {
            CliError::not_found(format!("No {family} source at index {}", self.index))
        })?;
        save(&mut store, &sources, visibility)?;
        println!("Removed {family} source '{}'.", removed.name);
        Ok(())
    }
}

impl VisibilityArgs {
    /// Execute the visibility command
    pub fn execute(&self) -> CliResult<()> {
        let mut store = open_store()?;
        let (sources, mut visibility) = load_saved_repos(&store).into_parts();
        let library = Library::from(self.library);
        visibility.set_hidden(library, self.hide);
        save(&mut store, &sources, visibility)?;
        if self.hide {
            println!("Hidden library {library}.");
        } else {
            println!("Showing library {library}.");
        }
        Ok(())
    }
}
