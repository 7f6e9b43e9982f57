//! `components` and `blocks` commands: search and inspect a catalog.

use clap::Args;
use serde::Serialize;

use crate::catalog::{blocks, components, CatalogEntry, Family, Registry};
use crate::cli::common::{
    load_config, parse_category, print_json, saved_visibility, CliError, CliResult,
};

/// Search a catalog, or show one entry
#[derive(Debug, Clone, Args)]
pub struct CatalogArgs {
    /// Case-insensitive name filter
    #[arg(value_name = "TERM", default_value = "")]
    pub term: String,

    /// Only entries in this category (kebab-case)
    #[arg(short, long, value_name = "CATEGORY")]
    pub category: Option<String>,

    /// Show a single entry with all its options
    #[arg(long, value_name = "ID")]
    pub id: Option<String>,

    /// Include libraries hidden with `repos visibility`
    #[arg(long)]
    pub include_hidden: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ListResponse<'a> {
    family: Family,
    entries: Vec<&'a CatalogEntry>,
    count: usize,
}

impl CatalogArgs {
    /// Execute against the given family's bundled catalog
    pub fn execute(&self, family: Family) -> CliResult<()> {
        let config = load_config()?;
        let loaded = match family {
            Family::Components => components::load(),
            Family::Blocks => blocks::load(),
            Family::Icons => {
                return Err(CliError::validation("Icons are listed by the icons command"))
            }
        };
        let mut registry = loaded
            .map_err(|e| CliError::io(format!("Failed to load {family} catalog: {e:#}")))?
            .with_search_options(config.search_options(family));
        if !self.include_hidden {
            let hidden = saved_visibility(&config)?.hidden();
            if !hidden.is_empty() {
                registry = registry.without_libraries(&hidden);
            }
        }

        if let Some(id) = &self.id {
            return self.show(&registry, id);
        }

        let mut entries = registry.filter_by_name_substring(&self.term);
        if let Some(category) = &self.category {
            let category = parse_category(category)?;
            if category.family() != family {
                return Err(CliError::validation(format!(
                    "Category '{category}' belongs to {}, not {family}",
                    category.family()
                )));
            }
            entries.retain(|entry| entry.category == category);
        }

        if self.json {
            return print_json(&ListResponse {
                family,
                count: entries.len(),
                entries,
            });
        }

        if entries.is_empty() {
            println!("No {family} match '{}'.", self.term);
            return Ok(());
        }

        println!("{} {family}:", entries.len());
        let mut current = None;
        for entry in entries {
            if current != Some(entry.category) {
                println!();
                println!("  [{}]", entry.category);
                current = Some(entry.category);
            }
            println!("  {:<18} {:<20} {}", entry.id, entry.name, entry.description);
        }
        Ok(())
    }

    fn show(&self, registry: &Registry, id: &str) -> CliResult<()> {
        let entry = registry.find_by_id(id).ok_or_else(|| {
            CliError::not_found(format!("No {} entry with id '{id}'", registry.family()))
        })?;

        if self.json {
            return print_json(entry);
        }

        println!("{} ({})", entry.name, entry.id);
        println!("  category: {}", entry.category);
        println!("  library: {}", entry.library());
        if !entry.description.is_empty() {
            println!("  {}", entry.description);
        }
        let axes = [
            ("variants", entry.variant_options()),
            ("sizes", entry.size_options()),
            ("icons", entry.icon_choices()),
            ("icon positions", entry.icon_position_choices()),
        ];
        for (axis, options) in axes {
            if options.is_empty() {
                continue;
            }
            let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
            println!("  {axis}: {}", values.join(", "));
        }
        if !entry.dependencies.is_empty() {
            let deps: Vec<&str> = entry.dependencies.iter().map(String::as_str).collect();
            println!("  depends on: {}", deps.join(", "));
        }
        Ok(())
    }
}
