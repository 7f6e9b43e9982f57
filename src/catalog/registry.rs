//! Immutable per-family registry with lookup, search and grouping.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::{CatalogEntry, Category, Family, Library};

/// Search behavior for one registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Also match the search term against entry descriptions
    #[serde(default)]
    pub match_description: bool,
}

/// Immutable collection of catalog entries for one family.
///
/// Built once from static definitions and never mutated. Lookups by id are
/// O(1); searches keep insertion order.
#[derive(Debug, Clone)]
pub struct Registry {
    family: Family,
    entries: Vec<CatalogEntry>,
    /// Fast lookup by entry id
    lookup: HashMap<String, usize>,
    search: SearchOptions,
}

impl Registry {
    /// Builds a registry, checking entry invariants.
    ///
    /// Fails when an id is duplicated, an entry belongs to another family,
    /// or an option axis is empty or has duplicate values.
    pub fn new(family: Family, entries: Vec<CatalogEntry>) -> Result<Self> {
        let mut lookup = HashMap::with_capacity(entries.len());

        for (idx, entry) in entries.iter().enumerate() {
            entry
                .validate()
                .context(format!("Invalid {family} catalog entry '{}'", entry.id))?;

            if entry.family() != family {
                anyhow::bail!(
                    "Entry '{}' has category '{}' which belongs to {}, not {}",
                    entry.id,
                    entry.category,
                    entry.family(),
                    family
                );
            }

            if lookup.insert(entry.id.clone(), idx).is_some() {
                anyhow::bail!("Duplicate {family} catalog id '{}'", entry.id);
            }
        }

        Ok(Self {
            family,
            entries,
            lookup,
            search: SearchOptions::default(),
        })
    }

    /// A registry with no entries.
    #[must_use]
    pub fn empty(family: Family) -> Self {
        Self {
            family,
            entries: Vec::new(),
            lookup: HashMap::new(),
            search: SearchOptions::default(),
        }
    }

    /// Parses a registry from a JSON array of entries.
    pub fn from_json(family: Family, json: &str) -> Result<Self> {
        Self::new(family, parse_entries(family, json)?)
    }

    /// Returns a copy without the entries of the given libraries.
    #[must_use]
    pub fn without_libraries(&self, hidden: &[Library]) -> Self {
        let entries: Vec<CatalogEntry> = self
            .entries
            .iter()
            .filter(|entry| !hidden.contains(&entry.library()))
            .cloned()
            .collect();
        let lookup = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (entry.id.clone(), idx))
            .collect();
        Self {
            family: self.family,
            entries,
            lookup,
            search: self.search,
        }
    }

    /// Libraries with at least one entry, in declaration order.
    #[must_use]
    pub fn libraries(&self) -> Vec<Library> {
        let mut libraries: Vec<Library> =
            self.entries.iter().map(CatalogEntry::library).collect();
        libraries.sort();
        libraries.dedup();
        libraries
    }

    /// Returns a copy of this registry with different search options.
    #[must_use]
    pub fn with_search_options(mut self, search: SearchOptions) -> Self {
        self.search = search;
        self
    }

    /// The family this registry serves.
    #[must_use]
    pub const fn family(&self) -> Family {
        self.family
    }

    /// Search options in effect.
    #[must_use]
    pub const fn search_options(&self) -> SearchOptions {
        self.search
    }

    /// All entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the registry holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up an entry by id. A missing id is a normal outcome.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&CatalogEntry> {
        let idx = self.lookup.get(id)?;
        self.entries.get(*idx)
    }

    /// Case-insensitive substring search over entry names.
    ///
    /// Descriptions are searched too when the registry's [`SearchOptions`]
    /// ask for it. Results keep insertion order. The term is matched as given,
    /// spaces included; only an empty term returns every entry.
    #[must_use]
    pub fn filter_by_name_substring(&self, term: &str) -> Vec<&CatalogEntry> {
        if term.is_empty() {
            return self.entries.iter().collect();
        }
        let needle = term.to_lowercase();

        self.entries
            .iter()
            .filter(|entry| entry.matches(&needle, self.search.match_description))
            .collect()
    }

    /// Searches within a single category.
    #[must_use]
    pub fn filter_in_category(&self, term: &str, category: Category) -> Vec<&CatalogEntry> {
        self.filter_by_name_substring(term)
            .into_iter()
            .filter(|entry| entry.category == category)
            .collect()
    }

    /// Groups entries by category.
    ///
    /// Groups come out in category declaration order; entries keep insertion
    /// order within each group.
    #[must_use]
    pub fn group_by_category(&self) -> BTreeMap<Category, Vec<&CatalogEntry>> {
        let mut groups: BTreeMap<Category, Vec<&CatalogEntry>> = BTreeMap::new();
        for entry in &self.entries {
            groups.entry(entry.category).or_default().push(entry);
        }
        groups
    }

    /// Categories that have at least one entry, in declaration order.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        self.group_by_category().into_keys().collect()
    }
}

/// Parses a JSON array of catalog entry definitions.
pub fn parse_entries(family: Family, json: &str) -> Result<Vec<CatalogEntry>> {
    serde_json::from_str(json).context(format!("Failed to parse {family} catalog definitions"))
}
