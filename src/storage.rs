//! Host-side key-value persistence for custom sources.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::sources::{migrate_sources, LibraryVisibility, SavedRepos, StoredSourceEntry};

/// Storage key for component sources.
pub const COMPONENT_REPOS_KEY: &str = "customComponentRepos";
/// Storage key for block sources.
pub const BLOCK_REPOS_KEY: &str = "customBlockRepos";
/// Storage key for icon sources.
pub const ICON_REPOS_KEY: &str = "customIconRepos";

const VISIBILITY_KEYS: [&str; 5] = [
    "hideShadcnComponents",
    "hideTailwindComponents",
    "hideSerpBlocks",
    "hideShadcnBlocks",
    "hideLucideIcons",
];

/// Minimal persistent key-value store.
pub trait KeyValueStore {
    /// Reads a key; `Ok(None)` when it was never written.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Writes a key.
    fn set(&mut self, key: &str, value: Value) -> Result<()>;
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, Value>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// All keys in one JSON object file, rewritten atomically on every set.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self {
                path,
                values: Map::new(),
            });
        }

        let content = fs::read_to_string(&path)
            .context(format!("Failed to read store file: {}", path.display()))?;
        // A store that does not parse is replaced on the next write.
        let values = match serde_json::from_str::<Map<String, Value>>(&content) {
            Ok(values) => values,
            Err(err) => {
                warn!(
                    "Ignoring unparseable store file {}: {err}",
                    path.display()
                );
                Map::new()
            }
        };
        Ok(Self { path, values })
    }

    /// Backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context(format!(
                "Failed to create store directory: {}",
                parent.display()
            ))?;
        }

        let content = serde_json::to_string_pretty(&self.values)
            .context("Failed to serialize store contents")?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content).context(format!(
            "Failed to write temp store file: {}",
            temp_path.display()
        ))?;
        fs::rename(&temp_path, &self.path).context(format!(
            "Failed to rename temp store file to: {}",
            self.path.display()
        ))?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        self.write()
    }
}

fn load_list(store: &dyn KeyValueStore, key: &str) -> Vec<StoredSourceEntry> {
    let value = match store.get(key) {
        Ok(Some(value)) => value,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!("Failed to read '{key}', treating as empty: {err:#}");
            return Vec::new();
        }
    };

    match serde_json::from_value(value) {
        Ok(list) => list,
        Err(err) => {
            warn!("'{key}' is not a list, treating as empty: {err}");
            Vec::new()
        }
    }
}

fn load_flag(store: &dyn KeyValueStore, key: &str) -> bool {
    match store.get(key) {
        Ok(value) => value.and_then(|value| value.as_bool()).unwrap_or(false),
        Err(err) => {
            warn!("Failed to read '{key}', treating as false: {err:#}");
            false
        }
    }
}

/// Loads saved sources and flags, migrating legacy entries.
///
/// Never fails: unreadable keys degrade to empty lists and `false` flags.
#[must_use]
pub fn load_saved_repos(store: &dyn KeyValueStore) -> SavedRepos {
    let [
        hide_shadcn_components,
        hide_tailwind_components,
        hide_serp_blocks,
        hide_shadcn_blocks,
        hide_lucide_icons,
    ] = VISIBILITY_KEYS.map(|key| load_flag(store, key));

    SavedRepos {
        custom_component_repos: migrate_sources(load_list(store, COMPONENT_REPOS_KEY)),
        custom_block_repos: migrate_sources(load_list(store, BLOCK_REPOS_KEY)),
        custom_icon_repos: migrate_sources(load_list(store, ICON_REPOS_KEY)),
        visibility: LibraryVisibility {
            hide_shadcn_components,
            hide_tailwind_components,
            hide_serp_blocks,
            hide_shadcn_blocks,
            hide_lucide_icons,
        },
    }
}

/// Writes every key of `repos`.
pub fn save_repos(store: &mut dyn KeyValueStore, repos: &SavedRepos) -> Result<()> {
    let lists = [
        (COMPONENT_REPOS_KEY, &repos.custom_component_repos),
        (BLOCK_REPOS_KEY, &repos.custom_block_repos),
        (ICON_REPOS_KEY, &repos.custom_icon_repos),
    ];
    for (key, list) in lists {
        let value = serde_json::to_value(list).context(format!("Failed to serialize {key}"))?;
        store.set(key, value).context(format!("Failed to save {key}"))?;
    }

    let visibility = &repos.visibility;
    let flags = [
        visibility.hide_shadcn_components,
        visibility.hide_tailwind_components,
        visibility.hide_serp_blocks,
        visibility.hide_shadcn_blocks,
        visibility.hide_lucide_icons,
    ];
    for (key, flag) in VISIBILITY_KEYS.into_iter().zip(flags) {
        store
            .set(key, Value::Bool(flag))
            .context(format!("Failed to save {key}"))?;
    }
    Ok(())
}
