//! User-managed custom source locations and library visibility flags.
//!
//! Sources are kept per family and persisted by the host. Older versions
//! stored bare URL strings; those are migrated to `{name, url}` on load.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::catalog::{Family, Library};

/// Name given to sources whose name cannot be derived.
pub const UNNAMED_SOURCE: &str = "Custom Repository";

/// One additional source location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSourceEntry {
    /// Display name
    pub name: String,
    /// Location; entries with an empty URL are kept but inactive
    pub url: String,
}

impl CustomSourceEntry {
    /// Creates an entry.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Builds an entry from a legacy bare URL, deriving the name.
    pub fn from_legacy_url(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            name: derive_source_name(&url),
            url,
        }
    }

    /// True when the entry has a usable URL.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// Derives a display name from the last path segment of a URL.
///
/// Version markers (`@`, digits, dots) are stripped and hyphens become
/// spaces: `https://cdn.example.com/npm/shad-ui@1.2.3` gives `shad ui`.
#[must_use]
pub fn derive_source_name(url: &str) -> String {
    static STRIP: OnceLock<Option<Regex>> = OnceLock::new();

    let segment = url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();

    let stripped = match STRIP.get_or_init(|| Regex::new(r"[@\d.]").ok()) {
        Some(re) => re.replace_all(segment, "").into_owned(),
        None => segment.to_string(),
    };
    let name = stripped.replace('-', " ").trim().to_string();

    if name.is_empty() {
        UNNAMED_SOURCE.to_string()
    } else {
        name
    }
}

/// A persisted source in any format ever written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredSourceEntry {
    /// Current `{name, url}` format
    Entry(CustomSourceEntry),
    /// Legacy bare URL string
    Legacy(String),
    /// Anything else; migrates to an inactive placeholder
    Unrecognized(serde_json::Value),
}

impl StoredSourceEntry {
    /// Converts to the current format.
    #[must_use]
    pub fn migrate(self) -> CustomSourceEntry {
        match self {
            Self::Entry(entry) => entry,
            Self::Legacy(url) => CustomSourceEntry::from_legacy_url(url),
            Self::Unrecognized(_) => CustomSourceEntry::new(UNNAMED_SOURCE, ""),
        }
    }
}

/// Migrates a stored list, preserving order.
#[must_use]
pub fn migrate_sources(stored: Vec<StoredSourceEntry>) -> Vec<CustomSourceEntry> {
    stored.into_iter().map(StoredSourceEntry::migrate).collect()
}

/// Custom source lists for every family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomSources {
    components: Vec<CustomSourceEntry>,
    blocks: Vec<CustomSourceEntry>,
    icons: Vec<CustomSourceEntry>,
}

impl CustomSources {
    /// All sources configured for `family`, active or not.
    #[must_use]
    pub fn for_family(&self, family: Family) -> &[CustomSourceEntry] {
        match family {
            Family::Components => &self.components,
            Family::Blocks => &self.blocks,
            Family::Icons => &self.icons,
        }
    }

    fn list_mut(&mut self, family: Family) -> &mut Vec<CustomSourceEntry> {
        match family {
            Family::Components => &mut self.components,
            Family::Blocks => &mut self.blocks,
            Family::Icons => &mut self.icons,
        }
    }

    /// Sources with a non-empty URL.
    #[must_use]
    pub fn active(&self, family: Family) -> Vec<&CustomSourceEntry> {
        self.for_family(family)
            .iter()
            .filter(|entry| entry.is_active())
            .collect()
    }

    /// Replaces the list for `family`.
    pub fn replace(&mut self, family: Family, entries: Vec<CustomSourceEntry>) {
        *self.list_mut(family) = entries;
    }

    /// Appends a source to `family`.
    pub fn add(&mut self, family: Family, entry: CustomSourceEntry) {
        self.list_mut(family).push(entry);
    }

    /// Removes the source at `index`; returns it when the index existed.
    pub fn remove(&mut self, family: Family, index: usize) -> Option<CustomSourceEntry> {
        let list = self.list_mut(family);
        (index < list.len()).then(|| list.remove(index))
    }
}

/// Which built-in libraries the user has hidden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryVisibility {
    /// Hide the built-in shadcn component library
    #[serde(default)]
    pub hide_shadcn_components: bool,
    /// Hide the built-in tailwind component library
    #[serde(default)]
    pub hide_tailwind_components: bool,
    /// Hide the serp block library
    #[serde(default)]
    pub hide_serp_blocks: bool,
    /// Hide the shadcn block library
    #[serde(default)]
    pub hide_shadcn_blocks: bool,
    /// Hide the lucide icon library
    #[serde(default)]
    pub hide_lucide_icons: bool,
}

impl LibraryVisibility {
    /// Whether `library` is hidden.
    #[must_use]
    pub const fn is_hidden(&self, library: Library) -> bool {
        match library {
            Library::ShadcnComponents => self.hide_shadcn_components,
            Library::TailwindComponents => self.hide_tailwind_components,
            Library::SerpBlocks => self.hide_serp_blocks,
            Library::ShadcnBlocks => self.hide_shadcn_blocks,
            Library::LucideIcons => self.hide_lucide_icons,
        }
    }

    /// Hides or shows `library`.
    pub fn set_hidden(&mut self, library: Library, hidden: bool) {
        let slot = match library {
            Library::ShadcnComponents => &mut self.hide_shadcn_components,
            Library::TailwindComponents => &mut self.hide_tailwind_components,
            Library::SerpBlocks => &mut self.hide_serp_blocks,
            Library::ShadcnBlocks => &mut self.hide_shadcn_blocks,
            Library::LucideIcons => &mut self.hide_lucide_icons,
        };
        *slot = hidden;
    }

    /// Hidden libraries, in declaration order.
    #[must_use]
    pub fn hidden(&self) -> Vec<Library> {
        Library::ALL
            .into_iter()
            .filter(|library| self.is_hidden(*library))
            .collect()
    }
}

/// Everything the `save-repos` request persists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRepos {
    /// Component sources
    #[serde(default)]
    pub custom_component_repos: Vec<CustomSourceEntry>,
    /// Block sources
    #[serde(default)]
    pub custom_block_repos: Vec<CustomSourceEntry>,
    /// Icon sources
    #[serde(default)]
    pub custom_icon_repos: Vec<CustomSourceEntry>,
    /// Visibility flags
    #[serde(flatten)]
    pub visibility: LibraryVisibility,
}

impl SavedRepos {
    /// Snapshot of the current sources and flags.
    #[must_use]
    pub fn from_parts(sources: &CustomSources, visibility: LibraryVisibility) -> Self {
        Self {
            custom_component_repos: sources.components.clone(),
            custom_block_repos: sources.blocks.clone(),
            custom_icon_repos: sources.icons.clone(),
            visibility,
        }
    }

    /// Splits into per-family sources and visibility flags.
    #[must_use]
    pub fn into_parts(self) -> (CustomSources, LibraryVisibility) {
        (
            CustomSources {
                components: self.custom_component_repos,
                blocks: self.custom_block_repos,
                icons: self.custom_icon_repos,
            },
            self.visibility,
        )
    }
}

/// Lenient form of [`SavedRepos`] as delivered by `load-saved-repos`.
///
/// Every field is optional; absent fields leave the current value alone.
/// Lists may contain legacy entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedReposPayload {
    /// Component sources
    #[serde(default)]
    pub custom_component_repos: Option<Vec<StoredSourceEntry>>,
    /// Block sources
    #[serde(default)]
    pub custom_block_repos: Option<Vec<StoredSourceEntry>>,
    /// Icon sources
    #[serde(default)]
    pub custom_icon_repos: Option<Vec<StoredSourceEntry>>,
    /// See [`LibraryVisibility`]
    #[serde(default)]
    pub hide_shadcn_components: Option<bool>,
    /// See [`LibraryVisibility`]
    #[serde(default)]
    pub hide_tailwind_components: Option<bool>,
    /// See [`LibraryVisibility`]
    #[serde(default)]
    pub hide_serp_blocks: Option<bool>,
    /// See [`LibraryVisibility`]
    #[serde(default)]
    pub hide_shadcn_blocks: Option<bool>,
    /// See [`LibraryVisibility`]
    #[serde(default)]
    pub hide_lucide_icons: Option<bool>,
}

impl SavedReposPayload {
    /// Applies present fields, migrating legacy entries.
    pub fn apply_to(self, sources: &mut CustomSources, visibility: &mut LibraryVisibility) {
        let lists = [
            (Family::Components, self.custom_component_repos),
            (Family::Blocks, self.custom_block_repos),
            (Family::Icons, self.custom_icon_repos),
        ];
        for (family, stored) in lists {
            if let Some(stored) = stored {
                sources.replace(family, migrate_sources(stored));
            }
        }

        let flags = [
            (&mut visibility.hide_shadcn_components, self.hide_shadcn_components),
            (&mut visibility.hide_tailwind_components, self.hide_tailwind_components),
            (&mut visibility.hide_serp_blocks, self.hide_serp_blocks),
            (&mut visibility.hide_shadcn_blocks, self.hide_shadcn_blocks),
            (&mut visibility.hide_lucide_icons, self.hide_lucide_icons),
        ];
        for (slot, value) in flags {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

impl From<SavedRepos> for SavedReposPayload {
    fn from(saved: SavedRepos) -> Self {
        let wrap = |list: Vec<CustomSourceEntry>| {
            Some(list.into_iter().map(StoredSourceEntry::Entry).collect())
        };
        Self {
            custom_component_repos: wrap(saved.custom_component_repos),
            custom_block_repos: wrap(saved.custom_block_repos),
            custom_icon_repos: wrap(saved.custom_icon_repos),
            hide_shadcn_components: Some(saved.visibility.hide_shadcn_components),
            hide_tailwind_components: Some(saved.visibility.hide_tailwind_components),
            hide_serp_blocks: Some(saved.visibility.hide_serp_blocks),
            hide_shadcn_blocks: Some(saved.visibility.hide_shadcn_blocks),
            hide_lucide_icons: Some(saved.visibility.hide_lucide_icons),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_flags_map_to_libraries() {
        let mut visibility = LibraryVisibility::default();
        assert!(visibility.hidden().is_empty());

        visibility.set_hidden(Library::TailwindComponents, true);
        visibility.set_hidden(Library::LucideIcons, true);
        assert!(visibility.hide_tailwind_components);
        assert!(visibility.is_hidden(Library::LucideIcons));
        assert!(!visibility.is_hidden(Library::ShadcnComponents));
        assert_eq!(
            visibility.hidden(),
            vec![Library::TailwindComponents, Library::LucideIcons]
        );

        visibility.set_hidden(Library::LucideIcons, false);
        assert_eq!(visibility.hidden(), vec![Library::TailwindComponents]);
    }

    #[test]
    fn test_legacy_string_migrates() {
        let stored: Vec<StoredSourceEntry> =
            serde_json::from_str(r#"["https://example.com/lib"]"#).unwrap();
        assert_eq!(
            migrate_sources(stored),
            vec![CustomSourceEntry::new("lib", "https://example.com/lib")]
        );
    }

    #[test]
    fn test_current_format_passes_through() {
        let stored: Vec<StoredSourceEntry> =
            serde_json::from_str(r#"[{"name": "Mine", "url": "https://x.dev/ui"}]"#).unwrap();
        assert_eq!(
            migrate_sources(stored),
            vec![CustomSourceEntry::new("Mine", "https://x.dev/ui")]
        );
    }

    #[test]
    fn test_unknown_shape_becomes_inactive_placeholder() {
        let stored: Vec<StoredSourceEntry> = serde_json::from_str(r#"[42, {"url": 1}]"#).unwrap();
        let migrated = migrate_sources(stored);
        assert_eq!(migrated.len(), 2);
        assert!(migrated.iter().all(|e| e.name == UNNAMED_SOURCE && !e.is_active()));
    }

    #[test]
    fn test_derive_source_name() {
        assert_eq!(derive_source_name("https://example.com/lib"), "lib");
        assert_eq!(derive_source_name("https://example.com/lib/"), "lib");
        assert_eq!(
            derive_source_name("https://cdn.jsdelivr.net/npm/shad-ui@1.2.3"),
            "shad ui"
        );
        assert_eq!(derive_source_name("https://example.com/2.0"), UNNAMED_SOURCE);
        assert_eq!(derive_source_name(""), UNNAMED_SOURCE);
    }

    #[test]
    fn test_active_filters_empty_urls() {
        let mut sources = CustomSources::default();
        sources.add(Family::Icons, CustomSourceEntry::new("Empty", "  "));
        sources.add(Family::Icons, CustomSourceEntry::new("Real", "https://icons.dev"));
        let active = sources.active(Family::Icons);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Real");
        assert_eq!(sources.for_family(Family::Icons).len(), 2);
        assert!(sources.active(Family::Blocks).is_empty());
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut sources = CustomSources::default();
        sources.add(Family::Blocks, CustomSourceEntry::new("A", "https://a.dev"));
        assert!(sources.remove(Family::Blocks, 3).is_none());
        assert_eq!(sources.remove(Family::Blocks, 0).unwrap().name, "A");
    }

    #[test]
    fn test_payload_only_overwrites_present_fields() {
        let mut sources = CustomSources::default();
        sources.add(Family::Blocks, CustomSourceEntry::new("Keep", "https://keep.dev"));
        let mut visibility = LibraryVisibility {
            hide_serp_blocks: true,
            ..LibraryVisibility::default()
        };

        let payload: SavedReposPayload = serde_json::from_str(
            r#"{"customComponentRepos": ["https://example.com/lib"], "hideLucideIcons": true}"#,
        )
        .unwrap();
        payload.apply_to(&mut sources, &mut visibility);

        assert_eq!(sources.for_family(Family::Components)[0].name, "lib");
        assert_eq!(sources.for_family(Family::Blocks)[0].name, "Keep");
        assert!(visibility.hide_serp_blocks);
        assert!(visibility.hide_lucide_icons);
    }

    #[test]
    fn test_saved_repos_wire_names() {
        let saved = SavedRepos {
            custom_icon_repos: vec![CustomSourceEntry::new("Icons", "https://icons.dev")],
            visibility: LibraryVisibility {
                hide_shadcn_blocks: true,
                ..LibraryVisibility::default()
            },
            ..SavedRepos::default()
        };
        let value = serde_json::to_value(&saved).unwrap();
        assert_eq!(value["customIconRepos"][0]["url"], "https://icons.dev");
        assert_eq!(value["hideShadcnBlocks"], true);
        assert_eq!(value["hideLucideIcons"], false);
        assert!(value["customComponentRepos"].as_array().unwrap().is_empty());
    }
}
