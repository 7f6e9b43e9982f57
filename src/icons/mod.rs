//! Icon name resolution and caching.
//!
//! Resolution never fails: it prefers the bundled icon package's exports,
//! falls back to a bundled static list, and as a last resort returns
//! [`HARD_FALLBACK`]. An optional remote manifest can enrich the local list;
//! its failures are swallowed.

pub mod sources;

use anyhow::Result;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

use crate::catalog::{options, CatalogEntry, Category, Family, Registry};
use sources::{
    filter_export_names, is_icon_identifier, parse_icon_manifest, BundledExports, IconSource,
    RemoteIconSource, StaticIconList,
};

/// Names returned when every other path produced nothing.
pub const HARD_FALLBACK: [&str; 5] = ["Search", "Plus", "Settings", "Info", "X"];

/// Pixel sizes offered for a placed icon, smallest first.
pub const ICON_SIZES: [&str; 5] = ["16", "20", "24", "32", "48"];

/// Sorted, de-duplicated list of icon names.
///
/// Clones share one allocation, so handing the list to readers is cheap and
/// a cached list is never modified in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconNameList(Arc<[String]>);

impl IconNameList {
    /// Sorts and de-duplicates `names`.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        Self(names.into())
    }

    /// The hard-coded minimal list.
    #[must_use]
    pub fn fallback() -> Self {
        Self::from_names(HARD_FALLBACK)
    }

    /// Names in alphabetical order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Number of names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the list is empty (never the case for resolved lists).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Exact membership test.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.binary_search_by(|n| n.as_str().cmp(name)).is_ok()
    }

    /// Case-insensitive substring filter; an empty term returns every name.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&str> {
        let needle = term.to_lowercase();
        self.0
            .iter()
            .filter(|name| term.is_empty() || name.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    /// Builds the icon family registry: one entry per name with a size axis.
    pub fn to_registry(&self) -> Result<Registry> {
        let sizes: Vec<(&str, &str)> = ICON_SIZES.iter().map(|s| (*s, *s)).collect();
        let entries = self
            .0
            .iter()
            .map(|name| {
                CatalogEntry::new(name.as_str(), name.as_str(), "Lucide icon", Category::Icon)
                    .with_sizes(options(&sizes))
            })
            .collect();
        Registry::new(Family::Icons, entries)
    }
}

/// Resolves and caches the icon name list.
///
/// The cache holds a whole [`IconNameList`]; [`refresh`](Self::refresh)
/// builds a new list first and then swaps it in with a single write, so a
/// reader sees either the previous list or the new one.
pub struct IconNameResolver {
    primary: Box<dyn IconSource>,
    secondary: Box<dyn IconSource>,
    remote: Option<Box<dyn RemoteIconSource>>,
    remote_enabled: bool,
    cache: RwLock<Option<IconNameList>>,
}

impl std::fmt::Debug for IconNameResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IconNameResolver")
            .field("primary", &self.primary.label())
            .field("secondary", &self.secondary.label())
            .field("remote", &self.remote.is_some())
            .field("remote_enabled", &self.remote_enabled)
            .finish_non_exhaustive()
    }
}

impl Default for IconNameResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl IconNameResolver {
    /// Resolver over the bundled export list and static list, no remote.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sources(Box::new(BundledExports), Box::new(StaticIconList))
    }

    /// Resolver over custom local sources.
    #[must_use]
    pub fn with_sources(primary: Box<dyn IconSource>, secondary: Box<dyn IconSource>) -> Self {
        Self {
            primary,
            secondary,
            remote: None,
            remote_enabled: false,
            cache: RwLock::new(None),
        }
    }

    /// Attaches a remote manifest source and enables enrichment.
    #[must_use]
    pub fn with_remote(mut self, remote: Box<dyn RemoteIconSource>) -> Self {
        self.remote = Some(remote);
        self.remote_enabled = true;
        self
    }

    /// Turns remote enrichment on or off without dropping the source.
    pub fn set_remote_enabled(&mut self, enabled: bool) {
        self.remote_enabled = enabled;
    }

    /// Returns the cached list, resolving it on first use.
    pub fn resolve(&self) -> IconNameList {
        if let Some(list) = self.cached() {
            return list;
        }

        let mut cache = self.write_cache();
        // Another caller may have filled the cache while we waited.
        if let Some(list) = cache.as_ref() {
            return list.clone();
        }
        let list = self.build();
        *cache = Some(list.clone());
        list
    }

    /// Clears the cache and resolves again.
    pub fn refresh(&self) -> IconNameList {
        let list = self.build();
        *self.write_cache() = Some(list.clone());
        info!("Icon list refreshed ({} names)", list.len());
        list
    }

    /// The cached list, if resolution has run.
    #[must_use]
    pub fn cached(&self) -> Option<IconNameList> {
        self.read_cache().clone()
    }

    /// Drops the cached list.
    pub fn clear(&self) {
        *self.write_cache() = None;
    }

    /// Best-effort remote fetch. Any failure collapses to `None`.
    pub fn fetch_remote_list(&self) -> Option<Vec<String>> {
        let remote = self.remote.as_ref()?;
        let names = match remote.fetch_manifest().and_then(|body| parse_icon_manifest(&body)) {
            Ok(names) => names,
            Err(err) => {
                debug!("Remote icon manifest unavailable: {err:#}");
                return None;
            }
        };

        if names.is_empty() {
            debug!("Remote icon manifest contained no icon names");
            return None;
        }
        Some(names)
    }

    fn build(&self) -> IconNameList {
        let mut names = self.local_names();

        if self.remote_enabled {
            if let Some(remote) = self.fetch_remote_list() {
                debug!("Merging {} remote icon names", remote.len());
                names.extend(remote);
            }
        }

        if names.is_empty() {
            debug!("No icon source produced names, using hard fallback");
            return IconNameList::fallback();
        }
        IconNameList::from_names(names)
    }

    fn local_names(&self) -> Vec<String> {
        match self.primary.names() {
            Ok(raw) => {
                let names = filter_export_names(raw);
                if !names.is_empty() {
                    return names;
                }
                debug!("{} yielded no usable icon names", self.primary.label());
            }
            Err(err) => debug!("{} failed: {err:#}", self.primary.label()),
        }

        match self.secondary.names() {
            Ok(raw) => raw
                .into_iter()
                .map(|name| name.trim().to_string())
                .filter(|name| is_icon_identifier(name))
                .collect(),
            Err(err) => {
                debug!("{} failed: {err:#}", self.secondary.label());
                Vec::new()
            }
        }
    }

    fn read_cache(&self) -> RwLockReadGuard<'_, Option<IconNameList>> {
        self.cache
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_cache(&self) -> RwLockWriteGuard<'_, Option<IconNameList>> {
        self.cache
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::sources::FixedIconList;
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingSource;

    impl IconSource for FailingSource {
        fn label(&self) -> &str {
            "failing"
        }

        fn names(&self) -> Result<Vec<String>> {
            anyhow::bail!("package not available")
        }
    }

    struct FailingRemote;

    impl RemoteIconSource for FailingRemote {
        fn fetch_manifest(&self) -> Result<String> {
            anyhow::bail!("network blocked by sandbox")
        }
    }

    struct CannedRemote(&'static str);

    impl RemoteIconSource for CannedRemote {
        fn fetch_manifest(&self) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    /// Returns a different list on every call.
    struct CountingSource(AtomicUsize);

    impl IconSource for CountingSource {
        fn label(&self) -> &str {
            "counting"
        }

        fn names(&self) -> Result<Vec<String>> {
            let n = self.0.fetch_add(1, Ordering::SeqCst);
            Ok((0..3).map(|i| format!("Gen{n}Icon{i}X")).collect())
        }
    }

    fn fixed(names: &[&str]) -> Box<dyn IconSource> {
        Box::new(FixedIconList(names.iter().map(|s| s.to_string()).collect()))
    }

    #[test]
    fn test_resolve_bundled_is_sorted_and_unique() {
        let resolver = IconNameResolver::new();
        let list = resolver.resolve();
        assert!(list.len() > 100);
        assert!(list.as_slice().windows(2).all(|w| w[0] < w[1]));
        assert!(list.contains("Activity"));
        assert!(!list.contains("ActivityIcon"));
        assert!(!list.contains("LucideActivity"));
        assert!(!list.contains("createLucideIcon"));
    }

    #[test]
    fn test_secondary_used_when_primary_empty() {
        let resolver = IconNameResolver::with_sources(
            fixed(&["Icon", "default", "LucideBell"]),
            fixed(&["Bell", "Alarm"]),
        );
        assert_eq!(resolver.resolve().as_slice(), ["Alarm", "Bell"]);
    }

    #[test]
    fn test_secondary_used_when_primary_fails() {
        let resolver = IconNameResolver::with_sources(Box::new(FailingSource), fixed(&["Bell"]));
        assert_eq!(resolver.resolve().as_slice(), ["Bell"]);
    }

    #[test]
    fn test_hard_fallback_when_everything_fails() {
        let resolver =
            IconNameResolver::with_sources(Box::new(FailingSource), Box::new(FailingSource))
                .with_remote(Box::new(FailingRemote));
        let list = resolver.resolve();
        assert_eq!(list.len(), 5);
        for name in HARD_FALLBACK {
            assert!(list.contains(name));
        }
    }

    #[test]
    fn test_remote_failure_is_silent() {
        let resolver = IconNameResolver::with_sources(fixed(&["Bell"]), fixed(&[]))
            .with_remote(Box::new(FailingRemote));
        assert!(resolver.fetch_remote_list().is_none());
        assert_eq!(resolver.resolve().as_slice(), ["Bell"]);
    }

    #[test]
    fn test_remote_enriches_local_list() {
        let resolver = IconNameResolver::with_sources(fixed(&["Bell", "Search"]), fixed(&[]))
            .with_remote(Box::new(CannedRemote(r#"{"arrow-right": {}, "bell": {}}"#)));
        assert_eq!(resolver.resolve().as_slice(), ["ArrowRight", "Bell", "Search"]);
    }

    #[test]
    fn test_remote_disabled_skips_fetch() {
        let mut resolver = IconNameResolver::with_sources(fixed(&["Bell"]), fixed(&[]))
            .with_remote(Box::new(CannedRemote(r#"{"zap": {}}"#)));
        resolver.set_remote_enabled(false);
        assert_eq!(resolver.resolve().as_slice(), ["Bell"]);
    }

    #[test]
    fn test_resolve_is_cached() {
        let resolver = IconNameResolver::with_sources(
            Box::new(CountingSource(AtomicUsize::new(0))),
            fixed(&[]),
        );
        assert!(resolver.cached().is_none());
        let first = resolver.resolve();
        let second = resolver.resolve();
        assert_eq!(first, second);
        assert!(first.contains("Gen0Icon0X"));
    }

    #[test]
    fn test_refresh_replaces_whole_list() {
        let resolver = IconNameResolver::with_sources(
            Box::new(CountingSource(AtomicUsize::new(0))),
            fixed(&[]),
        );
        let before = resolver.resolve();
        let after = resolver.refresh();

        assert_ne!(before, after);
        assert!(after.as_slice().iter().all(|n| n.starts_with("Gen1")));
        assert_eq!(resolver.cached().unwrap(), after);
        // The list handed out earlier is untouched
        assert!(before.as_slice().iter().all(|n| n.starts_with("Gen0")));
    }

    #[test]
    fn test_clear_forces_new_resolution() {
        let resolver = IconNameResolver::with_sources(
            Box::new(CountingSource(AtomicUsize::new(0))),
            fixed(&[]),
        );
        resolver.resolve();
        resolver.clear();
        assert!(resolver.cached().is_none());
        assert!(resolver.resolve().contains("Gen1Icon0X"));
    }

    #[test]
    fn test_search_and_registry() {
        let list = IconNameList::from_names(["ArrowRight", "ArrowLeft", "Bell"]);
        assert_eq!(list.search("arrow"), vec!["ArrowLeft", "ArrowRight"]);
        assert_eq!(list.search("").len(), 3);
        assert!(list.search("bell ").is_empty());
        assert!(list.search(" ").is_empty());

        let registry = list.to_registry().unwrap();
        assert_eq!(registry.family(), Family::Icons);
        let bell = registry.find_by_id("Bell").unwrap();
        assert_eq!(bell.size_options()[0].value, "16");
    }
}
