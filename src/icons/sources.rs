//! Where icon names come from.
//!
//! The resolver consults a primary source (the bundled icon package's export
//! list), a secondary source (a bundled static list) and, optionally, a remote
//! manifest. Sources are traits so tests and embedders can swap them.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Export names from the icon package that are not icons.
pub const NON_ICON_EXPORTS: [&str; 5] = [
    "createLucideIcon",
    "Icon",
    "default",
    "icons",
    "dynamicIconImports",
];

/// Suffix carried by alias exports (`ActivityIcon` aliases `Activity`).
pub const ALIAS_SUFFIX: &str = "Icon";

/// Prefix carried by vendor alias exports (`LucideActivity`).
pub const VENDOR_PREFIX: &str = "Lucide";

/// A local list of icon identifiers.
pub trait IconSource: Send + Sync {
    /// Short name for log messages.
    fn label(&self) -> &str;

    /// Returns the raw identifiers this source knows about.
    fn names(&self) -> Result<Vec<String>>;
}

/// A best-effort remote manifest (e.g. the lucide `icons.json`).
///
/// The transport belongs to the embedder; a sandboxed host may refuse network
/// access entirely, so every failure here is tolerated by the resolver.
pub trait RemoteIconSource: Send + Sync {
    /// Fetches the manifest body.
    fn fetch_manifest(&self) -> Result<String>;
}

/// Export names of the icon package bundled with the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledExports;

impl IconSource for BundledExports {
    fn label(&self) -> &str {
        "bundled exports"
    }

    fn names(&self) -> Result<Vec<String>> {
        serde_json::from_str(include_str!("lucide_exports.json"))
            .context("Failed to parse embedded lucide_exports.json")
    }
}

/// Hand-maintained static list used when export enumeration yields nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticIconList;

impl IconSource for StaticIconList {
    fn label(&self) -> &str {
        "static list"
    }

    fn names(&self) -> Result<Vec<String>> {
        serde_json::from_str(include_str!("static_icons.json"))
            .context("Failed to parse embedded static_icons.json")
    }
}

/// A fixed in-memory list. Handy for embedders that already hold names.
#[derive(Debug, Clone, Default)]
pub struct FixedIconList(pub Vec<String>);

impl IconSource for FixedIconList {
    fn label(&self) -> &str {
        "fixed list"
    }

    fn names(&self) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

/// Reads a manifest from disk (an offline copy of `icons.json`).
#[derive(Debug, Clone)]
pub struct ManifestFile {
    path: PathBuf,
}

impl ManifestFile {
    /// Creates a source reading `path` on every fetch.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RemoteIconSource for ManifestFile {
    fn fetch_manifest(&self) -> Result<String> {
        std::fs::read_to_string(&self.path).context(format!(
            "Failed to read icon manifest: {}",
            self.path.display()
        ))
    }
}

/// True for identifiers that look like icon component names.
#[must_use]
pub fn is_icon_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Drops non-icon exports and alias names, keeping base icon names.
#[must_use]
pub fn filter_export_names(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .filter(|name| !NON_ICON_EXPORTS.contains(&name.as_str()))
        .filter(|name| !name.ends_with(ALIAS_SUFFIX))
        .filter(|name| !name.starts_with(VENDOR_PREFIX))
        .filter(|name| !name.contains("Props") && !name.contains("Node"))
        .filter(|name| is_icon_identifier(name))
        .collect()
}

/// Converts a kebab-case manifest key to the PascalCase export name.
///
/// `arrow-right` becomes `ArrowRight`.
#[must_use]
pub fn kebab_to_pascal(name: &str) -> String {
    name.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Parses a lucide `icons.json` manifest (an object keyed by kebab-case name).
pub fn parse_icon_manifest(body: &str) -> Result<Vec<String>> {
    let value: serde_json::Value =
        serde_json::from_str(body).context("Icon manifest is not valid JSON")?;
    let Some(object) = value.as_object() else {
        anyhow::bail!("Icon manifest must be a JSON object keyed by icon name");
    };

    Ok(object
        .keys()
        .map(|key| kebab_to_pascal(key))
        .filter(|name| is_icon_identifier(name))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_export_names() {
        let raw = vec![
            "createLucideIcon".to_string(),
            "Icon".to_string(),
            "default".to_string(),
            "Activity".to_string(),
            "ActivityIcon".to_string(),
            "LucideActivity".to_string(),
            "LucideProps".to_string(),
            "IconNode".to_string(),
            "Search".to_string(),
        ];
        assert_eq!(filter_export_names(raw), vec!["Activity", "Search"]);
    }

    #[test]
    fn test_kebab_to_pascal() {
        assert_eq!(kebab_to_pascal("arrow-right"), "ArrowRight");
        assert_eq!(kebab_to_pascal("x"), "X");
        assert_eq!(kebab_to_pascal("align-center-2"), "AlignCenter2");
        assert_eq!(kebab_to_pascal("--odd--"), "Odd");
    }

    #[test]
    fn test_parse_icon_manifest() {
        let body = r#"{"arrow-right": {"tags": []}, "bell": {}}"#;
        let mut names = parse_icon_manifest(body).unwrap();
        names.sort();
        assert_eq!(names, vec!["ArrowRight", "Bell"]);
    }

    #[test]
    fn test_parse_icon_manifest_rejects_arrays() {
        assert!(parse_icon_manifest(r#"["bell"]"#).is_err());
        assert!(parse_icon_manifest("not json").is_err());
    }

    #[test]
    fn test_bundled_sources_parse() {
        let exports = BundledExports.names().unwrap();
        assert!(exports.iter().any(|n| n == "createLucideIcon"));
        assert!(!filter_export_names(exports).is_empty());
        assert!(!StaticIconList.names().unwrap().is_empty());
    }

    #[test]
    fn test_manifest_file_missing() {
        let source = ManifestFile::new("/definitely/not/here/icons.json");
        assert!(source.fetch_manifest().is_err());
    }
}
