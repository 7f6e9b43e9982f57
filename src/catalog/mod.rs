//! Catalog entry model for placeable items.
//!
//! A catalog entry describes one thing the user can place into the host
//! document: a UI component, a page block, or an icon. Entries carry the
//! option axes (variants, sizes, icons, icon positions) that the selection
//! controller validates against.

pub mod blocks;
pub mod components;
pub mod registry;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

pub use registry::{parse_entries, Registry, SearchOptions};

/// One of the three independent catalog groupings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Family {
    /// UI components (buttons, inputs, dialogs, ...)
    Components,
    /// Page blocks (hero, pricing, footer, ...)
    Blocks,
    /// Individual icons
    Icons,
}

impl Family {
    /// All families in display order.
    pub const ALL: [Family; 3] = [Family::Components, Family::Blocks, Family::Icons];

    /// Lowercase identifier used in messages and on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Components => "components",
            Self::Blocks => "blocks",
            Self::Icons => "icons",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Built-in library an entry ships with.
///
/// Each family has at least one library; entries that do not name one belong
/// to their family's [`Library::default_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Library {
    /// shadcn/ui components
    ShadcnComponents,
    /// Plain Tailwind CSS components
    TailwindComponents,
    /// serp.co free blocks
    SerpBlocks,
    /// shadcn blocks
    ShadcnBlocks,
    /// Lucide icons
    LucideIcons,
}

impl Library {
    /// All libraries in display order.
    pub const ALL: [Library; 5] = [
        Library::ShadcnComponents,
        Library::TailwindComponents,
        Library::SerpBlocks,
        Library::ShadcnBlocks,
        Library::LucideIcons,
    ];

    /// The family whose entries this library provides.
    #[must_use]
    pub const fn family(&self) -> Family {
        match self {
            Self::ShadcnComponents | Self::TailwindComponents => Family::Components,
            Self::SerpBlocks | Self::ShadcnBlocks => Family::Blocks,
            Self::LucideIcons => Family::Icons,
        }
    }

    /// Library of entries that do not name one.
    #[must_use]
    pub const fn default_for(family: Family) -> Self {
        match family {
            Family::Components => Self::ShadcnComponents,
            Family::Blocks => Self::SerpBlocks,
            Family::Icons => Self::LucideIcons,
        }
    }

    /// Kebab-case identifier (matches the serialized form).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ShadcnComponents => "shadcn-components",
            Self::TailwindComponents => "tailwind-components",
            Self::SerpBlocks => "serp-blocks",
            Self::ShadcnBlocks => "shadcn-blocks",
            Self::LucideIcons => "lucide-icons",
        }
    }
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of categories across all families.
///
/// Each category belongs to exactly one family (see [`Category::family`]).
/// Declaration order is the grouping order used by
/// [`Registry::group_by_category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    // Components
    /// Structural containers
    Layout,
    /// Inputs and controls
    Form,
    /// Read-only presentation
    Display,
    /// Menus, breadcrumbs, pagination
    Navigation,
    /// Alerts, progress, skeletons
    Feedback,
    /// Dialogs, popovers, tooltips
    Overlay,

    // Blocks
    /// Hero sections
    Hero,
    /// Feature showcases
    Features,
    /// Pricing tables
    Pricing,
    /// Customer testimonials
    Testimonials,
    /// Frequently asked questions
    Faq,
    /// Contact forms
    Contact,
    /// Call-to-action banners
    Cta,
    /// Page footers
    Footer,
    /// Top navigation bars
    Navbar,
    /// Team member grids
    Team,
    /// Image galleries
    Gallery,
    /// Newsletter sign-up
    Newsletter,
    /// Login and sign-up forms
    Auth,
    /// Dashboard layouts
    Dashboard,

    // Icons
    /// Single icon glyph
    Icon,
}

impl Category {
    /// The family this category belongs to.
    #[must_use]
    pub const fn family(&self) -> Family {
        match self {
            Self::Layout
            | Self::Form
            | Self::Display
            | Self::Navigation
            | Self::Feedback
            | Self::Overlay => Family::Components,
            Self::Hero
            | Self::Features
            | Self::Pricing
            | Self::Testimonials
            | Self::Faq
            | Self::Contact
            | Self::Cta
            | Self::Footer
            | Self::Navbar
            | Self::Team
            | Self::Gallery
            | Self::Newsletter
            | Self::Auth
            | Self::Dashboard => Family::Blocks,
            Self::Icon => Family::Icons,
        }
    }

    /// Kebab-case identifier (matches the serialized form).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Layout => "layout",
            Self::Form => "form",
            Self::Display => "display",
            Self::Navigation => "navigation",
            Self::Feedback => "feedback",
            Self::Overlay => "overlay",
            Self::Hero => "hero",
            Self::Features => "features",
            Self::Pricing => "pricing",
            Self::Testimonials => "testimonials",
            Self::Faq => "faq",
            Self::Contact => "contact",
            Self::Cta => "cta",
            Self::Footer => "footer",
            Self::Navbar => "navbar",
            Self::Team => "team",
            Self::Gallery => "gallery",
            Self::Newsletter => "newsletter",
            Self::Auth => "auth",
            Self::Dashboard => "dashboard",
            Self::Icon => "icon",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labelled value on one option axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    /// Display label (e.g., "Outline")
    pub label: String,
    /// Value sent to the host (e.g., "outline")
    pub value: String,
}

impl OptionItem {
    /// Creates a new option.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// One placeable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Stable identifier, unique within its registry
    pub id: String,
    /// Display name, used for search
    pub name: String,
    /// Short description
    #[serde(default)]
    pub description: String,
    /// Category (determines the family)
    pub category: Category,
    /// Library the entry ships with; the family default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<Library>,
    /// Variant axis; `None` means the entry has no variant axis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<OptionItem>>,
    /// Size axis, independent from variants
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<OptionItem>>,
    /// Whether the icon axis applies
    #[serde(default)]
    pub supports_icon: bool,
    /// Icon axis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_options: Option<Vec<OptionItem>>,
    /// Icon position axis, meaningful once an icon is chosen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_position_options: Option<Vec<OptionItem>>,
    /// Other catalog ids this entry conceptually relies on (informational)
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub dependencies: BTreeSet<String>,
    /// Needs a structured preview rather than a single control
    #[serde(default)]
    pub complex: bool,
}

impl CatalogEntry {
    /// Creates an entry with no option axes.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category,
            library: None,
            variants: None,
            sizes: None,
            supports_icon: false,
            icon_options: None,
            icon_position_options: None,
            dependencies: BTreeSet::new(),
            complex: false,
        }
    }

    /// Assigns the entry to a library.
    pub fn in_library(mut self, library: Library) -> Self {
        self.library = Some(library);
        self
    }

    /// Adds a variant axis.
    pub fn with_variants(mut self, variants: Vec<OptionItem>) -> Self {
        self.variants = Some(variants);
        self
    }

    /// Adds a size axis.
    pub fn with_sizes(mut self, sizes: Vec<OptionItem>) -> Self {
        self.sizes = Some(sizes);
        self
    }

    /// Adds an icon axis and marks the entry as icon-capable.
    pub fn with_icons(mut self, icons: Vec<OptionItem>, positions: Vec<OptionItem>) -> Self {
        self.supports_icon = true;
        self.icon_options = Some(icons);
        if !positions.is_empty() {
            self.icon_position_options = Some(positions);
        }
        self
    }

    /// Family derived from the category.
    #[must_use]
    pub const fn family(&self) -> Family {
        self.category.family()
    }

    /// Library the entry ships with.
    #[must_use]
    pub fn library(&self) -> Library {
        self.library.unwrap_or(Library::default_for(self.family()))
    }

    /// Variant options, empty when the axis is absent.
    #[must_use]
    pub fn variant_options(&self) -> &[OptionItem] {
        self.variants.as_deref().unwrap_or_default()
    }

    /// Size options, empty when the axis is absent.
    #[must_use]
    pub fn size_options(&self) -> &[OptionItem] {
        self.sizes.as_deref().unwrap_or_default()
    }

    /// Icon options, empty when the axis is absent or icons are unsupported.
    #[must_use]
    pub fn icon_choices(&self) -> &[OptionItem] {
        if !self.supports_icon {
            return &[];
        }
        self.icon_options.as_deref().unwrap_or_default()
    }

    /// Icon position options, empty when the axis is absent.
    #[must_use]
    pub fn icon_position_choices(&self) -> &[OptionItem] {
        if !self.supports_icon {
            return &[];
        }
        self.icon_position_options.as_deref().unwrap_or_default()
    }

    /// True when the entry has a non-empty variant axis.
    #[must_use]
    pub fn has_variants(&self) -> bool {
        !self.variant_options().is_empty()
    }

    /// Case-insensitive match against the name (and optionally the description).
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches(&self, needle: &str, include_description: bool) -> bool {
        self.name.to_lowercase().contains(needle)
            || (include_description && self.description.to_lowercase().contains(needle))
    }

    /// Checks the axis invariants: present axes are non-empty and their
    /// values are unique.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            anyhow::bail!("Catalog entry '{}' has an empty id", self.name);
        }
        if self.name.trim().is_empty() {
            anyhow::bail!("Catalog entry '{}' has an empty name", self.id);
        }
        if let Some(library) = self.library {
            if library.family() != self.family() {
                anyhow::bail!(
                    "Catalog entry '{}' is a {} entry but names library '{}'",
                    self.id,
                    self.family(),
                    library
                );
            }
        }

        let axes = [
            ("variants", &self.variants),
            ("sizes", &self.sizes),
            ("iconOptions", &self.icon_options),
            ("iconPositionOptions", &self.icon_position_options),
        ];
        for (axis, options) in axes {
            let Some(options) = options else { continue };
            if options.is_empty() {
                anyhow::bail!(
                    "Catalog entry '{}' declares an empty {} axis",
                    self.id,
                    axis
                );
            }
            let mut seen = HashSet::new();
            for option in options {
                if !seen.insert(option.value.as_str()) {
                    anyhow::bail!(
                        "Catalog entry '{}' has duplicate {} value '{}'",
                        self.id,
                        axis,
                        option.value
                    );
                }
            }
        }

        Ok(())
    }
}

/// Shorthand for building option lists from `(label, value)` pairs.
pub fn options(pairs: &[(&str, &str)]) -> Vec<OptionItem> {
    pairs
        .iter()
        .map(|(label, value)| OptionItem::new(*label, *value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_family() {
        assert_eq!(Category::Form.family(), Family::Components);
        assert_eq!(Category::Pricing.family(), Family::Blocks);
        assert_eq!(Category::Icon.family(), Family::Icons);
    }

    #[test]
    fn test_category_serde_kebab_case() {
        let json = serde_json::to_string(&Category::Navigation).unwrap();
        assert_eq!(json, "\"navigation\"");
        let parsed: Category = serde_json::from_str("\"faq\"").unwrap();
        assert_eq!(parsed, Category::Faq);
    }

    #[test]
    fn test_library_defaults_to_family_library() {
        let entry = CatalogEntry::new("hero", "Hero", "", Category::Hero);
        assert_eq!(entry.library(), Library::SerpBlocks);

        let entry = entry.in_library(Library::ShadcnBlocks);
        assert_eq!(entry.library(), Library::ShadcnBlocks);
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_library_from_other_family() {
        let entry = CatalogEntry::new("button", "Button", "", Category::Form)
            .in_library(Library::LucideIcons);
        let err = entry.validate().unwrap_err().to_string();
        assert!(err.contains("names library 'lucide-icons'"), "{err}");
    }

    #[test]
    fn test_validate_rejects_empty_axis() {
        let entry =
            CatalogEntry::new("toggle", "Toggle", "", Category::Form).with_variants(Vec::new());
        assert!(entry.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_values() {
        let entry = CatalogEntry::new("toggle", "Toggle", "", Category::Form)
            .with_sizes(options(&[("Small", "sm"), ("Also small", "sm")]));
        let err = entry.validate().unwrap_err().to_string();
        assert!(err.contains("duplicate sizes value 'sm'"));
    }

    #[test]
    fn test_icon_choices_require_support_flag() {
        let mut entry = CatalogEntry::new("badge", "Badge", "", Category::Display)
            .with_icons(options(&[("None", "none"), ("Check", "check")]), Vec::new());
        assert_eq!(entry.icon_choices().len(), 2);

        entry.supports_icon = false;
        assert!(entry.icon_choices().is_empty());
    }

    #[test]
    fn test_matches_description_opt_in() {
        let entry = CatalogEntry::new("alert", "Alert", "Displays a callout", Category::Feedback);
        assert!(entry.matches("ale", false));
        assert!(!entry.matches("callout", false));
        assert!(entry.matches("callout", true));
    }

    #[test]
    fn test_deserialize_camel_case_fields() {
        let json = r#"{
            "id": "button",
            "name": "Button",
            "category": "form",
            "supportsIcon": true,
            "iconOptions": [{"label": "None", "value": "none"}],
            "dependencies": ["icon"]
        }"#;
        let entry: CatalogEntry = serde_json::from_str(json).unwrap();
        assert!(entry.supports_icon);
        assert_eq!(entry.icon_choices().len(), 1);
        assert!(entry.dependencies.contains("icon"));
        assert!(entry.variants.is_none());
        assert!(entry.description.is_empty());
        assert_eq!(entry.library(), Library::ShadcnComponents);

        let json = r#"{"id": "pill", "name": "Pill Button", "category": "form", "library": "tailwind-components"}"#;
        let entry: CatalogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.library(), Library::TailwindComponents);
    }
}
