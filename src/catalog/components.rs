//! Built-in UI component catalog.
//!
//! Definitions are embedded in the binary at compile time: the shadcn
//! library from `components.json`, followed by the Tailwind library from
//! `tailwind_components.json`.

use anyhow::Result;

use super::{parse_entries, Family, Registry};

/// Builds the component registry from the embedded definitions.
pub fn load() -> Result<Registry> {
    let mut entries = parse_entries(Family::Components, include_str!("components.json"))?;
    entries.extend(parse_entries(
        Family::Components,
        include_str!("tailwind_components.json"),
    )?);
    Registry::new(Family::Components, entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Library};

    #[test]
    fn test_load_components() {
        let registry = load().expect("embedded components.json must be valid");
        assert!(registry.len() > 20);
        assert_eq!(registry.family(), Family::Components);
    }

    #[test]
    fn test_button_axes() {
        let registry = load().unwrap();
        let button = registry.find_by_id("button").unwrap();
        assert_eq!(button.category, Category::Form);
        assert_eq!(button.variant_options()[0].value, "default");
        assert_eq!(button.size_options().len(), 4);
        assert!(button.supports_icon);
        assert_eq!(button.icon_choices()[0].value, "none");
        assert_eq!(button.icon_position_choices().len(), 2);
    }

    #[test]
    fn test_both_component_libraries_are_bundled() {
        let registry = load().unwrap();
        assert_eq!(
            registry.libraries(),
            vec![Library::ShadcnComponents, Library::TailwindComponents]
        );

        let primary = registry.find_by_id("primary-button").unwrap();
        assert_eq!(primary.library(), Library::TailwindComponents);
        assert_eq!(primary.category, Category::Form);
        assert_eq!(registry.find_by_id("button").unwrap().library(), Library::ShadcnComponents);

        let shadcn_only = registry.without_libraries(&[Library::TailwindComponents]);
        assert_eq!(shadcn_only.len(), 33);
    }

    #[test]
    fn test_toggle_has_outline_variant() {
        let registry = load().unwrap();
        let toggle = registry.find_by_id("toggle").unwrap();
        assert!(toggle.variant_options().iter().any(|v| v.value == "outline"));
    }

    #[test]
    fn test_every_component_category_is_used() {
        let registry = load().unwrap();
        let categories = registry.categories();
        for category in [
            Category::Layout,
            Category::Form,
            Category::Display,
            Category::Navigation,
            Category::Feedback,
            Category::Overlay,
        ] {
            assert!(categories.contains(&category), "missing {category}");
        }
    }
}
