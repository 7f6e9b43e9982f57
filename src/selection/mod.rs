//! Selection and configuration state per family.
//!
//! Each family has its own [`SelectionController`]. The controller is the only
//! thing that mutates a [`SelectionState`]; every setter validates against the
//! selected entry's option axes and leaves the state untouched on rejection.

pub mod workspace;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalog::{CatalogEntry, Family, OptionItem, Registry};
use crate::color::{HexColor, DEFAULT_ICON_COLOR};
use crate::protocol::{BlockPlacement, ComponentPlacement, IconPlacement, UiMessage};

pub use workspace::Workspace;

/// Value used for an axis the entry does not declare.
pub const DEFAULT_TOKEN: &str = "default";

/// Icon value meaning "no icon".
pub const NO_ICON: &str = "none";

/// Default icon position.
pub const DEFAULT_ICON_POSITION: &str = "left";

/// The user-chosen options for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Variant value, or [`DEFAULT_TOKEN`] when the entry has no variant axis
    pub variant: String,
    /// Size value, or [`DEFAULT_TOKEN`]
    pub size: String,
    /// Icon value, or [`NO_ICON`]
    pub icon: String,
    /// Icon position; meaningless while `icon` is [`NO_ICON`]
    pub icon_position: String,
    /// Free text (label, placeholder, headline)
    pub text: String,
    /// Place one instance per variant
    pub create_all_variants: bool,
    /// Stroke color for placed icons
    pub icon_color: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            variant: DEFAULT_TOKEN.to_string(),
            size: DEFAULT_TOKEN.to_string(),
            icon: NO_ICON.to_string(),
            icon_position: DEFAULT_ICON_POSITION.to_string(),
            text: String::new(),
            create_all_variants: false,
            icon_color: DEFAULT_ICON_COLOR.to_string(),
        }
    }
}

impl Configuration {
    /// True when an icon is chosen.
    #[must_use]
    pub fn has_icon(&self) -> bool {
        self.icon != NO_ICON
    }
}

fn first_or_default(options: &[OptionItem], default: &str) -> String {
    options
        .first()
        .map_or_else(|| default.to_string(), |option| option.value.clone())
}

/// Default configuration for an entry.
///
/// Variant and size take the first declared value (or [`DEFAULT_TOKEN`]),
/// the icon is [`NO_ICON`] unless the entry's icon axis lacks that value, and
/// the text is the entry name.
#[must_use]
pub fn default_config_for(entry: &CatalogEntry) -> Configuration {
    let icons = entry.icon_choices();
    let icon = if icons.is_empty() || icons.iter().any(|option| option.value == NO_ICON) {
        NO_ICON.to_string()
    } else {
        icons[0].value.clone()
    };

    Configuration {
        variant: first_or_default(entry.variant_options(), DEFAULT_TOKEN),
        size: first_or_default(entry.size_options(), DEFAULT_TOKEN),
        icon,
        icon_position: first_or_default(entry.icon_position_choices(), DEFAULT_ICON_POSITION),
        text: entry.name.clone(),
        create_all_variants: false,
        icon_color: DEFAULT_ICON_COLOR.to_string(),
    }
}

/// Selection for one family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    selected_entry_id: Option<String>,
    #[serde(flatten)]
    config: Configuration,
}

impl SelectionState {
    /// Id of the selected entry.
    #[must_use]
    pub fn selected_entry_id(&self) -> Option<&str> {
        self.selected_entry_id.as_deref()
    }

    /// Current configuration (the empty defaults when nothing is selected).
    #[must_use]
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// True when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected_entry_id.is_none()
    }
}

/// Checks `value` against an axis. An absent axis only accepts its default.
fn check_axis(axis: &str, options: &[OptionItem], default: &str, value: &str) -> Result<()> {
    if options.is_empty() {
        if value == default {
            return Ok(());
        }
        anyhow::bail!("Entry has no {axis} axis; only '{default}' is accepted, got '{value}'");
    }

    if options.iter().any(|option| option.value == value) {
        return Ok(());
    }
    let allowed: Vec<&str> = options.iter().map(|option| option.value.as_str()).collect();
    anyhow::bail!(
        "Invalid {axis} '{value}'. Expected one of: {}",
        allowed.join(", ")
    )
}

/// Owns the selection state for one family.
#[derive(Debug, Clone)]
pub struct SelectionController {
    registry: Arc<Registry>,
    state: SelectionState,
}

impl SelectionController {
    /// Creates a controller with nothing selected.
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            state: SelectionState::default(),
        }
    }

    /// Family of the underlying registry.
    #[must_use]
    pub fn family(&self) -> Family {
        self.registry.family()
    }

    /// Registry the controller validates against.
    #[must_use]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Swaps in a new registry (e.g. after an icon list refresh).
    ///
    /// The selection survives when its entry still exists; otherwise the
    /// state is reset.
    pub fn replace_registry(&mut self, registry: Arc<Registry>) {
        self.registry = registry;
        let still_there = self
            .state
            .selected_entry_id
            .as_deref()
            .is_some_and(|id| self.registry.find_by_id(id).is_some());
        if !still_there {
            self.reset();
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// The selected entry, if any.
    #[must_use]
    pub fn selected_entry(&self) -> Option<&CatalogEntry> {
        let id = self.state.selected_entry_id.as_deref()?;
        self.registry.find_by_id(id)
    }

    /// Selects an entry and resets every axis to the entry defaults.
    pub fn select_entry(&mut self, id: &str) -> Result<()> {
        let Some(entry) = self.registry.find_by_id(id) else {
            anyhow::bail!("No {} entry with id '{id}'", self.family());
        };
        self.state = SelectionState {
            selected_entry_id: Some(entry.id.clone()),
            config: default_config_for(entry),
        };
        Ok(())
    }

    /// Clears the selection.
    pub fn reset(&mut self) {
        self.state = SelectionState::default();
    }

    fn require_entry(&self) -> Result<&CatalogEntry> {
        self.selected_entry()
            .context(format!("No {} entry is selected", self.family()))
    }

    /// Sets the variant.
    pub fn set_variant(&mut self, value: &str) -> Result<()> {
        let entry = self.require_entry()?;
        check_axis("variant", entry.variant_options(), DEFAULT_TOKEN, value)?;
        self.state.config.variant = value.to_string();
        Ok(())
    }

    /// Sets the size.
    pub fn set_size(&mut self, value: &str) -> Result<()> {
        let entry = self.require_entry()?;
        check_axis("size", entry.size_options(), DEFAULT_TOKEN, value)?;
        self.state.config.size = value.to_string();
        Ok(())
    }

    /// Sets the icon. [`NO_ICON`] is always accepted.
    pub fn set_icon(&mut self, value: &str) -> Result<()> {
        let entry = self.require_entry()?;
        if value != NO_ICON {
            check_axis("icon", entry.icon_choices(), NO_ICON, value)?;
        }
        self.state.config.icon = value.to_string();
        Ok(())
    }

    /// Sets the icon position; rejected while no icon is chosen.
    pub fn set_icon_position(&mut self, value: &str) -> Result<()> {
        let entry = self.require_entry()?;
        if !self.state.config.has_icon() {
            anyhow::bail!("Cannot set icon position '{value}' while no icon is chosen");
        }
        check_axis(
            "icon position",
            entry.icon_position_choices(),
            DEFAULT_ICON_POSITION,
            value,
        )?;
        self.state.config.icon_position = value.to_string();
        Ok(())
    }

    /// Sets the free text. Any text is accepted.
    pub fn set_free_text(&mut self, text: &str) -> Result<()> {
        self.require_entry()?;
        self.state.config.text = text.to_string();
        Ok(())
    }

    /// Toggles placing every variant; `true` needs a variant axis.
    pub fn set_create_all_variants(&mut self, enabled: bool) -> Result<()> {
        let entry = self.require_entry()?;
        if enabled && !entry.has_variants() {
            anyhow::bail!("Entry '{}' has no variants to create", entry.id);
        }
        self.state.config.create_all_variants = enabled;
        Ok(())
    }

    /// Sets the icon stroke color (icons family only), stored as `#RRGGBB`.
    pub fn set_icon_color(&mut self, value: &str) -> Result<()> {
        self.require_entry()?;
        if self.family() != Family::Icons {
            anyhow::bail!("Icon color only applies to icons, not {}", self.family());
        }
        let color = HexColor::from_hex(value)?;
        self.state.config.icon_color = color.to_hex();
        Ok(())
    }

    /// Builds the placement request for the current selection.
    #[must_use]
    pub fn placement_request(&self) -> Option<UiMessage> {
        let entry = self.selected_entry()?;
        let config = &self.state.config;

        let message = match self.family() {
            Family::Components => {
                let create_all = config.create_all_variants && entry.has_variants();
                UiMessage::PlaceComponent(ComponentPlacement {
                    component_name: entry.name.clone(),
                    component_id: entry.id.clone(),
                    variant: config.variant.clone(),
                    size: config.size.clone(),
                    icon: config.icon.clone(),
                    icon_position: config.icon_position.clone(),
                    text: config.text.clone(),
                    create_all_variants: create_all,
                    variants: create_all.then(|| {
                        entry
                            .variant_options()
                            .iter()
                            .map(|option| option.value.clone())
                            .collect()
                    }),
                })
            }
            Family::Blocks => UiMessage::PlaceBlock(BlockPlacement {
                block_id: entry.id.clone(),
                block_name: entry.name.clone(),
                variant: config.variant.clone(),
                text: config.text.clone(),
            }),
            Family::Icons => UiMessage::PlaceIcon(IconPlacement {
                icon_name: entry.id.clone(),
                size: config.size.clone(),
                color: config.icon_color.clone(),
            }),
        };
        Some(message)
    }
}
