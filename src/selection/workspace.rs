//! The three family controllers plus the active family.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, warn};

use super::SelectionController;
use crate::bridge::HostBridge;
use crate::catalog::{blocks, components, Family, Library, Registry, SearchOptions};
use crate::config::Config;
use crate::icons::sources::ManifestFile;
use crate::icons::{IconNameList, IconNameResolver};
use crate::preview::{self, PreviewFragment};
use crate::protocol::UiMessage;
use crate::sources::LibraryVisibility;

/// One user edit, applied to the active family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEdit {
    /// Select an entry by id
    Select(String),
    /// Change the variant
    Variant(String),
    /// Change the size
    Size(String),
    /// Change the icon
    Icon(String),
    /// Change the icon position
    IconPosition(String),
    /// Change the free text
    Text(String),
    /// Toggle placing every variant
    CreateAllVariants(bool),
    /// Change the icon color
    IconColor(String),
}

fn icon_registry(
    list: &IconNameList,
    search: SearchOptions,
    hidden: &[Library],
) -> Arc<Registry> {
    match list.to_registry() {
        Ok(registry) => Arc::new(
            registry
                .with_search_options(search)
                .without_libraries(hidden),
        ),
        Err(err) => {
            warn!("Could not build icon registry: {err:#}");
            Arc::new(Registry::empty(Family::Icons))
        }
    }
}

fn visible(registry: &Arc<Registry>, hidden: &[Library]) -> Arc<Registry> {
    if hidden.is_empty() {
        Arc::clone(registry)
    } else {
        Arc::new(registry.without_libraries(hidden))
    }
}

/// Selection state for all families.
///
/// Controllers only see entries of libraries that are not hidden; the full
/// catalogs are kept so a library can be shown again.
#[derive(Debug)]
pub struct Workspace {
    active: Family,
    all_components: Arc<Registry>,
    all_blocks: Arc<Registry>,
    visibility: LibraryVisibility,
    components: SelectionController,
    blocks: SelectionController,
    /// Built on first use so icon resolution only runs when needed
    icons: Option<SelectionController>,
    resolver: IconNameResolver,
    icon_search: SearchOptions,
}

impl Workspace {
    /// Creates a workspace over explicit registries and resolver.
    #[must_use]
    pub fn new(
        components: Arc<Registry>,
        blocks: Arc<Registry>,
        resolver: IconNameResolver,
    ) -> Self {
        Self {
            active: Family::Components,
            components: SelectionController::new(Arc::clone(&components)),
            blocks: SelectionController::new(Arc::clone(&blocks)),
            all_components: components,
            all_blocks: blocks,
            visibility: LibraryVisibility::default(),
            icons: None,
            resolver,
            icon_search: SearchOptions::default(),
        }
    }

    /// Workspace over the bundled catalogs, configured by `config`.
    pub fn bundled(config: &Config) -> Result<Self> {
        let components = components::load()
            .context("Failed to load component catalog")?
            .with_search_options(config.search_options(Family::Components));
        let blocks = blocks::load()
            .context("Failed to load block catalog")?
            .with_search_options(config.search_options(Family::Blocks));

        let mut resolver = IconNameResolver::new();
        if let Some(path) = &config.icons.remote_manifest {
            resolver = resolver.with_remote(Box::new(ManifestFile::new(path)));
        }
        resolver.set_remote_enabled(config.icons.remote_enabled);

        let mut workspace = Self::new(Arc::new(components), Arc::new(blocks), resolver);
        workspace.icon_search = config.search_options(Family::Icons);
        Ok(workspace)
    }

    /// Library visibility in effect.
    #[must_use]
    pub fn visibility(&self) -> LibraryVisibility {
        self.visibility
    }

    /// Hides or shows built-in libraries.
    ///
    /// A selection survives when its entry is still visible; otherwise that
    /// family's selection is reset.
    pub fn set_visibility(&mut self, visibility: LibraryVisibility) {
        if visibility == self.visibility {
            return;
        }
        self.visibility = visibility;
        let hidden = visibility.hidden();
        debug!("Hidden libraries: {hidden:?}");

        self.components.replace_registry(visible(&self.all_components, &hidden));
        self.blocks.replace_registry(visible(&self.all_blocks, &hidden));
        if let Some(icons) = self.icons.as_mut() {
            icons.replace_registry(icon_registry(
                &self.resolver.resolve(),
                self.icon_search,
                &hidden,
            ));
        }
    }

    /// Family currently shown.
    #[must_use]
    pub fn active_family(&self) -> Family {
        self.active
    }

    /// Switches family, resetting the selection of the family being left.
    pub fn switch_family(&mut self, family: Family) {
        if family == self.active {
            return;
        }
        match self.active {
            Family::Components => self.components.reset(),
            Family::Blocks => self.blocks.reset(),
            Family::Icons => {
                if let Some(icons) = self.icons.as_mut() {
                    icons.reset();
                }
            }
        }
        debug!("Switched from {} to {}", self.active, family);
        self.active = family;
    }

    /// Controller for `family`, resolving icons on first use.
    pub fn controller(&mut self, family: Family) -> &mut SelectionController {
        match family {
            Family::Components => &mut self.components,
            Family::Blocks => &mut self.blocks,
            Family::Icons => {
                let resolver = &self.resolver;
                let search = self.icon_search;
                let hidden = self.visibility.hidden();
                self.icons.get_or_insert_with(|| {
                    SelectionController::new(icon_registry(&resolver.resolve(), search, &hidden))
                })
            }
        }
    }

    /// Controller for the active family.
    pub fn active(&mut self) -> &mut SelectionController {
        self.controller(self.active)
    }

    /// Controller for `family` without triggering icon resolution.
    #[must_use]
    pub fn peek(&self, family: Family) -> Option<&SelectionController> {
        match family {
            Family::Components => Some(&self.components),
            Family::Blocks => Some(&self.blocks),
            Family::Icons => self.icons.as_ref(),
        }
    }

    /// Applies one edit to the active family.
    ///
    /// Returns whether the edit was accepted. Rejections are expected during
    /// normal use and only logged at debug level.
    pub fn edit(&mut self, edit: SelectionEdit) -> bool {
        let family = self.active;
        let controller = self.controller(family);
        let outcome = match &edit {
            SelectionEdit::Select(id) => controller.select_entry(id),
            SelectionEdit::Variant(value) => controller.set_variant(value),
            SelectionEdit::Size(value) => controller.set_size(value),
            SelectionEdit::Icon(value) => controller.set_icon(value),
            SelectionEdit::IconPosition(value) => controller.set_icon_position(value),
            SelectionEdit::Text(text) => controller.set_free_text(text),
            SelectionEdit::CreateAllVariants(enabled) => {
                controller.set_create_all_variants(*enabled)
            }
            SelectionEdit::IconColor(value) => controller.set_icon_color(value),
        };

        match outcome {
            Ok(()) => true,
            Err(err) => {
                debug!("Rejected {family} edit {edit:?}: {err:#}");
                false
            }
        }
    }

    /// Preview of the active family's selection.
    #[must_use]
    pub fn preview(&self) -> PreviewFragment {
        match self.peek(self.active) {
            Some(controller) => {
                preview::render(controller.selected_entry(), controller.state().config())
            }
            None => PreviewFragment::Empty,
        }
    }

    /// Placement request for the active family's selection.
    #[must_use]
    pub fn placement_request(&self) -> Option<UiMessage> {
        self.peek(self.active)?.placement_request()
    }

    /// Sends the active placement request. Returns false when nothing is selected.
    pub fn commit(&self, bridge: &mut HostBridge) -> Result<bool> {
        let Some(request) = self.placement_request() else {
            return Ok(false);
        };
        bridge.send(&request)?;
        Ok(true)
    }

    /// The icon resolver.
    #[must_use]
    pub fn resolver(&self) -> &IconNameResolver {
        &self.resolver
    }

    /// Re-resolves icon names and swaps the icon registry.
    ///
    /// An icon selection survives when the icon is still in the new list.
    pub fn refresh_icons(&mut self) -> IconNameList {
        let list = self.resolver.refresh();
        let registry = icon_registry(&list, self.icon_search, &self.visibility.hidden());
        match self.icons.as_mut() {
            Some(icons) => icons.replace_registry(registry),
            None => self.icons = Some(SelectionController::new(registry)),
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::ChannelTransport;
    use crate::icons::sources::FixedIconList;

    fn workspace() -> Workspace {
        let resolver = IconNameResolver::with_sources(
            Box::new(FixedIconList(vec!["Bell".to_string(), "Zap".to_string()])),
            Box::new(FixedIconList(Vec::new())),
        );
        Workspace::new(
            Arc::new(components::load().unwrap()),
            Arc::new(blocks::load().unwrap()),
            resolver,
        )
    }

    #[test]
    fn test_switch_family_resets_left_family() {
        let mut workspace = workspace();
        assert!(workspace.edit(SelectionEdit::Select("button".to_string())));

        workspace.switch_family(Family::Blocks);
        assert!(workspace.peek(Family::Components).unwrap().state().is_empty());

        // Switching to the same family is a no-op
        assert!(workspace.edit(SelectionEdit::Select("hero".to_string())));
        workspace.switch_family(Family::Blocks);
        assert_eq!(
            workspace.peek(Family::Blocks).unwrap().state().selected_entry_id(),
            Some("hero")
        );
    }

    #[test]
    fn test_families_are_independent() {
        let mut workspace = workspace();
        workspace.controller(Family::Blocks).select_entry("pricing").unwrap();
        workspace.edit(SelectionEdit::Select("toggle".to_string()));
        workspace.edit(SelectionEdit::Variant("outline".to_string()));

        assert_eq!(
            workspace.peek(Family::Blocks).unwrap().state().selected_entry_id(),
            Some("pricing")
        );
        assert_eq!(workspace.active().state().config().variant, "outline");
    }

    #[test]
    fn test_rejected_edit_keeps_state() {
        let mut workspace = workspace();
        workspace.edit(SelectionEdit::Select("toggle".to_string()));
        let before = workspace.active().state().clone();
        assert!(!workspace.edit(SelectionEdit::Variant("ghost".to_string())));
        assert!(!workspace.edit(SelectionEdit::Select("no-such-thing".to_string())));
        assert_eq!(workspace.active().state(), &before);
    }

    #[test]
    fn test_icons_resolve_lazily() {
        let mut workspace = workspace();
        assert!(workspace.peek(Family::Icons).is_none());
        assert!(workspace.resolver().cached().is_none());
        assert_eq!(workspace.preview(), PreviewFragment::Empty);

        workspace.switch_family(Family::Icons);
        assert!(workspace.edit(SelectionEdit::Select("Zap".to_string())));
        assert!(workspace.resolver().cached().is_some());
        assert!(matches!(workspace.preview(), PreviewFragment::Rendered { .. }));
    }

    #[test]
    fn test_commit_sends_request() {
        let mut workspace = workspace();
        let (transport, rx) = ChannelTransport::pair();
        let mut bridge = HostBridge::new(Box::new(transport));

        assert!(!workspace.commit(&mut bridge).unwrap());

        workspace.edit(SelectionEdit::Select("button".to_string()));
        assert!(workspace.commit(&mut bridge).unwrap());
        let sent = UiMessage::decode(&rx.recv().unwrap()).unwrap();
        assert_eq!(sent.type_name(), "place-component");
    }

    #[test]
    fn test_hidden_libraries_leave_the_pickers() {
        let mut workspace = workspace();
        workspace.edit(SelectionEdit::Select("primary-button".to_string()));
        workspace.controller(Family::Blocks).select_entry("hero").unwrap();

        let mut visibility = LibraryVisibility::default();
        visibility.set_hidden(Library::TailwindComponents, true);
        visibility.set_hidden(Library::ShadcnBlocks, true);
        workspace.set_visibility(visibility);

        // The Tailwind selection is gone; the serp block selection stays
        assert!(workspace.active().state().is_empty());
        assert!(!workspace.edit(SelectionEdit::Select("primary-button".to_string())));
        assert!(workspace.edit(SelectionEdit::Select("button".to_string())));
        let blocks = workspace.controller(Family::Blocks);
        assert_eq!(blocks.state().selected_entry_id(), Some("hero"));
        assert!(blocks.registry().find_by_id("login").is_none());

        workspace.set_visibility(LibraryVisibility::default());
        assert!(workspace.edit(SelectionEdit::Select("primary-button".to_string())));
        assert!(workspace.controller(Family::Blocks).registry().find_by_id("login").is_some());
    }

    #[test]
    fn test_hidden_icon_library_empties_icon_picker() {
        let mut workspace = workspace();
        workspace.switch_family(Family::Icons);
        assert!(workspace.edit(SelectionEdit::Select("Bell".to_string())));

        let mut visibility = LibraryVisibility::default();
        visibility.set_hidden(Library::LucideIcons, true);
        workspace.set_visibility(visibility);
        assert!(workspace.active().registry().is_empty());
        assert!(workspace.active().state().is_empty());

        // Re-resolving keeps the library hidden
        workspace.refresh_icons();
        assert!(workspace.peek(Family::Icons).unwrap().registry().is_empty());
    }

    #[test]
    fn test_refresh_icons_builds_registry() {
        let mut workspace = workspace();
        let list = workspace.refresh_icons();
        assert_eq!(list.as_slice(), ["Bell", "Zap"]);
        assert_eq!(workspace.peek(Family::Icons).unwrap().registry().len(), 2);
    }
}
