//! Host side of the message channel.
//!
//! [`HostSession`] answers UI requests against a [`DocumentHost`] and persists
//! custom sources through a [`KeyValueStore`]. It is the reference peer used by
//! the CLI's simulated placements and by the integration tests.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::color::HexColor;
use crate::protocol::{
    BlockPlacement, ComponentPlacement, HostMessage, IconPlacement, PlacementKind,
    PlacementResult, UiMessage, UiSize,
};
use crate::sources::SavedReposPayload;
use crate::storage::{load_saved_repos, save_repos, KeyValueStore};

/// Initial UI window size.
pub const DEFAULT_UI_SIZE: UiSize = UiSize {
    width: 680,
    height: 970,
};

/// A document that can receive placed items.
pub trait DocumentHost {
    /// Creates a component; returns the created node name.
    fn place_component(&mut self, placement: &ComponentPlacement) -> Result<String>;

    /// Creates a block; returns the created node name.
    fn place_block(&mut self, placement: &BlockPlacement) -> Result<String>;

    /// Creates an icon; returns the created node name.
    fn place_icon(&mut self, placement: &IconPlacement) -> Result<String>;

    /// Whether the user currently has something selected.
    fn has_selection(&self) -> bool;
}

/// One node created in a [`RecordingDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedNode {
    /// What was placed
    pub kind: PlacementKind,
    /// Node name as shown in the layer list
    pub name: String,
}

/// In-memory document that records every placement.
#[derive(Debug, Clone, Default)]
pub struct RecordingDocument {
    placed: Vec<PlacedNode>,
    has_selection: bool,
    failure: Option<String>,
}

impl RecordingDocument {
    /// Empty document with no selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following placement fail with `error`.
    #[must_use]
    pub fn failing_with(mut self, error: impl Into<String>) -> Self {
        self.failure = Some(error.into());
        self
    }

    /// Sets the selection flag reported to the UI.
    pub fn set_selection(&mut self, has_selection: bool) {
        self.has_selection = has_selection;
    }

    /// Nodes created so far, oldest first.
    #[must_use]
    pub fn placed(&self) -> &[PlacedNode] {
        &self.placed
    }

    fn record(&mut self, kind: PlacementKind, name: String) -> Result<String> {
        if let Some(error) = &self.failure {
            anyhow::bail!("{error}");
        }
        self.placed.push(PlacedNode {
            kind,
            name: name.clone(),
        });
        // A freshly placed node becomes the selection.
        self.has_selection = true;
        Ok(name)
    }
}

impl DocumentHost for RecordingDocument {
    fn place_component(&mut self, placement: &ComponentPlacement) -> Result<String> {
        let name = match (&placement.variants, placement.create_all_variants) {
            (Some(variants), true) if !variants.is_empty() => {
                format!("{} - All Variants", placement.component_name)
            }
            _ => format!(
                "{}/{}/{}",
                placement.component_name, placement.variant, placement.size
            ),
        };
        self.record(PlacementKind::Component, name)
    }

    fn place_block(&mut self, placement: &BlockPlacement) -> Result<String> {
        let name = format!("Block/{}/{}", placement.block_name, placement.variant);
        self.record(PlacementKind::Block, name)
    }

    fn place_icon(&mut self, placement: &IconPlacement) -> Result<String> {
        HexColor::from_hex(&placement.color)
            .context(format!("Cannot color icon '{}'", placement.icon_name))?;
        let name = format!("Icon: {}", placement.icon_name);
        self.record(PlacementKind::Icon, name)
    }

    fn has_selection(&self) -> bool {
        self.has_selection
    }
}

/// Host-side session state.
#[derive(Debug)]
pub struct HostSession<D, S> {
    document: D,
    store: S,
    ui_size: UiSize,
    closed: bool,
}

impl<D: DocumentHost, S: KeyValueStore> HostSession<D, S> {
    /// Creates a session.
    pub fn new(document: D, store: S) -> Self {
        Self {
            document,
            store,
            ui_size: DEFAULT_UI_SIZE,
            closed: false,
        }
    }

    /// The message sent to the UI on startup.
    #[must_use]
    pub fn startup_message(&self) -> HostMessage {
        let saved = load_saved_repos(&self.store);
        HostMessage::LoadSavedRepos(SavedReposPayload::from(saved))
    }

    /// Decodes and handles one raw UI message.
    pub fn handle_raw(&mut self, raw: &str) -> Option<HostMessage> {
        match UiMessage::decode(raw) {
            Ok(message) => self.handle(&message),
            Err(err) => {
                warn!("Dropping malformed UI message: {err:#}");
                None
            }
        }
    }

    /// Handles one UI message; returns the reply, if the message has one.
    pub fn handle(&mut self, message: &UiMessage) -> Option<HostMessage> {
        if self.closed {
            debug!("Ignoring {} after close", message.type_name());
            return None;
        }

        match message {
            UiMessage::PlaceComponent(placement) => Some(Self::reply(
                PlacementKind::Component,
                &placement.component_name,
                self.document.place_component(placement),
            )),
            UiMessage::PlaceBlock(placement) => Some(Self::reply(
                PlacementKind::Block,
                &placement.block_id,
                self.document.place_block(placement),
            )),
            UiMessage::PlaceIcon(placement) => Some(Self::reply(
                PlacementKind::Icon,
                &placement.icon_name,
                self.document.place_icon(placement),
            )),
            UiMessage::GetSelection => Some(HostMessage::SelectionChanged {
                has_selection: self.document.has_selection(),
            }),
            UiMessage::SaveRepos(saved) => {
                match save_repos(&mut self.store, saved) {
                    Ok(()) => info!("Custom sources saved"),
                    Err(err) => warn!("Failed to save custom sources: {err:#}"),
                }
                None
            }
            UiMessage::ClosePlugin => {
                self.closed = true;
                None
            }
            UiMessage::ResizeUi(size) => {
                self.ui_size = *size;
                None
            }
            UiMessage::Unknown => {
                debug!("Ignoring UI message of unknown type");
                None
            }
        }
    }

    fn reply(kind: PlacementKind, subject: &str, outcome: Result<String>) -> HostMessage {
        let result = match outcome {
            Ok(node) => {
                debug!("Placed {node}");
                PlacementResult::succeeded(kind, subject)
            }
            Err(err) => {
                warn!("{} failed: {err:#}", kind.request_type());
                PlacementResult::failed(kind, subject, format!("{err:#}"))
            }
        };
        HostMessage::Placed(kind, result)
    }

    /// The document.
    pub fn document(&self) -> &D {
        &self.document
    }

    /// Mutable document access.
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Last requested UI size.
    pub fn ui_size(&self) -> UiSize {
        self.ui_size
    }

    /// True after `close-plugin`.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
