//! Message protocol between the UI process and the document host.
//!
//! Every message travels in an envelope `{"type": ..., "data": ...}`. The
//! host's placement replies are flat (`{"type": "icon-placed", "success":
//! false, "error": "..."}`) and `selection-changed` has been seen both flat
//! and nested, so decoding goes through a generic JSON value and matches on
//! the type string. Unknown types decode to an `Unknown` variant.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::sources::{SavedRepos, SavedReposPayload};

/// Key some hosts wrap every message in.
const ENVELOPE_KEY: &str = "pluginMessage";

/// What a placement request places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlacementKind {
    /// A component, optionally with all its variants
    Component,
    /// A page block
    Block,
    /// A single icon
    Icon,
}

impl PlacementKind {
    /// All kinds.
    pub const ALL: [PlacementKind; 3] = [Self::Component, Self::Block, Self::Icon];

    /// Outbound request type.
    #[must_use]
    pub const fn request_type(&self) -> &'static str {
        match self {
            Self::Component => "place-component",
            Self::Block => "place-block",
            Self::Icon => "place-icon",
        }
    }

    /// Inbound result type.
    #[must_use]
    pub const fn response_type(&self) -> &'static str {
        match self {
            Self::Component => "component-placed",
            Self::Block => "block-placed",
            Self::Icon => "icon-placed",
        }
    }

    /// Human noun for notifications.
    #[must_use]
    pub const fn noun(&self) -> &'static str {
        match self {
            Self::Component => "Component",
            Self::Block => "Block",
            Self::Icon => "Icon",
        }
    }
}

impl fmt::Display for PlacementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.request_type())
    }
}

/// Data for `place-component`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPlacement {
    /// Display name of the component
    pub component_name: String,
    /// Catalog id
    pub component_id: String,
    /// Variant value or `"default"`
    pub variant: String,
    /// Size value or `"default"`
    pub size: String,
    /// Icon value or `"none"`
    pub icon: String,
    /// Icon position (`"left"`/`"right"`)
    pub icon_position: String,
    /// Free text (button label, input placeholder, ...)
    pub text: String,
    /// Place one instance per variant
    #[serde(default)]
    pub create_all_variants: bool,
    /// Variant values to place when `create_all_variants` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<String>>,
}

/// Data for `place-block`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPlacement {
    /// Catalog id
    pub block_id: String,
    /// Display name
    pub block_name: String,
    /// Variant value or `"default"`
    pub variant: String,
    /// Headline text
    #[serde(default)]
    pub text: String,
}

/// Data for `place-icon`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconPlacement {
    /// PascalCase icon name
    pub icon_name: String,
    /// Pixel size as sent by the picker
    pub size: String,
    /// `#RRGGBB` stroke color
    pub color: String,
}

/// Data for `resize-ui`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Messages sent by the UI process to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum UiMessage {
    /// Place the selected component
    PlaceComponent(ComponentPlacement),
    /// Place the selected block
    PlaceBlock(BlockPlacement),
    /// Place the selected icon
    PlaceIcon(IconPlacement),
    /// Ask whether the document has a selection
    GetSelection,
    /// Persist custom sources and visibility flags
    SaveRepos(SavedRepos),
    /// Close the UI
    ClosePlugin,
    /// Resize the UI window
    ResizeUi(UiSize),
    /// A type this build does not know (decode only)
    #[serde(skip_serializing)]
    Unknown,
}

impl UiMessage {
    /// Wire type string.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::PlaceComponent(_) => "place-component",
            Self::PlaceBlock(_) => "place-block",
            Self::PlaceIcon(_) => "place-icon",
            Self::GetSelection => "get-selection",
            Self::SaveRepos(_) => "save-repos",
            Self::ClosePlugin => "close-plugin",
            Self::ResizeUi(_) => "resize-ui",
            Self::Unknown => "unknown",
        }
    }

    /// The placement kind for `place-*` requests.
    #[must_use]
    pub const fn placement_kind(&self) -> Option<PlacementKind> {
        match self {
            Self::PlaceComponent(_) => Some(PlacementKind::Component),
            Self::PlaceBlock(_) => Some(PlacementKind::Block),
            Self::PlaceIcon(_) => Some(PlacementKind::Icon),
            _ => None,
        }
    }

    /// Serializes into the wire envelope.
    pub fn encode(&self) -> Result<String> {
        if matches!(self, Self::Unknown) {
            anyhow::bail!("Cannot encode a message of unknown type");
        }
        serde_json::to_string(self).context(format!("Failed to encode {}", self.type_name()))
    }

    /// Parses a wire envelope. Unknown types decode to [`UiMessage::Unknown`].
    pub fn decode(raw: &str) -> Result<Self> {
        let (kind, value) = parse_envelope(raw)?;
        let data = || value.get("data").cloned().unwrap_or(Value::Null);

        let message = match kind.as_str() {
            "place-component" => Self::PlaceComponent(
                serde_json::from_value(data()).context("Invalid place-component data")?,
            ),
            "place-block" => Self::PlaceBlock(
                serde_json::from_value(data()).context("Invalid place-block data")?,
            ),
            "place-icon" => {
                Self::PlaceIcon(serde_json::from_value(data()).context("Invalid place-icon data")?)
            }
            "get-selection" => Self::GetSelection,
            "save-repos" => {
                Self::SaveRepos(serde_json::from_value(data()).context("Invalid save-repos data")?)
            }
            "close-plugin" => Self::ClosePlugin,
            "resize-ui" => {
                Self::ResizeUi(serde_json::from_value(data()).context("Invalid resize-ui data")?)
            }
            _ => Self::Unknown,
        };
        Ok(message)
    }
}

/// Outcome of a placement as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementResult {
    /// Whether the host placed the item
    pub success: bool,
    /// Host error text, shown verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Placed component name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    /// Placed block id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
    /// Placed icon name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_name: Option<String>,
}

impl PlacementResult {
    /// Successful placement of `subject`.
    pub fn succeeded(kind: PlacementKind, subject: impl Into<String>) -> Self {
        Self {
            success: true,
            ..Self::default()
        }
        .with_subject(kind, subject)
    }

    /// Failed placement with the host's error text.
    pub fn failed(kind: PlacementKind, subject: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
        .with_subject(kind, subject)
    }

    fn with_subject(mut self, kind: PlacementKind, subject: impl Into<String>) -> Self {
        let subject = Some(subject.into());
        match kind {
            PlacementKind::Component => self.component_name = subject,
            PlacementKind::Block => self.block_id = subject,
            PlacementKind::Icon => self.icon_name = subject,
        }
        self
    }

    /// Whichever subject field is set.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.component_name
            .as_deref()
            .or(self.block_id.as_deref())
            .or(self.icon_name.as_deref())
    }
}

/// Messages sent by the host to the UI process.
#[derive(Debug, Clone, PartialEq)]
pub enum HostMessage {
    /// Whether the document currently has a selection
    SelectionChanged {
        /// True when something is selected
        has_selection: bool,
    },
    /// Result of a placement request
    Placed(PlacementKind, PlacementResult),
    /// Persisted sources and flags
    LoadSavedRepos(SavedReposPayload),
    /// A type this build does not know; carries the type string
    Unknown(String),
}

impl HostMessage {
    /// Wire type string.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::SelectionChanged { .. } => "selection-changed",
            Self::Placed(kind, _) => kind.response_type(),
            Self::LoadSavedRepos(_) => "load-saved-repos",
            Self::Unknown(kind) => kind,
        }
    }

    /// Serializes the way the host sends it.
    pub fn encode(&self) -> Result<String> {
        let value = match self {
            Self::SelectionChanged { has_selection } => serde_json::json!({
                "type": "selection-changed",
                "hasSelection": has_selection,
            }),
            Self::Placed(kind, result) => {
                let mut value =
                    serde_json::to_value(result).context("Failed to encode placement result")?;
                if let Some(object) = value.as_object_mut() {
                    object.insert("type".to_string(), Value::from(kind.response_type()));
                }
                value
            }
            Self::LoadSavedRepos(payload) => serde_json::json!({
                "type": "load-saved-repos",
                "data": payload,
            }),
            Self::Unknown(kind) => anyhow::bail!("Cannot encode unknown message type '{kind}'"),
        };
        serde_json::to_string(&value).context("Failed to encode host message")
    }

    /// Parses a host message. Unknown types decode to [`HostMessage::Unknown`].
    pub fn decode(raw: &str) -> Result<Self> {
        let (kind, value) = parse_envelope(raw)?;

        let placed = |kind: PlacementKind, value: Value| -> Result<Self> {
            let result = serde_json::from_value(value)
                .context(format!("Invalid {} message", kind.response_type()))?;
            Ok(Self::Placed(kind, result))
        };

        match kind.as_str() {
            "selection-changed" => {
                let flag = value
                    .get("hasSelection")
                    .or_else(|| value.get("data").and_then(|data| data.get("hasSelection")))
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                Ok(Self::SelectionChanged {
                    has_selection: flag,
                })
            }
            "component-placed" => placed(PlacementKind::Component, value),
            "block-placed" => placed(PlacementKind::Block, value),
            "icon-placed" => placed(PlacementKind::Icon, value),
            "load-saved-repos" => {
                let data = value
                    .get("data")
                    .cloned()
                    .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
                let payload =
                    serde_json::from_value(data).context("Invalid load-saved-repos data")?;
                Ok(Self::LoadSavedRepos(payload))
            }
            _ => Ok(Self::Unknown(kind)),
        }
    }
}

/// Parses JSON, unwraps an optional `pluginMessage` wrapper and reads `type`.
fn parse_envelope(raw: &str) -> Result<(String, Value)> {
    let mut value: Value = serde_json::from_str(raw).context("Message is not valid JSON")?;
    if let Some(inner) = value.get_mut(ENVELOPE_KEY) {
        value = inner.take();
    }

    let Some(kind) = value.get("type").and_then(Value::as_str) else {
        anyhow::bail!("Message has no string 'type' field");
    };
    Ok((kind.to_string(), value))
}
