//! UI side of the host message channel.
//!
//! [`HostBridge`] sends requests fire-and-forget and applies host replies in
//! arrival order. Placement replies are matched by type only; there is no
//! correlation id, so a reply for a request the user already moved away from
//! just produces a notification.

pub mod notifications;

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, trace, warn};

use crate::catalog::Family;
use crate::protocol::{HostMessage, PlacementKind, PlacementResult, UiMessage};
use crate::sources::{CustomSourceEntry, CustomSources, LibraryVisibility, SavedRepos};
pub use notifications::{Notification, NotificationLevel, Notifications};

/// Delivers encoded messages to the host.
pub trait Transport: Send {
    /// Posts one encoded message. Must not wait for a reply.
    fn post(&mut self, raw: String) -> Result<()>;
}

/// Transport over an in-process channel.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: Sender<String>,
}

impl ChannelTransport {
    /// Creates a transport and the receiving end the host reads from.
    #[must_use]
    pub fn pair() -> (Self, Receiver<String>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }
}

impl Transport for ChannelTransport {
    fn post(&mut self, raw: String) -> Result<()> {
        self.tx
            .send(raw)
            .map_err(|_| anyhow::anyhow!("Host channel is closed"))
    }
}

/// UI-side bridge state.
pub struct HostBridge {
    transport: Box<dyn Transport>,
    /// Outstanding placement requests per kind
    pending: BTreeMap<PlacementKind, usize>,
    notifications: Notifications,
    host_has_selection: bool,
    sources: CustomSources,
    visibility: LibraryVisibility,
}

impl std::fmt::Debug for HostBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostBridge")
            .field("pending", &self.pending)
            .field("notifications", &self.notifications.len())
            .field("host_has_selection", &self.host_has_selection)
            .finish_non_exhaustive()
    }
}

impl HostBridge {
    /// Creates a bridge over `transport`.
    #[must_use]
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            pending: BTreeMap::new(),
            notifications: Notifications::default(),
            host_has_selection: false,
            sources: CustomSources::default(),
            visibility: LibraryVisibility::default(),
        }
    }

    /// Sends a message. Placement requests are recorded as pending.
    pub fn send(&mut self, message: &UiMessage) -> Result<()> {
        let raw = message.encode()?;
        self.transport
            .post(raw)
            .context(format!("Failed to send {}", message.type_name()))?;

        if let Some(kind) = message.placement_kind() {
            let count = self.pending.entry(kind).or_default();
            if *count > 0 {
                debug!("{kind} sent while {} earlier request(s) pending", *count);
            }
            *count += 1;
        }
        Ok(())
    }

    /// Asks the host whether its document has a selection.
    pub fn request_selection(&mut self) -> Result<()> {
        self.send(&UiMessage::GetSelection)
    }

    /// Sends the current sources and visibility flags for persistence.
    pub fn save_sources(&mut self) -> Result<()> {
        let saved = SavedRepos::from_parts(&self.sources, self.visibility);
        self.send(&UiMessage::SaveRepos(saved))
    }

    /// Decodes and applies one raw host message.
    ///
    /// Malformed messages are logged and dropped. Returns the decoded message
    /// so callers can react further.
    pub fn handle_incoming(&mut self, raw: &str) -> Option<HostMessage> {
        match HostMessage::decode(raw) {
            Ok(message) => {
                self.apply(&message);
                Some(message)
            }
            Err(err) => {
                warn!("Dropping malformed host message: {err:#}");
                None
            }
        }
    }

    /// Applies an already decoded host message.
    pub fn apply(&mut self, message: &HostMessage) {
        match message {
            HostMessage::SelectionChanged { has_selection } => {
                self.host_has_selection = *has_selection;
            }
            HostMessage::Placed(kind, result) => self.apply_placement(*kind, result),
            HostMessage::LoadSavedRepos(payload) => {
                payload
                    .clone()
                    .apply_to(&mut self.sources, &mut self.visibility);
                debug!(
                    "Loaded saved sources: {} component, {} block, {} icon",
                    self.sources.for_family(Family::Components).len(),
                    self.sources.for_family(Family::Blocks).len(),
                    self.sources.for_family(Family::Icons).len()
                );
            }
            HostMessage::Unknown(kind) => trace!("Ignoring host message of type '{kind}'"),
        }
    }

    fn apply_placement(&mut self, kind: PlacementKind, result: &PlacementResult) {
        match self.pending.get_mut(&kind) {
            Some(count) if *count > 0 => *count -= 1,
            _ => debug!("{} arrived with nothing pending", kind.response_type()),
        }

        if result.success {
            let message = match result.subject() {
                Some(subject) => format!("{} '{subject}' placed", kind.noun()),
                None => format!("{} placed", kind.noun()),
            };
            self.notifications.push(NotificationLevel::Success, message);
        } else {
            let message = result
                .error
                .clone()
                .unwrap_or_else(|| format!("Failed to place {}", kind.noun().to_lowercase()));
            self.notifications.push(NotificationLevel::Error, message);
        }
    }

    /// True while at least one request of `kind` awaits a reply.
    #[must_use]
    pub fn is_pending(&self, kind: PlacementKind) -> bool {
        self.pending.get(&kind).is_some_and(|count| *count > 0)
    }

    /// Last reported host selection state.
    #[must_use]
    pub fn host_has_selection(&self) -> bool {
        self.host_has_selection
    }

    /// Notifications raised so far.
    #[must_use]
    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Mutable access for dismissal and expiry.
    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    /// Custom sources as last loaded or edited.
    #[must_use]
    pub fn sources(&self) -> &CustomSources {
        &self.sources
    }

    /// Library visibility flags.
    #[must_use]
    pub fn visibility(&self) -> LibraryVisibility {
        self.visibility
    }

    /// Adds a custom source and persists the new lists.
    pub fn add_source(&mut self, family: Family, entry: CustomSourceEntry) -> Result<()> {
        self.sources.add(family, entry);
        self.save_sources()
    }

    /// Removes a custom source and persists the new lists.
    pub fn remove_source(&mut self, family: Family, index: usize) -> Result<CustomSourceEntry> {
        let removed = self
            .sources
            .remove(family, index)
            .context(format!("No {family} source at index {index}"))?;
        self.save_sources()?;
        Ok(removed)
    }

    /// Replaces the visibility flags and persists them.
    pub fn set_visibility(&mut self, visibility: LibraryVisibility) -> Result<()> {
        self.visibility = visibility;
        self.save_sources()
    }
}
