//! End-to-end flow through the library: select and configure an entry,
//! send it over the bridge to a host session, feed the reply back.

use librarian::bridge::{ChannelTransport, HostBridge, NotificationLevel};
use librarian::catalog::Family;
use librarian::config::Config;
use librarian::host::{HostSession, RecordingDocument};
use librarian::protocol::{HostMessage, PlacementKind, UiMessage};
use librarian::selection::workspace::SelectionEdit;
use librarian::selection::Workspace;
use librarian::sources::{CustomSourceEntry, LibraryVisibility};
use librarian::storage::{load_saved_repos, KeyValueStore, MemoryStore};
use std::sync::mpsc::Receiver;

struct Harness {
    workspace: Workspace,
    bridge: HostBridge,
    outbox: Receiver<String>,
    host: HostSession<RecordingDocument, MemoryStore>,
}

impl Harness {
    fn new(document: RecordingDocument, store: MemoryStore) -> Self {
        let workspace = Workspace::bundled(&Config::default()).expect("bundled catalogs load");
        let (transport, outbox) = ChannelTransport::pair();
        Self {
            workspace,
            bridge: HostBridge::new(Box::new(transport)),
            outbox,
            host: HostSession::new(document, store),
        }
    }

    /// Delivers everything the UI sent and feeds replies back.
    fn pump(&mut self) -> Vec<HostMessage> {
        let mut replies = Vec::new();
        let sent: Vec<String> = self.outbox.try_iter().collect();
        for raw in sent {
            if let Some(reply) = self.host.handle_raw(&raw) {
                let encoded = reply.encode().expect("reply encodes");
                if let Some(decoded) = self.bridge.handle_incoming(&encoded) {
                    replies.push(decoded);
                }
            }
        }
        replies
    }
}

#[test]
fn test_configured_button_is_placed_and_notified() {
    let mut harness = Harness::new(RecordingDocument::new(), MemoryStore::default());

    assert!(harness
        .workspace
        .edit(SelectionEdit::Select("button".to_string())));
    assert!(harness
        .workspace
        .edit(SelectionEdit::Variant("outline".to_string())));
    assert!(harness.workspace.edit(SelectionEdit::Size("lg".to_string())));
    assert!(harness
        .workspace
        .edit(SelectionEdit::Icon("search".to_string())));
    assert!(harness.workspace.edit(SelectionEdit::Text("Go".to_string())));

    assert!(harness
        .workspace
        .commit(&mut harness.bridge)
        .expect("send succeeds"));
    assert!(harness.bridge.is_pending(PlacementKind::Component));

    let replies = harness.pump();
    assert_eq!(replies.len(), 1);
    assert!(!harness.bridge.is_pending(PlacementKind::Component));

    let placed = harness.host.document().placed();
    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0].name, "Button/outline/lg");

    let latest = harness.bridge.notifications().latest().expect("notified");
    assert_eq!(latest.level, NotificationLevel::Success);
    assert_eq!(latest.message, "Component 'Button' placed");
}

#[test]
fn test_host_failure_surfaces_error_verbatim() {
    let document = RecordingDocument::new().failing_with("Storage quota exceeded");
    let mut harness = Harness::new(document, MemoryStore::default());

    harness.workspace.switch_family(Family::Blocks);
    assert!(harness
        .workspace
        .edit(SelectionEdit::Select("hero".to_string())));
    harness
        .workspace
        .commit(&mut harness.bridge)
        .expect("send succeeds");
    let before = harness.workspace.active().state().clone();
    harness.pump();

    // The failed placement leaves the selection untouched
    assert_eq!(harness.workspace.active().state(), &before);
    assert_eq!(before.selected_entry_id(), Some("hero"));
    assert!(harness.host.document().placed().is_empty());
    let latest = harness.bridge.notifications().latest().expect("notified");
    assert_eq!(latest.level, NotificationLevel::Error);
    assert_eq!(latest.message, "Storage quota exceeded");
}

#[test]
fn test_icon_color_is_canonical_on_the_wire() {
    let mut harness = Harness::new(RecordingDocument::new(), MemoryStore::default());

    harness.workspace.switch_family(Family::Icons);
    assert!(harness
        .workspace
        .edit(SelectionEdit::Select("Bell".to_string())));
    assert!(harness
        .workspace
        .edit(SelectionEdit::IconColor("f00".to_string())));

    match harness.workspace.placement_request() {
        Some(UiMessage::PlaceIcon(placement)) => {
            assert_eq!(placement.icon_name, "Bell");
            assert_eq!(placement.color, "#FF0000");
        }
        other => panic!("expected an icon placement, got {other:?}"),
    }

    harness
        .workspace
        .commit(&mut harness.bridge)
        .expect("send succeeds");
    harness.pump();
    assert_eq!(harness.host.document().placed()[0].name, "Icon: Bell");
    assert_eq!(
        harness
            .bridge
            .notifications()
            .latest()
            .map(|n| n.message.as_str()),
        Some("Icon 'Bell' placed")
    );
}

#[test]
fn test_rejected_edit_leaves_selection_untouched() {
    let mut harness = Harness::new(RecordingDocument::new(), MemoryStore::default());

    assert!(harness
        .workspace
        .edit(SelectionEdit::Select("toggle".to_string())));
    let before = harness.workspace.active().state().clone();

    assert!(!harness
        .workspace
        .edit(SelectionEdit::Variant("destructive".to_string())));
    assert!(!harness.workspace.edit(SelectionEdit::Size("xl".to_string())));
    assert_eq!(harness.workspace.active().state(), &before);
}

#[test]
fn test_legacy_sources_are_migrated_and_saved_back() {
    let mut store = MemoryStore::default();
    store
        .set(
            "customComponentRepos",
            serde_json::json!(["https://cdn.example.com/npm/shad-ui@1.2.3"]),
        )
        .expect("memory store accepts writes");
    store
        .set("hideLucideIcons", serde_json::json!(true))
        .expect("memory store accepts writes");

    let mut harness = Harness::new(RecordingDocument::new(), store);
    let startup = harness.host.startup_message().encode().expect("encodes");
    harness.bridge.handle_incoming(&startup);

    let components = harness.bridge.sources().for_family(Family::Components);
    assert_eq!(components.len(), 1);
    assert_eq!(components[0].name, "shad ui");
    assert!(harness.bridge.visibility().hide_lucide_icons);

    harness.workspace.set_visibility(harness.bridge.visibility());
    harness.workspace.switch_family(Family::Icons);
    assert!(harness.workspace.active().registry().is_empty());
    assert!(!harness
        .workspace
        .edit(SelectionEdit::Select("Bell".to_string())));

    harness
        .bridge
        .add_source(
            Family::Icons,
            CustomSourceEntry::new("Brand icons", "https://icons.example.com/brand.json"),
        )
        .expect("save sent");
    harness
        .bridge
        .set_visibility(LibraryVisibility::default())
        .expect("save sent");
    assert!(harness.pump().is_empty());

    let saved = load_saved_repos(harness.host.store());
    assert_eq!(saved.custom_component_repos[0].name, "shad ui");
    assert_eq!(
        saved.custom_component_repos[0].url,
        "https://cdn.example.com/npm/shad-ui@1.2.3"
    );
    assert_eq!(saved.custom_icon_repos.len(), 1);
    assert!(!saved.visibility.hide_lucide_icons);
}

#[test]
fn test_selection_query_and_close() {
    let mut document = RecordingDocument::new();
    document.set_selection(true);
    let mut harness = Harness::new(document, MemoryStore::default());

    harness.bridge.request_selection().expect("send succeeds");
    harness.pump();
    assert!(harness.bridge.host_has_selection());

    harness
        .bridge
        .send(&UiMessage::ClosePlugin)
        .expect("send succeeds");
    harness.pump();
    assert!(harness.host.is_closed());

    assert!(harness
        .workspace
        .edit(SelectionEdit::Select("badge".to_string())));
    harness
        .workspace
        .commit(&mut harness.bridge)
        .expect("send succeeds");
    assert!(harness.pump().is_empty());
    assert!(harness.host.document().placed().is_empty());
}
