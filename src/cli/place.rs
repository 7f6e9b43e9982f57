//! `place` command: build a placement request, optionally run it against
//! an in-memory host.

use clap::Args;
use serde::Serialize;
use serde_json::Value;

use crate::bridge::{ChannelTransport, HostBridge, Notification, NotificationLevel};
use crate::cli::common::{load_config, print_json, CliError, CliResult, SelectionArgs};
use crate::host::{HostSession, RecordingDocument};
use crate::storage::MemoryStore;

/// Build the placement request for an entry
#[derive(Debug, Clone, Args)]
pub struct PlaceArgs {
    /// Entry and options
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Send the request to an in-memory host and report its reply
    #[arg(long)]
    pub simulate: bool,

    /// With --simulate, make the host fail with this error
    #[arg(long, value_name = "MESSAGE", requires = "simulate")]
    pub fail_with: Option<String>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct SimulationResponse<'a> {
    request: Value,
    reply: Option<Value>,
    placed: Vec<&'a str>,
    notifications: &'a [Notification],
}

impl PlaceArgs {
    /// Execute the place command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;
        let workspace = self.selection.build_workspace(&config)?;
        let request = workspace
            .placement_request()
            .ok_or_else(|| CliError::validation("Nothing is selected"))?;
        let encoded = request
            .encode()
            .map_err(|e| CliError::io(format!("Failed to encode request: {e:#}")))?;

        if !self.simulate {
            println!("{encoded}");
            return Ok(());
        }

        let (transport, outbox) = ChannelTransport::pair();
        let mut bridge = HostBridge::new(Box::new(transport));
        let document = match &self.fail_with {
            Some(error) => RecordingDocument::new().failing_with(error),
            None => RecordingDocument::new(),
        };
        let mut host = HostSession::new(document, MemoryStore::default());

        workspace
            .commit(&mut bridge)
            .map_err(|e| CliError::io(format!("Failed to send request: {e:#}")))?;

        let mut reply_raw = None;
        for raw in outbox.try_iter() {
            if let Some(reply) = host.handle_raw(&raw) {
                let raw_reply = reply
                    .encode()
                    .map_err(|e| CliError::io(format!("Failed to encode reply: {e:#}")))?;
                bridge.handle_incoming(&raw_reply);
                reply_raw = Some(raw_reply);
            }
        }

        let notifications = bridge.notifications().items();
        let failed = notifications
            .iter()
            .find(|n| n.level == NotificationLevel::Error)
            .map(|n| n.message.clone());

        if self.json {
            let to_value = |raw: &str| serde_json::from_str::<Value>(raw).unwrap_or(Value::Null);
            let placed = host
                .document()
                .placed()
                .iter()
                .map(|node| node.name.as_str())
                .collect();
            print_json(&SimulationResponse {
                request: to_value(&encoded),
                reply: reply_raw.as_deref().map(to_value),
                placed,
                notifications,
            })?;
        } else {
            println!("sent:  {encoded}");
            if let Some(reply) = &reply_raw {
                println!("reply: {reply}");
            }
            for notification in notifications {
                println!("{:?}: {}", notification.level, notification.message);
            }
        }

        match failed {
            Some(message) => Err(CliError::io(format!("Host reported failure: {message}"))),
            None => Ok(()),
        }
    }
}
