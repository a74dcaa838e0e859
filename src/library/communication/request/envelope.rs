use super::Command;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Open metadata map carried alongside every envelope
pub type Metadata = Map<String, Value>;

const REPLY_CHANNEL_PREFIX: &str = "reply.";

/// Derives the reply channel name for a request identifier
///
/// The responding side derives the same name from the `requestid` field of
/// the envelope, which makes the channel the correlation mechanism between a
/// published request and its reply.
pub fn reply_channel(request_id: &Uuid) -> String {
    format!("{}{}", REPLY_CHANNEL_PREFIX, request_id)
}

/// Outbound message as placed on the wire
///
/// Built immediately before a request is dispatched, serialized once and
/// discarded afterwards; envelopes are never persisted or reused.
#[derive(Serialize)]
pub struct RequestEnvelope<'a, C: Command> {
    /// Globally unique, caller-generated identifier
    pub requestid: Uuid,
    /// Wire name of the wrapped command
    pub cmd: &'static str,
    /// Open metadata map, currently always empty
    pub meta: Metadata,
    /// Typed command payload
    pub payload: &'a C,
}

impl<'a, C: Command> RequestEnvelope<'a, C> {
    /// Wraps a command for dispatch under a fresh identifier
    pub fn new(command: &'a C) -> Self {
        Self {
            requestid: Uuid::new_v4(),
            cmd: C::NAME,
            meta: Metadata::new(),
            payload: command,
        }
    }
}

/// Inbound reply before payload validation
///
/// The payload is kept as a raw [`Value`] so that a reply which does not
/// decode into an envelope at all can be told apart from one whose payload
/// merely fails the per-command shape check.
#[derive(Debug, Deserialize)]
pub struct ResponseEnvelope {
    /// Identifier echoed from the request
    pub requestid: String,
    /// Open metadata map, ignored by the requesting side
    #[serde(default)]
    pub meta: Value,
    /// Raw reply payload, decoded per command
    #[serde(default)]
    pub payload: Value,
}
