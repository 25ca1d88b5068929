//! Message events, parent-in-child.
//!
//! # Hierarchy
//!
//! ```text
//! EventHeader { time, self_id }
//! └── MessageEvent { message_id, user_id, message, raw_message, font, sender }
//!     ├── PrivateMessageEvent { sub_type, temp_source }
//!     └── GroupMessageEvent   { group_id, anonymous, sub_type }
//! ```
//!
//! Each child `Deref`s to its parent, so `private_event.user_id` and
//! `private_event.time` both work transparently.

use std::ops::Deref;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::{Anonymous, EventHeader, Sender};

// ============================================================================
// MessageEvent
// ============================================================================

/// Fields shared by private and group messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEvent {
    #[serde(flatten)]
    pub header: EventHeader,

    /// Message ID.
    pub message_id: i64,
    /// Sender's user ID.
    pub user_id: i64,
    /// Message content (array of segments, or a CQ-coded string).
    pub message: Value,
    /// Raw message string (CQ codes or plain text).
    #[serde(default)]
    pub raw_message: String,
    /// Font (usually 0).
    #[serde(default)]
    pub font: i32,
    /// Sender information.
    #[serde(default)]
    pub sender: Sender,
}

impl MessageEvent {
    /// Extracts plain text from the message segments.
    ///
    /// String-form messages are returned as is.
    pub fn plain_text(&self) -> String {
        extract_plain_text(&self.message)
    }
}

impl Deref for MessageEvent {
    type Target = EventHeader;

    fn deref(&self) -> &EventHeader {
        &self.header
    }
}

// ============================================================================
// PrivateMessageEvent
// ============================================================================

/// Private message event.
///
/// `Deref` chain: `PrivateMessageEvent` → [`MessageEvent`] → [`EventHeader`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivateMessageEvent {
    #[serde(flatten)]
    pub base: MessageEvent,

    /// Sub-type ("friend", "group", "discuss", "other").
    #[serde(default)]
    pub sub_type: String,
    /// Temp source group (for temp conversations).
    #[serde(default)]
    pub temp_source: Option<i64>,
}

impl Deref for PrivateMessageEvent {
    type Target = MessageEvent;

    fn deref(&self) -> &MessageEvent {
        &self.base
    }
}

// ============================================================================
// GroupMessageEvent
// ============================================================================

/// Group message event.
///
/// `Deref` chain: `GroupMessageEvent` → [`MessageEvent`] → [`EventHeader`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMessageEvent {
    #[serde(flatten)]
    pub base: MessageEvent,

    /// Group ID.
    pub group_id: i64,
    /// Anonymous user info (if anonymous).
    #[serde(default)]
    pub anonymous: Option<Anonymous>,
    /// Sub-type ("normal", "anonymous", "notice").
    #[serde(default)]
    pub sub_type: String,
}

impl GroupMessageEvent {
    /// Returns `true` if the message was sent anonymously.
    pub fn is_anonymous(&self) -> bool {
        self.anonymous.is_some()
    }
}

impl Deref for GroupMessageEvent {
    type Target = MessageEvent;

    fn deref(&self) -> &MessageEvent {
        &self.base
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Extracts plain text from message segments.
pub fn extract_plain_text(message: &Value) -> String {
    match message {
        Value::Array(segments) => segments
            .iter()
            .filter_map(|seg| {
                if seg.get("type")?.as_str()? == "text" {
                    seg.get("data")?.get("text")?.as_str()
                } else {
                    None
                }
            })
            .collect(),
        Value::String(text) => text.clone(),
        _ => String::new(),
    }
}
