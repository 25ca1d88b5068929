//! Common OneBot v11 types.
//!
//! Shared pieces embedded by several event shapes: the header every event
//! carries, sender information and anonymous user data.

use serde::{Deserialize, Deserializer, Serialize};

/// Fields carried by every OneBot event.
///
/// Each leaf event embeds this via `#[serde(flatten)]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventHeader {
    /// Unix timestamp when the event occurred.
    #[serde(default)]
    pub time: i64,
    /// The receiving bot's account id.
    #[serde(default)]
    pub self_id: i64,
}

/// Message sender information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sender {
    /// User ID.
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Nickname.
    #[serde(default)]
    pub nickname: Option<String>,
    /// Gender ("male", "female", "unknown").
    #[serde(default)]
    pub sex: Option<String>,
    /// Age.
    #[serde(default)]
    pub age: Option<i32>,
    /// Group card (group nickname).
    #[serde(default)]
    pub card: Option<String>,
    /// Area.
    #[serde(default)]
    pub area: Option<String>,
    /// Membership level.
    #[serde(default)]
    pub level: Option<String>,
    /// Group role ("owner", "admin", "member").
    #[serde(default)]
    pub role: Option<String>,
    /// Title.
    #[serde(default)]
    pub title: Option<String>,
}

impl Sender {
    /// Returns the group card if set, otherwise the nickname.
    pub fn display_name(&self) -> Option<&str> {
        self.card
            .as_deref()
            .filter(|card| !card.is_empty())
            .or(self.nickname.as_deref())
    }
}

/// Anonymous user information (for anonymous group messages).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anonymous {
    /// Anonymous user ID.
    pub id: i64,
    /// Anonymous user name.
    pub name: String,
    /// Flag for muting.
    pub flag: String,
}

/// Reads an integer that may arrive quoted; anything unreadable becomes 0.
///
/// Matches how the classifier reads `group_id` for the poke split.
pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Int(i64),
        Str(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Loose::deserialize(deserializer)? {
        Loose::Int(n) => n,
        Loose::Str(s) => s.trim().parse().unwrap_or(0),
        Loose::Other(_) => 0,
    })
}
