//! Request events.
//!
//! ```text
//! request_type
//! ├── friend → FriendRequestEvent { user_id, comment, flag }
//! └── group  → GroupRequestEvent  { group_id, user_id, comment, flag, sub_type }
//! ```

use serde::{Deserialize, Serialize};

use super::types::EventHeader;

/// Friend request event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendRequestEvent {
    #[serde(flatten)]
    pub header: EventHeader,
    pub user_id: i64,
    #[serde(default)]
    pub comment: String,
    /// Opaque token used to answer the request.
    pub flag: String,
}

/// Group join request or invitation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRequestEvent {
    #[serde(flatten)]
    pub header: EventHeader,
    pub group_id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub comment: String,
    /// Opaque token used to answer the request.
    pub flag: String,
    /// "add" for a join request, "invite" for an invitation of the bot.
    pub sub_type: String,
}

impl GroupRequestEvent {
    /// Returns `true` if the bot was invited into the group.
    pub fn is_invite(&self) -> bool {
        self.sub_type == "invite"
    }
}
