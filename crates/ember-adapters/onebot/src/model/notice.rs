//! Notice events.
//!
//! # Hierarchy
//!
//! ```text
//! notice_type
//! ├── group_upload    → GroupUploadEvent
//! ├── group_admin     → GroupAdminEvent
//! ├── group_decrease  → GroupDecreaseEvent
//! ├── group_increase  → GroupIncreaseEvent
//! ├── group_ban       → GroupBanEvent
//! ├── friend_add      → FriendAddEvent
//! ├── group_recall    → GroupRecallEvent
//! ├── friend_recall   → FriendRecallEvent
//! ├── group_card      → GroupCardEvent
//! ├── offline_file    → OfflineFileEvent
//! └── notify (sub_type)
//!     ├── poke        → PokeEvent (group or private, by group_id)
//!     ├── lucky_king  → LuckyKingEvent
//!     └── honor       → HonorEvent
//! ```
//!
//! Every event embeds [`EventHeader`] via `#[serde(flatten)]`.

use serde::{Deserialize, Serialize};

use super::types::{EventHeader, lenient_i64};

// ============================================================================
// Group Upload Event
// ============================================================================

/// Uploaded file info.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    /// File ID.
    pub id: String,
    /// File name.
    pub name: String,
    /// File size in bytes.
    pub size: i64,
    /// Bus ID used to download the file.
    pub busid: i64,
}

/// Group file upload event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupUploadEvent {
    #[serde(flatten)]
    pub header: EventHeader,
    /// Group ID.
    pub group_id: i64,
    /// Uploader's user ID.
    pub user_id: i64,
    /// File information.
    pub file: UploadedFile,
}

// ============================================================================
// Group Admin Event
// ============================================================================

/// Group admin change event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupAdminEvent {
    #[serde(flatten)]
    pub header: EventHeader,
    /// Group ID.
    pub group_id: i64,
    /// User ID whose admin status changed.
    pub user_id: i64,
    /// Sub-type ("set" or "unset").
    pub sub_type: String,
}

// ============================================================================
// Group Membership Events
// ============================================================================

/// Group member decrease event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDecreaseEvent {
    #[serde(flatten)]
    pub header: EventHeader,
    /// Group ID.
    pub group_id: i64,
    /// User ID who left or was kicked.
    pub user_id: i64,
    /// Operator user ID (who kicked, if applicable).
    #[serde(default)]
    pub operator_id: Option<i64>,
    /// Sub-type ("leave", "kick", "kick_me").
    pub sub_type: String,
}

impl GroupDecreaseEvent {
    /// Returns `true` if the bot itself was removed.
    pub fn is_self_kicked(&self) -> bool {
        self.sub_type == "kick_me"
    }
}

/// Group member increase event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupIncreaseEvent {
    #[serde(flatten)]
    pub header: EventHeader,
    /// Group ID.
    pub group_id: i64,
    /// User ID who joined.
    pub user_id: i64,
    /// Operator user ID (who approved/invited).
    #[serde(default)]
    pub operator_id: Option<i64>,
    /// Sub-type ("approve", "invite").
    pub sub_type: String,
}

// ============================================================================
// Group Ban Event
// ============================================================================

/// Group ban event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupBanEvent {
    #[serde(flatten)]
    pub header: EventHeader,
    /// Group ID.
    pub group_id: i64,
    /// Banned user ID (0 for a whole-group ban).
    pub user_id: i64,
    /// Operator user ID.
    #[serde(default)]
    pub operator_id: Option<i64>,
    /// Ban duration in seconds (0 = unban).
    pub duration: i64,
    /// Sub-type ("ban", "lift_ban").
    pub sub_type: String,
}

// ============================================================================
// Friend Add Event
// ============================================================================

/// Friend added event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendAddEvent {
    #[serde(flatten)]
    pub header: EventHeader,
    /// New friend's user ID.
    pub user_id: i64,
}

// ============================================================================
// Recall Events
// ============================================================================

/// Group message recall event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRecallEvent {
    #[serde(flatten)]
    pub header: EventHeader,
    /// Group ID.
    pub group_id: i64,
    /// Message author's user ID.
    pub user_id: i64,
    /// Operator user ID (who recalled).
    #[serde(default)]
    pub operator_id: Option<i64>,
    /// Recalled message ID.
    pub message_id: i64,
}

/// Friend message recall event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendRecallEvent {
    #[serde(flatten)]
    pub header: EventHeader,
    /// Friend's user ID.
    pub user_id: i64,
    /// Recalled message ID.
    pub message_id: i64,
}

// ============================================================================
// Group Card Event
// ============================================================================

/// Group card (nickname) change event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupCardEvent {
    #[serde(flatten)]
    pub header: EventHeader,
    /// Group ID.
    pub group_id: i64,
    /// User ID whose card changed.
    pub user_id: i64,
    /// New card.
    #[serde(default)]
    pub card_new: String,
    /// Old card.
    #[serde(default)]
    pub card_old: String,
}

// ============================================================================
// Offline File Event
// ============================================================================

/// Offline file info.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfflineFile {
    /// File name.
    pub name: String,
    /// File size in bytes.
    pub size: i64,
    /// Download URL.
    pub url: String,
}

/// Offline file received event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfflineFileEvent {
    #[serde(flatten)]
    pub header: EventHeader,
    /// Sender's user ID.
    pub user_id: i64,
    /// File information.
    pub file: OfflineFile,
}

// ============================================================================
// Notify Events
// ============================================================================

/// Poke (nudge) event.
///
/// The same shape serves group and private pokes; a private poke has
/// `group_id == 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokeEvent {
    #[serde(flatten)]
    pub header: EventHeader,
    /// Group ID, or 0 for a private poke.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub group_id: i64,
    /// User who poked, or 0 if absent.
    #[serde(default)]
    pub user_id: i64,
    /// User who was poked, or 0 if absent.
    #[serde(default)]
    pub target_id: i64,
}

impl PokeEvent {
    /// Returns `true` if the poke happened in a group.
    pub fn in_group(&self) -> bool {
        self.group_id > 0
    }

    /// Returns `true` if the bot itself was poked.
    pub fn targets_self(&self) -> bool {
        self.target_id != 0 && self.target_id == self.header.self_id
    }
}

/// Lucky king (red packet) event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LuckyKingEvent {
    #[serde(flatten)]
    pub header: EventHeader,
    /// Group ID.
    pub group_id: i64,
    /// User who sent the red packet.
    pub user_id: i64,
    /// User who got the lucky king.
    pub target_id: i64,
}

/// Group honor change event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HonorEvent {
    #[serde(flatten)]
    pub header: EventHeader,
    /// Group ID.
    pub group_id: i64,
    /// User whose honor changed.
    pub user_id: i64,
    /// Honor type ("talkative", "performer", "emotion").
    pub honor_type: String,
}
