//! The OneBot v11 event taxonomy.
//!
//! Every event shape the gateway understands is a leaf of a fixed
//! discriminator tree. The tree is plain static data: the classifier walks it,
//! nothing else interprets it.
//!
//! ```text
//! post_type
//! ├── message      → message_type { private, group }
//! ├── notice       → notice_type  { group_upload, group_admin, group_decrease,
//! │                                 group_increase, group_ban, friend_add,
//! │                                 group_recall, friend_recall, group_card,
//! │                                 offline_file,
//! │                                 notify → sub_type { poke → group_id > 0 ?,
//! │                                                     lucky_king, honor } }
//! ├── request      → request_type { friend, group }
//! └── meta_event   → Unhandled
//! ```

use std::fmt;

// ============================================================================
// Leaf Tags
// ============================================================================

/// A leaf of the taxonomy: one concrete event shape, or `Unhandled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafTag {
    /// `message` / `private`
    PrivateMessage,
    /// `message` / `group`
    GroupMessage,
    /// `notice` / `group_upload`
    GroupUpload,
    /// `notice` / `group_admin`
    GroupAdmin,
    /// `notice` / `group_decrease`
    GroupDecrease,
    /// `notice` / `group_increase`
    GroupIncrease,
    /// `notice` / `group_ban`
    GroupBan,
    /// `notice` / `friend_add`
    FriendAdd,
    /// `notice` / `group_recall`
    GroupRecall,
    /// `notice` / `friend_recall`
    FriendRecall,
    /// `notice` / `group_card`
    GroupCard,
    /// `notice` / `offline_file`
    OfflineFile,
    /// `notice` / `notify` / `poke` with a positive `group_id`
    GroupPoke,
    /// `notice` / `notify` / `poke` without a positive `group_id`
    PrivatePoke,
    /// `notice` / `notify` / `lucky_king`
    LuckyKing,
    /// `notice` / `notify` / `honor`
    Honor,
    /// `request` / `friend`
    FriendRequest,
    /// `request` / `group`
    GroupRequest,
    /// Anything the taxonomy does not recognize, and every meta event.
    Unhandled,
}

impl LeafTag {
    /// Every leaf, `Unhandled` last.
    pub const ALL: [LeafTag; 19] = [
        LeafTag::PrivateMessage,
        LeafTag::GroupMessage,
        LeafTag::GroupUpload,
        LeafTag::GroupAdmin,
        LeafTag::GroupDecrease,
        LeafTag::GroupIncrease,
        LeafTag::GroupBan,
        LeafTag::FriendAdd,
        LeafTag::GroupRecall,
        LeafTag::FriendRecall,
        LeafTag::GroupCard,
        LeafTag::OfflineFile,
        LeafTag::GroupPoke,
        LeafTag::PrivatePoke,
        LeafTag::LuckyKing,
        LeafTag::Honor,
        LeafTag::FriendRequest,
        LeafTag::GroupRequest,
        LeafTag::Unhandled,
    ];

    /// Returns the snake_case name used in logs and errors.
    pub fn name(self) -> &'static str {
        match self {
            LeafTag::PrivateMessage => "private_message",
            LeafTag::GroupMessage => "group_message",
            LeafTag::GroupUpload => "group_upload",
            LeafTag::GroupAdmin => "group_admin",
            LeafTag::GroupDecrease => "group_decrease",
            LeafTag::GroupIncrease => "group_increase",
            LeafTag::GroupBan => "group_ban",
            LeafTag::FriendAdd => "friend_add",
            LeafTag::GroupRecall => "group_recall",
            LeafTag::FriendRecall => "friend_recall",
            LeafTag::GroupCard => "group_card",
            LeafTag::OfflineFile => "offline_file",
            LeafTag::GroupPoke => "group_poke",
            LeafTag::PrivatePoke => "private_poke",
            LeafTag::LuckyKing => "lucky_king",
            LeafTag::Honor => "honor",
            LeafTag::FriendRequest => "friend_request",
            LeafTag::GroupRequest => "group_request",
            LeafTag::Unhandled => "unhandled",
        }
    }

    /// Returns `true` for [`LeafTag::Unhandled`].
    pub fn is_unhandled(self) -> bool {
        self == LeafTag::Unhandled
    }
}

impl fmt::Display for LeafTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Discriminator Tree
// ============================================================================

/// One level of the taxonomy: a discriminator field and its known values.
#[derive(Debug)]
pub struct Node {
    /// The field whose string value selects a branch.
    pub field: &'static str,
    /// Recognized values, in declaration order.
    pub arms: &'static [(&'static str, Branch)],
}

impl Node {
    /// Returns the branch selected by `value`, if any.
    pub fn arm(&self, value: &str) -> Option<&Branch> {
        self.arms
            .iter()
            .find_map(|(known, branch)| (*known == value).then_some(branch))
    }
}

/// What a matched discriminator value leads to.
#[derive(Debug)]
pub enum Branch {
    /// A terminal leaf.
    Leaf(LeafTag),
    /// Another discriminator level.
    Descend(&'static Node),
    /// A numeric split: `positive` when `field` holds an integer above zero,
    /// `otherwise` when it is zero, negative, absent or unparsable.
    SplitPositive {
        field: &'static str,
        positive: LeafTag,
        otherwise: LeafTag,
    },
}

/// The root of the taxonomy, keyed on `post_type`.
pub static TAXONOMY: Node = Node {
    field: "post_type",
    arms: &[
        ("message", Branch::Descend(&MESSAGE)),
        ("notice", Branch::Descend(&NOTICE)),
        ("request", Branch::Descend(&REQUEST)),
        ("meta_event", Branch::Leaf(LeafTag::Unhandled)),
    ],
};

static MESSAGE: Node = Node {
    field: "message_type",
    arms: &[
        ("private", Branch::Leaf(LeafTag::PrivateMessage)),
        ("group", Branch::Leaf(LeafTag::GroupMessage)),
    ],
};

static NOTICE: Node = Node {
    field: "notice_type",
    arms: &[
        ("group_upload", Branch::Leaf(LeafTag::GroupUpload)),
        ("group_admin", Branch::Leaf(LeafTag::GroupAdmin)),
        ("group_decrease", Branch::Leaf(LeafTag::GroupDecrease)),
        ("group_increase", Branch::Leaf(LeafTag::GroupIncrease)),
        ("group_ban", Branch::Leaf(LeafTag::GroupBan)),
        ("friend_add", Branch::Leaf(LeafTag::FriendAdd)),
        ("group_recall", Branch::Leaf(LeafTag::GroupRecall)),
        ("friend_recall", Branch::Leaf(LeafTag::FriendRecall)),
        ("group_card", Branch::Leaf(LeafTag::GroupCard)),
        ("offline_file", Branch::Leaf(LeafTag::OfflineFile)),
        ("notify", Branch::Descend(&NOTIFY)),
    ],
};

static NOTIFY: Node = Node {
    field: "sub_type",
    arms: &[
        (
            "poke",
            Branch::SplitPositive {
                field: "group_id",
                positive: LeafTag::GroupPoke,
                otherwise: LeafTag::PrivatePoke,
            },
        ),
        ("lucky_king", Branch::Leaf(LeafTag::LuckyKing)),
        ("honor", Branch::Leaf(LeafTag::Honor)),
    ],
};

static REQUEST: Node = Node {
    field: "request_type",
    arms: &[
        ("friend", Branch::Leaf(LeafTag::FriendRequest)),
        ("group", Branch::Leaf(LeafTag::GroupRequest)),
    ],
};
